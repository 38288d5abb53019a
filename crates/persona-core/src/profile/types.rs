//! Profile types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named configuration bundle: environment variables, enabled extension
/// references, and profile-local MCP server settings.
///
/// Profiles are persisted one file per profile, named `<id>.yaml`; the `id`
/// is immutable after creation and doubles as the file's base name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier (`[a-z0-9-]+`, up to 64 characters)
    pub id: String,
    /// Display name (required, up to 100 characters)
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Optional icon
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
    /// Optional color (free text)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,

    /// References to externally owned extensions, in order
    #[serde(default)]
    pub extensions: Vec<ExtensionRef>,
    /// Environment variables to hand to the downstream CLI
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// Profile-local MCP server settings
    #[serde(default)]
    pub mcp_servers: BTreeMap<String, ServerConfig>,

    /// When created (set once, never changed thereafter)
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// When last saved
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    /// When last activated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    /// Number of activations
    #[serde(default)]
    pub usage_count: u64,

    /// Parent profile IDs (informational linkage, not resolved at runtime)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inherits: Vec<String>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Rules consumed by the external auto-selection collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_detect: Option<AutoDetectRules>,
}

impl Profile {
    /// Create a new profile with the given ID and name, empty collections,
    /// and fresh timestamps.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            icon: String::new(),
            color: String::new(),
            extensions: Vec::new(),
            environment: BTreeMap::new(),
            mcp_servers: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            last_used: None,
            usage_count: 0,
            inherits: Vec::new(),
            tags: Vec::new(),
            auto_detect: None,
        }
    }
}

/// A reference to an extension in a profile.
///
/// This is a capability reference into an externally owned extension set,
/// not ownership of the extension itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionRef {
    /// Extension identifier
    pub id: String,
    /// Whether the extension is enabled for this profile
    #[serde(default)]
    pub enabled: bool,
    /// Free-form per-profile extension configuration
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, serde_json::Value>,
}

/// MCP server settings local to a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Whether the server is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Free-form server settings
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, serde_json::Value>,
}

/// Rules for automatic profile selection by an external collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoDetectRules {
    /// File patterns that suggest this profile
    pub patterns: Vec<String>,
    /// Selection priority when multiple profiles match
    #[serde(default)]
    pub priority: i64,
}

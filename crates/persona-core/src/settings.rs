//! Settings document generation
//!
//! Projects an active profile and its enabled extensions into the settings
//! document consumed by the downstream CLI. The projection is pure: it owns
//! no state and its only side effect is the optional one-shot write of its
//! result.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extension::{Extension, McpServerConfig};
use crate::profile::Profile;
use crate::util::atomic_write;

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors that can occur writing a settings document
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File I/O error
    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// JSON encode error
    #[error("JSON error: {0}")]
    Json(String),
}

/// The generated, consumer-facing settings document.
///
/// A transient value: it has no lifecycle beyond a single generation plus
/// an optional one-shot write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    /// Context file the CLI should read
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context_file_name: String,
    /// UI theme
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub theme: String,
    /// Sandbox mode (boolean or named mode string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<serde_json::Value>,
    /// Auto-accept tool invocations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_accept: Option<bool>,
    /// Explicit tool allow list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub core_tools: Vec<String>,
    /// Explicit tool deny list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_tools: Vec<String>,
    /// File filtering options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_filtering: Option<FileFiltering>,
    /// Merged MCP server declarations, keyed by (possibly disambiguated)
    /// server name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mcp_servers: BTreeMap<String, McpServerConfig>,
    /// Checkpointing options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpointing: Option<Checkpointing>,
    /// Preferred editor binary
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preferred_editor: String,
    /// Telemetry block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<Telemetry>,
    /// Usage statistics opt-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_statistics_enabled: Option<bool>,
}

/// File filtering options understood by the downstream CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFiltering {
    pub respect_git_ignore: bool,
    pub enable_recursive_file_search: bool,
}

/// Checkpointing options understood by the downstream CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checkpointing {
    pub enabled: bool,
}

/// Telemetry options understood by the downstream CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub otlp_endpoint: String,
    #[serde(default)]
    pub log_prompts: bool,
}

/// Merges an active profile and its enabled extensions into a
/// [`SettingsDocument`].
pub struct SettingsGenerator<'a> {
    // Profile-level settings overrides are not projected yet; the profile
    // is kept so the projection can grow without an API break.
    #[allow(dead_code)]
    profile: &'a Profile,
    extensions: &'a [Extension],
}

impl<'a> SettingsGenerator<'a> {
    /// Create a generator over a profile and its enabled extensions, in the
    /// order the caller wants them merged.
    #[must_use]
    pub fn new(profile: &'a Profile, extensions: &'a [Extension]) -> Self {
        Self {
            profile,
            extensions,
        }
    }

    /// Build the settings document.
    ///
    /// Extensions are consumed in the caller-supplied order; within one
    /// extension, servers merge in name order. The first extension to claim
    /// a server name keeps the bare name; a later extension declaring the
    /// same name lands under `<extensionName>_<serverName>` instead. Server
    /// configuration values are copied opaquely: `$VAR` placeholders are
    /// never expanded here.
    #[must_use]
    pub fn generate(&self) -> SettingsDocument {
        let mut doc = SettingsDocument::default();

        for ext in self.extensions {
            for (name, server) in &ext.mcp_servers {
                let key = if doc.mcp_servers.contains_key(name) {
                    format!("{}_{name}", ext.name)
                } else {
                    name.clone()
                };
                doc.mcp_servers.insert(key, server.clone());
            }

            // First extension in order that declares a context file wins.
            if doc.context_file_name.is_empty() && !ext.context_file_name.is_empty() {
                doc.context_file_name = ext.context_file_name.clone();
            }
        }

        doc
    }

    /// Generate and atomically write the document to `path`, creating
    /// parent directories as needed.
    ///
    /// # Errors
    /// Returns an error if encoding or the atomic write fails. The previous
    /// file at `path`, if any, is left untouched on failure.
    pub fn write(&self, path: &Path) -> SettingsResult<()> {
        let doc = self.generate();
        let data =
            serde_json::to_vec_pretty(&doc).map_err(|e| SettingsError::Json(e.to_string()))?;
        atomic_write(path, &data).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

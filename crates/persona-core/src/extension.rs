//! Extension collaborator contract
//!
//! Extensions are owned and loaded elsewhere; this crate consumes them
//! read-only when projecting a profile into a settings document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An externally owned extension: zero or more named MCP server
/// declarations plus an optional context-file name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extension {
    /// Extension identifier (derived from its install directory)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Extension name, used to disambiguate server-name collisions
    pub name: String,
    /// Context file the downstream CLI should read, if any
    #[serde(
        default,
        rename = "contextFileName",
        skip_serializing_if = "String::is_empty"
    )]
    pub context_file_name: String,
    /// MCP servers declared by this extension, keyed by server name
    #[serde(
        default,
        rename = "mcpServers",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub mcp_servers: BTreeMap<String, McpServerConfig>,
}

/// A named external tool-server process declaration.
///
/// Values may embed `$VAR` / `${VAR}` placeholder syntax; they are carried
/// opaquely and expanded by the downstream CLI, never here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// Command to execute
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,
    /// Command arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Working directory for the server process
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cwd: String,
    /// Environment variables for the server process
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl McpServerConfig {
    /// Create a server config from a command and arguments
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            cwd: String::new(),
            env: BTreeMap::new(),
        }
    }

    /// Add an environment variable
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = cwd.into();
        self
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_max_call_seconds() -> u64 {
    30
}

fn default_enabled_true() -> bool {
    true
}

fn default_command() -> String {
    "node".to_string()
}

fn default_args() -> Vec<String> {
    vec!["../spotify-mcp/dist/index.js".to_string()]
}

/// Tool provider subprocess, spoken to over MCP stdio.
///
/// A fresh child process is spawned for every analysis request and torn down
/// when that request finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// When disabled the model runs without tools.
    #[serde(default = "default_enabled_true")]
    pub enabled: bool,

    /// Program to spawn.
    #[serde(default = "default_command")]
    pub command: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Extra environment passed to the child (e.g. provider credentials).
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Maximum seconds per tool call.
    #[serde(default = "default_max_call_seconds")]
    pub max_call_seconds: u64,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_command(),
            args: default_args(),
            env: HashMap::new(),
            max_call_seconds: default_max_call_seconds(),
        }
    }
}

impl McpConfig {
    /// Validate the configuration, returning errors for invalid entries.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.enabled {
            return errors;
        }
        if self.command.trim().is_empty() {
            errors.push("mcp.command must not be empty when mcp is enabled".to_string());
        }
        if self.max_call_seconds == 0 {
            errors.push("mcp.max_call_seconds must be > 0".to_string());
        }
        errors
    }
}

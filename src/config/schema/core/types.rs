use super::super::{AnalysisConfig, GatewayConfig, McpConfig, ProviderConfig, RateLimitConfig};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Maximum tracing level (`trace`, `debug`, `info`, `warn`, `error`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub mcp: McpConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn afterword_dir() -> PathBuf {
    let home = UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
    home.join(".afterword")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: afterword_dir().join("config.toml"),
            log_level: default_log_level(),
            provider: ProviderConfig::default(),
            analysis: AnalysisConfig::default(),
            rate_limit: RateLimitConfig::default(),
            gateway: GatewayConfig::default(),
            mcp: McpConfig::default(),
        }
    }
}

impl Config {
    /// Parsed `log_level`, falling back to `INFO` for unknown values.
    pub fn tracing_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.trim()).unwrap_or(tracing::Level::INFO)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors: Vec<String> = self
            .provider
            .validate()
            .into_iter()
            .chain(self.analysis.validate())
            .chain(self.rate_limit.validate())
            .chain(self.gateway.validate())
            .chain(self.mcp.validate())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}

use super::Config;
use super::types::afterword_dir;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

impl Config {
    /// Load `~/.afterword/config.toml`, writing defaults on first run, then
    /// apply environment overrides and validate.
    pub fn load_or_init() -> Result<Self> {
        let dir = afterword_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).context("Failed to create .afterword directory")?;
        }
        let config_path = dir.join("config.toml");

        if !config_path.exists() {
            let config = Self {
                config_path: config_path.clone(),
                ..Self::default()
            };
            config.save()?;
        }

        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let mut config: Config =
            toml::from_str(&contents).context("Failed to parse config file")?;
        config.config_path = config_path.to_path_buf();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

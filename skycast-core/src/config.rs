use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::location::DEFAULT_CITY;

/// Environment variable that overrides the configured API key.
pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";

/// Credentials for the OpenWeather provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// City used when geolocation fails, overriding the built-in default.
    pub default_city: Option<String>,

    /// Example TOML:
    /// [openweather]
    /// api_key = "..."
    pub openweather: Option<ProviderConfig>,
}

impl Config {
    /// API key from the environment if set, otherwise from the config file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(ENV_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.file_api_key().map(str::to_string))
    }

    /// API key from the config file only, ignoring the environment.
    pub fn file_api_key(&self) -> Option<&str> {
        self.openweather.as_ref().map(|cfg| cfg.api_key.as_str())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather = Some(ProviderConfig { api_key });
    }

    /// City to fall back to when geolocation is unavailable.
    pub fn fallback_city(&self) -> &str {
        self.default_city.as_deref().unwrap_or(DEFAULT_CITY)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_file_api_key() {
        let cfg = Config::default();
        assert_eq!(cfg.file_api_key(), None);
    }

    #[test]
    fn set_api_key_round_trips() {
        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        assert_eq!(cfg.file_api_key(), Some("OPEN_KEY"));
    }

    #[test]
    fn fallback_city_defaults_to_new_york() {
        let cfg = Config::default();
        assert_eq!(cfg.fallback_city(), "New York");
    }

    #[test]
    fn fallback_city_honors_configured_override() {
        let cfg = Config { default_city: Some("Kyiv".to_string()), ..Config::default() };
        assert_eq!(cfg.fallback_city(), "Kyiv");
    }

    #[test]
    fn config_toml_round_trips() {
        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.default_city = Some("Paris".to_string());

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.file_api_key(), Some("OPEN_KEY"));
        assert_eq!(parsed.fallback_city(), "Paris");
    }
}

//! Configuration file management.
//!
//! The remote endpoint, API key, viewer base, and sensor command arrive via
//! a TOML file with environment-variable overrides, the desktop analogue of
//! the `<meta>` tags / build-time globals the web revisions read them from.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint for single and sequential delivery
    #[serde(default)]
    pub api_url: Option<String>,

    /// Separate endpoint for batch (diary) delivery; falls back to `api_url`
    #[serde(default)]
    pub diary_api_url: Option<String>,

    /// Value for the `x-api-key` header
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the external viewer application
    #[serde(default)]
    pub viewer_url: Option<String>,

    /// Helper command that prints one JSON position object
    #[serde(default)]
    pub sensor_command: Option<String>,

    /// Capture timeout in seconds (default 10)
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("geodiary")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Endpoint for single/sequential delivery: env override, then config.
    pub fn resolve_api_url(&self) -> Option<String> {
        env_or("GEODIARY_API_URL", &self.api_url)
    }

    /// Endpoint for batch delivery: env override, then config, then the
    /// plain API URL.
    pub fn resolve_diary_api_url(&self) -> Option<String> {
        env_or("GEODIARY_DIARY_API_URL", &self.diary_api_url).or_else(|| self.resolve_api_url())
    }

    /// API key: env override, then config.
    pub fn resolve_api_key(&self) -> Option<String> {
        env_or("GEODIARY_API_KEY", &self.api_key)
    }

    /// Viewer base URL: env override, then config.
    pub fn resolve_viewer_url(&self) -> Option<String> {
        env_or("GEODIARY_VIEWER_URL", &self.viewer_url)
    }

    /// Sensor helper command: env override, then config.
    pub fn resolve_sensor_command(&self) -> Option<String> {
        env_or("GEODIARY_SENSOR_COMMAND", &self.sensor_command)
    }
}

/// Trimmed, non-empty environment value, else the trimmed config value.
fn env_or(var: &str, fallback: &Option<String>) -> Option<String> {
    resolve(env::var(var).ok(), fallback)
}

/// Pick the override when it has content, else the fallback. A variable
/// that is set but blank does not mask a configured value.
fn resolve(env_value: Option<String>, fallback: &Option<String>) -> Option<String> {
    non_blank(env_value.as_deref()).or_else(|| non_blank(fallback.as_deref()))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_resolve_to_none() {
        let config = Config::default();
        assert_eq!(config.resolve_api_url(), None);
        assert_eq!(config.resolve_api_key(), None);
        assert_eq!(config.resolve_viewer_url(), None);
    }

    #[test]
    fn blank_values_resolve_to_none() {
        let config = Config {
            api_url: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_url(), None);
    }

    #[test]
    fn env_value_overrides_config_value() {
        let fallback = Some("https://config.example".to_string());
        assert_eq!(
            resolve(Some("https://env.example".to_string()), &fallback),
            Some("https://env.example".to_string())
        );
    }

    #[test]
    fn blank_env_value_does_not_mask_config_value() {
        let fallback = Some("https://config.example".to_string());
        assert_eq!(
            resolve(Some("   ".to_string()), &fallback),
            Some("https://config.example".to_string())
        );
        assert_eq!(
            resolve(Some(String::new()), &fallback),
            Some("https://config.example".to_string())
        );
        assert_eq!(resolve(Some("   ".to_string()), &None), None);
    }

    #[test]
    fn diary_url_falls_back_to_api_url() {
        let config = Config {
            api_url: Some("https://api.example/track".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_diary_api_url(),
            Some("https://api.example/track".to_string())
        );

        let config = Config {
            api_url: Some("https://api.example/track".to_string()),
            diary_api_url: Some("https://api.example/diary".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_diary_api_url(),
            Some("https://api.example/diary".to_string())
        );
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config {
            api_url: Some("https://api.example/track".to_string()),
            api_key: Some("secret".to_string()),
            timeout: Some(5),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.api_url, config.api_url);
        assert_eq!(parsed.api_key, config.api_key);
        assert_eq!(parsed.timeout, Some(5));
    }
}

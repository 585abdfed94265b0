//! Configuration management for watchpoint
//!
//! Handles config file loading/saving and backend connection settings.
//! Config is stored at ~/.config/watchpoint/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::api::DEFAULT_TIMEOUT_SECS;

/// Fallback backend address for local deployments
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL
    pub base_url: Option<String>,
    /// Default user id for progress operations
    pub user_id: Option<u64>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get config file path (~/.config/watchpoint/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("watchpoint").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Backend base URL with fallback chain:
    /// 1. Environment variable WATCHPOINT_BASE_URL
    /// 2. Config file value
    /// 3. Local default
    pub fn base_url(&self) -> String {
        if let Ok(url) = std::env::var("WATCHPOINT_BASE_URL") {
            return url;
        }
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Default user id: WATCHPOINT_USER_ID env var, then config file
    pub fn user_id(&self) -> Option<u64> {
        if let Ok(id) = std::env::var("WATCHPOINT_USER_ID") {
            if let Ok(id) = id.parse() {
                return Some(id);
            }
        }
        self.user_id
    }

    /// Request timeout, bounded to the recommended 5-10s band
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).clamp(5, 10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.base_url.is_none());
        assert!(config.user_id.is_none());
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_default_timeout_in_band() {
        let config = Config::default();
        let secs = config.timeout().as_secs();
        assert!((5..=10).contains(&secs));
    }

    #[test]
    fn test_timeout_clamped() {
        let config = Config {
            timeout_secs: Some(120),
            ..Config::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(10));

        let config = Config {
            timeout_secs: Some(1),
            ..Config::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            base_url: Some("http://nas.local:8000".to_string()),
            user_id: Some(7),
            timeout_secs: Some(6),
        };

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.base_url.as_deref(), Some("http://nas.local:8000"));
        assert_eq!(parsed.user_id, Some(7));
        assert_eq!(parsed.timeout_secs, Some(6));
    }
}

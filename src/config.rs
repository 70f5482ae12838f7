//! Configuration Management
//!
//! Handles persistent configuration storage for tazure.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Last used subscription id
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Resource group filter
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Services to discover (empty means all)
    #[serde(default)]
    pub services: Vec<String>,
    /// ARM endpoint origin override (sovereign clouds), without a path
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tazure").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective subscription (config > environment > Azure CLI default)
    pub fn effective_subscription(&self) -> Option<String> {
        self.subscription_id
            .clone()
            .or_else(crate::azure::auth::get_default_subscription)
    }

    /// Get effective ARM endpoint (config > public cloud)
    pub fn effective_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| crate::azure::client::DEFAULT_ENDPOINT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("tazure-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_path("config.json");
        let config = Config {
            subscription_id: Some("00000000-0000-0000-0000-000000000000".to_string()),
            resource_group: Some("rg1".to_string()),
            services: vec!["api_management".to_string()],
            endpoint: None,
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from(&temp_path("missing.json"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"resource_group": "rg2"}"#).unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.resource_group.as_deref(), Some("rg2"));
        assert!(config.services.is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_effective_endpoint_defaults_to_public_cloud() {
        assert_eq!(
            Config::default().effective_endpoint(),
            "https://management.azure.com"
        );
        let config = Config {
            endpoint: Some("https://management.chinacloudapi.cn".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.effective_endpoint(),
            "https://management.chinacloudapi.cn"
        );
    }
}

//! Panel client configuration
//!
//! Stored as JSON; every field has a default so partial files load.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};
use crate::ordering::TieBreak;
use crate::repository::DEFAULT_ORDER_KEY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Backend API root, e.g. `http://panel.example.com/api/v1`
    pub api_base_url: String,
    /// Session token sent as `Authorization`
    pub token: Option<String>,
    /// SQLite file of the local order cache; `None` keeps the cache in memory
    pub cache_path: Option<PathBuf>,
    pub cache_key: String,
    pub request_timeout_secs: u64,
    pub log_dir: Option<PathBuf>,
    pub tie_break: TieBreak,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:6365/api/v1".to_string(),
            token: None,
            cache_path: None,
            cache_key: DEFAULT_ORDER_KEY.to_string(),
            request_timeout_secs: 10,
            log_dir: None,
            tie_break: TieBreak::FetchOrder,
        }
    }
}

impl PanelConfig {
    /// Load from a JSON file; a missing file yields the defaults
    pub fn load(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| DomainError::InvalidInput(format!("Invalid config {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> DomainResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DomainError::Storage(e.to_string()))?;
            }
        }
        let raw = serde_json::to_string_pretty(self).map_err(|e| DomainError::Internal(e.to_string()))?;
        std::fs::write(path, raw).map_err(|e| DomainError::Storage(e.to_string()))
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(DomainError::InvalidInput("api_base_url must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(DomainError::InvalidInput("request_timeout_secs must be positive".to_string()));
        }
        if self.cache_key.is_empty() {
            return Err(DomainError::InvalidInput("cache_key must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PanelConfig::load(&dir.path().join("panel.json")).unwrap();
        assert_eq!(config, PanelConfig::default());
        assert_eq!(config.cache_key, "forward-order");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.json");
        std::fs::write(&path, r#"{"api_base_url":"https://panel.example.com/api/v1","tie_break":"id"}"#).unwrap();

        let config = PanelConfig::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://panel.example.com/api/v1");
        assert_eq!(config.tie_break, TieBreak::Id);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("panel.json");
        let config = PanelConfig {
            token: Some("abc".to_string()),
            cache_path: Some(dir.path().join("order.db")),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(PanelConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.json");
        std::fs::write(&path, r#"{"request_timeout_secs":0}"#).unwrap();
        assert!(matches!(PanelConfig::load(&path), Err(DomainError::InvalidInput(_))));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(PanelConfig::load(&path), Err(DomainError::InvalidInput(_))));
    }
}

//! Store configuration
//!
//! Stored as JSON, by default in ~/.config/dblob/config.json.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tunables for [`DurableStore`](crate::DurableStore)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// fsync the backup file before promoting it, and the directory after
    pub sync_writes: bool,
    /// Appended to the primary file name to derive a backup path
    pub backup_suffix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            sync_writes: false,
            backup_suffix: ".bak".to_string(),
        }
    }
}

impl StoreConfig {
    /// Default config file location (~/.config/dblob/config.json)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dblob").join("config.json"))
    }

    /// Load config from a file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: StoreConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or the default one if it exists
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save config to a file path, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.backup_suffix.is_empty() {
            return Err(Error::Config(
                "backup_suffix must not be empty, backup would alias primary".into(),
            ));
        }
        if self.backup_suffix.contains(std::path::is_separator) {
            return Err(Error::Config(format!(
                "backup_suffix must not contain a path separator: {:?}",
                self.backup_suffix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert!(!config.sync_writes);
        assert_eq!(config.backup_suffix, ".bak");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = StoreConfig {
            sync_writes: true,
            backup_suffix: ".tmp".into(),
        };
        config.save(&path).unwrap();

        assert_eq!(StoreConfig::load(&path).unwrap(), config);
        assert_eq!(StoreConfig::load_or_default(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "sync_writes": true }"#).unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert!(config.sync_writes);
        assert_eq!(config.backup_suffix, ".bak");
    }

    #[test]
    fn test_missing_explicit_file_errors() {
        let dir = tempdir().unwrap();
        let err = StoreConfig::load_or_default(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_suffix_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{ "backup_suffix": "" }"#).unwrap();
        assert!(matches!(StoreConfig::load(&path), Err(Error::Config(_))));

        std::fs::write(&path, r#"{ "backup_suffix": "/x" }"#).unwrap();
        assert!(matches!(StoreConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(StoreConfig::load(&path), Err(Error::Json(_))));
    }
}

//! Storage layout configuration.
//!
//! # Responsibility
//! - Resolve database, image directory and log directory paths from one
//!   data directory.
//!
//! # Invariants
//! - `data_dir` is absolute and non-empty.
//! - `db_file_name` and `image_dir_name` are bare names inside `data_dir`.
//! - `log_level` is one of the levels `init_logging` accepts.

use crate::db::{open_db, DbResult};
use crate::logging::{default_log_level, normalize_level};
use crate::repo::image_dir::{ImageDir, ImageDirError};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "daybook.sqlite3";
pub const DEFAULT_IMAGE_DIR_NAME: &str = "images";
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// Paths and log level used when wiring stores for a host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaybookConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub image_dir_name: String,
    pub log_level: String,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            image_dir_name: DEFAULT_IMAGE_DIR_NAME.to_string(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl DaybookConfig {
    /// Builds a default layout rooted at `data_dir`.
    ///
    /// # Errors
    /// - Returns an error when `data_dir` is empty or relative.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, String> {
        let config = Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks path invariants, e.g. after deserializing.
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir cannot be empty".to_string());
        }
        if !self.data_dir.is_absolute() {
            return Err(format!(
                "data_dir must be an absolute path, got `{}`",
                self.data_dir.display()
            ));
        }
        for (field, value) in [
            ("db_file_name", &self.db_file_name),
            ("image_dir_name", &self.image_dir_name),
        ] {
            let is_bare = Path::new(value)
                .file_name()
                .is_some_and(|name| name == value.as_str());
            if !is_bare {
                return Err(format!("{field} must be a bare name, got `{value}`"));
            }
        }
        normalize_level(&self.log_level).map_err(|err| err.to_string())?;
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn image_dir(&self) -> PathBuf {
        self.data_dir.join(&self.image_dir_name)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_LOG_DIR_NAME)
    }

    /// Opens the configured database with migrations applied.
    pub fn open_db(&self) -> DbResult<Connection> {
        open_db(self.db_path())
    }

    /// Creates (if needed) and returns the configured content directory.
    pub fn open_image_dir(&self) -> Result<ImageDir, ImageDirError> {
        ImageDir::open(self.image_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::DaybookConfig;

    #[test]
    fn new_rejects_relative_data_dir() {
        let err = DaybookConfig::new("data").unwrap_err();
        assert!(err.contains("absolute"));
    }

    #[test]
    fn paths_are_derived_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = DaybookConfig::new(dir.path()).unwrap();
        assert_eq!(config.db_path(), dir.path().join("daybook.sqlite3"));
        assert_eq!(config.image_dir(), dir.path().join("images"));
        assert_eq!(config.log_dir(), dir.path().join("logs"));
    }

    #[test]
    fn validate_rejects_nested_image_dir_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DaybookConfig::new(dir.path()).unwrap();
        config.image_dir_name = "../images".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_log_level() {
        let config: DaybookConfig = serde_json::from_str(
            r#"{"data_dir": "/var/lib/daybook", "log_level": "verbose"}"#,
        )
        .unwrap();
        assert!(config.validate().unwrap_err().contains("verbose"));
    }

    #[test]
    fn deserialize_fills_defaults() {
        let config: DaybookConfig =
            serde_json::from_str(r#"{"data_dir": "/var/lib/daybook"}"#).unwrap();
        assert_eq!(config.db_file_name, "daybook.sqlite3");
        assert_eq!(config.image_dir_name, "images");
        assert!(config.validate().is_ok());
    }
}

//! Runtime configuration loaded from TOML.
//!
//! ```toml
//! [database]
//! path = "/var/lib/clinic/drugs.db"
//!
//! [logging]
//! level = "debug"
//! json = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Database, DbResult};

/// Path value that selects an in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file, or `:memory:`
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level for this crate when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_database_path() -> String {
    IN_MEMORY_PATH.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CoreConfig {
    /// Load and validate a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "database.path",
                reason: "must not be empty".into(),
            });
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid {
                field: "logging.level",
                reason: format!(
                    "unknown level {:?}, expected one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        Ok(())
    }

    /// Open the configured database.
    pub fn open_database(&self) -> DbResult<Database> {
        if self.database.path == IN_MEMORY_PATH {
            Database::open_in_memory()
        } else {
            Database::open(&self.database.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_parse_full() {
        let config = CoreConfig::from_toml_str(
            r#"
            [database]
            path = "/tmp/drugs.db"

            [logging]
            level = "DEBUG"
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path, "/tmp/drugs.db");
        assert_eq!(config.logging.level, "DEBUG");
        assert!(config.logging.json);
    }

    #[test]
    fn test_rejects_unknown_level() {
        let err = CoreConfig::from_toml_str("[logging]\nlevel = \"loud\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "logging.level",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_empty_path() {
        let err = CoreConfig::from_toml_str("[database]\npath = \"  \"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "database.path",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = CoreConfig::from_toml_str("[database").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file_opens_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("drugs.db");
        let config_path = dir.path().join("clinic.toml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "[database]\npath = {:?}", db_path.to_string_lossy()).unwrap();

        let config = CoreConfig::from_file(&config_path).unwrap();
        assert!(config.open_database().is_ok());
        assert!(db_path.exists());
    }

    #[test]
    fn test_missing_file() {
        let err = CoreConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

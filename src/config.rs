//! Application configuration
//!
//! Values come from built-in defaults, then an optional JSON config file,
//! then the environment, then command-line flags (applied by the caller).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable overriding the database path
pub const ENV_DATABASE: &str = "MAINTCMD_DB";

const APP_DIR: &str = "maintcmd";
const CONFIG_FILE: &str = "config.json";
const DATABASE_FILE: &str = "maintenance.db";

const DEFAULT_STATUSES: &[&str] = &["Pending", "In Progress", "Completed", "Cancelled"];
const DEFAULT_PRIORITIES: &[&str] = &["Low", "Medium", "High", "Urgent"];

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Could not find config directory")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file; `None` means the per-user default location
    pub database: Option<PathBuf>,
    /// Status names offered when creating or editing a job
    pub statuses: Vec<String>,
    /// Priority labels offered when creating or editing a job
    pub priorities: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: None,
            statuses: DEFAULT_STATUSES.iter().map(|s| s.to_string()).collect(),
            priorities: DEFAULT_PRIORITIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from the default location if it
    /// exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            },
        };

        if let Ok(db) = env::var(ENV_DATABASE) {
            if db.trim().is_empty() {
                warn!("{} is set but empty, ignoring", ENV_DATABASE);
            } else {
                config.database = Some(PathBuf::from(db));
            }
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Both option lists must be non-empty, with no blank or repeated entries
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_options("statuses", &self.statuses)?;
        validate_options("priorities", &self.priorities)?;
        Ok(())
    }

    /// The configured database path, or the per-user default
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database {
            Some(p) => Ok(p.clone()),
            None => {
                let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
                Ok(dir.join(APP_DIR).join(DATABASE_FILE))
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

fn validate_options(field: &str, options: &[String]) -> Result<(), ConfigError> {
    if options.is_empty() {
        return Err(ConfigError::Validation {
            message: format!("'{}' must not be empty", field),
        });
    }

    let mut seen = HashSet::new();
    for option in options {
        if option.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("'{}' contains a blank entry", field),
            });
        }
        if !seen.insert(option.as_str()) {
            return Err(ConfigError::Validation {
                message: format!("'{}' lists '{}' more than once", field, option),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.statuses.contains(&"Pending".to_string()));
        assert!(config.priorities.contains(&"High".to_string()));
        assert!(config.database.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{"priorities": ["Normal", "Emergency"]}"#).unwrap();
        assert_eq!(config.priorities, vec!["Normal", "Emergency"]);
        assert_eq!(config.statuses, AppConfig::default().statuses);
    }

    #[test]
    fn test_empty_list_rejected() {
        let err = AppConfig::from_json(r#"{"statuses": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_duplicate_and_blank_entries_rejected() {
        assert!(AppConfig::from_json(r#"{"statuses": ["Open", "Open"]}"#).is_err());
        assert!(AppConfig::from_json(r#"{"priorities": ["High", "  "]}"#).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = AppConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"database": "/tmp/jobs.db", "statuses": ["Open", "Closed"]}}"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/tmp/jobs.db")));
        assert_eq!(config.statuses, vec!["Open", "Closed"]);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/jobs.db"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}

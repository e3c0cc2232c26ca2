//! Process configuration from environment variables.
//!
//! # Responsibility
//! - Load an optional `.env` file, then read `APP_*` variables.
//! - Report missing or malformed settings as values, never by exiting.
//!
//! # Invariants
//! - `database` is never empty.
//! - `log_level` is one of the levels accepted by `init_logging`.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATABASE_VAR: &str = "APP_DATABASE";
pub const LOG_LEVEL_VAR: &str = "APP_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "APP_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
            Self::Invalid { key, message } => write!(f, "invalid setting `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Name of the optional settings file read from the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Loads `.env` into the process environment; a missing file is fine.
///
/// Variables already set in the environment win over the file.
fn load_dotenv() -> Result<(), ConfigError> {
    env_file_outcome(dotenvy::dotenv().map(|_| ()))
}

fn env_file_outcome(result: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Invalid {
            key: DOTENV_FILE,
            message: err.to_string(),
        }),
    }
}

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Store path, or `:memory:` for an ephemeral store.
    pub database: String,
    pub log_level: &'static str,
    /// Rolling log directory; stderr logging when `None`.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `.env` (when present) and the process environment.
    ///
    /// `overrides` is consulted first for every key, so command line flags
    /// win over both sources.
    ///
    /// # Errors
    /// - `ConfigError::Invalid` with key `.env` when the file cannot be parsed.
    /// - Any error of `from_lookup`.
    pub fn from_env(overrides: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        load_dotenv()?;
        Self::from_lookup(|key| overrides(key).or_else(|| std::env::var(key).ok()))
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database = value(DATABASE_VAR)
            .map(|value| value.trim().to_string())
            .ok_or(ConfigError::Missing(DATABASE_VAR))?;

        let log_level = match value(LOG_LEVEL_VAR) {
            Some(level) => normalize_level(&level).map_err(|message| ConfigError::Invalid {
                key: LOG_LEVEL_VAR,
                message,
            })?,
            None => default_log_level(),
        };

        let log_dir = value(LOG_DIR_VAR)
            .map(|dir| {
                normalize_log_dir(&dir).map_err(|message| ConfigError::Invalid {
                    key: LOG_DIR_VAR,
                    message,
                })
            })
            .transpose()?;

        Ok(Self {
            database,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        env_file_outcome, AppConfig, ConfigError, DATABASE_VAR, DOTENV_FILE, LOG_DIR_VAR,
        LOG_LEVEL_VAR,
    };
    use crate::logging::default_log_level;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn database_is_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(DATABASE_VAR));

        let blank = AppConfig::from_lookup(lookup(&[(DATABASE_VAR, "  ")])).unwrap_err();
        assert_eq!(blank, ConfigError::Missing(DATABASE_VAR));
    }

    #[test]
    fn optional_settings_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[(DATABASE_VAR, ":memory:")])).unwrap();
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.log_level, default_log_level());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn log_level_is_normalized() {
        let config = AppConfig::from_lookup(lookup(&[
            (DATABASE_VAR, "quotes.db"),
            (LOG_LEVEL_VAR, " WARNING "),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn invalid_log_settings_are_reported_with_their_key() {
        let level = AppConfig::from_lookup(lookup(&[
            (DATABASE_VAR, "quotes.db"),
            (LOG_LEVEL_VAR, "verbose"),
        ]))
        .unwrap_err();
        assert!(matches!(level, ConfigError::Invalid { key, .. } if key == LOG_LEVEL_VAR));

        let dir = AppConfig::from_lookup(lookup(&[
            (DATABASE_VAR, "quotes.db"),
            (LOG_DIR_VAR, "relative/logs"),
        ]))
        .unwrap_err();
        assert!(matches!(dir, ConfigError::Invalid { key, .. } if key == LOG_DIR_VAR));
    }

    #[test]
    fn from_env_prefers_overrides() {
        let config = AppConfig::from_env(|key| {
            (key == DATABASE_VAR).then(|| "override.db".to_string())
        })
        .unwrap();
        assert_eq!(config.database, "override.db");
    }

    #[test]
    fn missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let result = dotenvy::from_path(dir.path().join("absent.env"));
        assert_eq!(env_file_outcome(result), Ok(()));
    }

    #[test]
    fn malformed_env_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.env");
        std::fs::write(&path, "APP DATABASE quotes.db\n").unwrap();

        let err = env_file_outcome(dotenvy::from_path(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == DOTENV_FILE));
    }
}

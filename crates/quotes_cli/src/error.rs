//! CLI failure type and exit-code mapping.

use quotes_core::{ConfigError, DbError, ErrorOutcome, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const EXIT_INTERNAL: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 2;
pub const EXIT_CONFLICT: u8 = 3;
pub const EXIT_NOT_FOUND: u8 = 4;

#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Logging(String),
    Db(DbError),
    Repo(RepoError),
    Output(serde_json::Error),
}

impl CliError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Logging(_) => EXIT_INVALID_INPUT,
            Self::Db(_) | Self::Output(_) => EXIT_INTERNAL,
            Self::Repo(err) => match err.outcome() {
                ErrorOutcome::Conflict => EXIT_CONFLICT,
                ErrorOutcome::NotFound => EXIT_NOT_FOUND,
                ErrorOutcome::InvalidInput => EXIT_INVALID_INPUT,
                ErrorOutcome::Internal => EXIT_INTERNAL,
            },
        }
    }

    /// Message safe to show to the user; internal details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            Self::Repo(err) => match err.outcome() {
                ErrorOutcome::Conflict => "quote already exists".to_string(),
                ErrorOutcome::NotFound => match err {
                    RepoError::EmptyStore => "no quotes stored".to_string(),
                    _ => "entry with this id not found".to_string(),
                },
                ErrorOutcome::InvalidInput => err.to_string(),
                ErrorOutcome::Internal => "internal error".to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "failed to initialize logging: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(_) => None,
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, EXIT_CONFLICT, EXIT_INTERNAL, EXIT_INVALID_INPUT, EXIT_NOT_FOUND};
    use quotes_core::{ConfigError, RepoError};

    #[test]
    fn repository_outcomes_map_to_distinct_exit_codes() {
        let duplicate = CliError::Repo(RepoError::Duplicate {
            author: "A".to_string(),
        });
        assert_eq!(duplicate.exit_code(), EXIT_CONFLICT);
        assert_eq!(duplicate.public_message(), "quote already exists");

        let missing = CliError::Repo(RepoError::NotFound(9));
        assert_eq!(missing.exit_code(), EXIT_NOT_FOUND);

        let empty = CliError::Repo(RepoError::EmptyStore);
        assert_eq!(empty.exit_code(), EXIT_NOT_FOUND);
        assert_eq!(empty.public_message(), "no quotes stored");

        let drift = CliError::Repo(RepoError::Consistency("drift".to_string()));
        assert_eq!(drift.exit_code(), EXIT_INTERNAL);
        assert_eq!(drift.public_message(), "internal error");
    }

    #[test]
    fn configuration_errors_are_invalid_input() {
        let err = CliError::Config(ConfigError::Missing("APP_DATABASE"));
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);
        assert!(err.public_message().contains("APP_DATABASE"));
    }
}

//! SQLite store bootstrap and schema initialization entry points.
//!
//! # Responsibility
//! - Open file or in-memory SQLite stores for the quote repository.
//! - Ensure the quotes schema and the live counter row exist.
//! - Expose the store error capability used to classify constraint failures.
//!
//! # Invariants
//! - A `Store` handed out by this module always has its schema in place.
//! - Schema statements are create-if-absent, so reopening is a no-op.
//! - Repository code must not touch quote data before `open_store` succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_store, open_store_in_memory, Store, MEMORY_PATH};

pub type DbResult<T> = Result<T, DbError>;

/// Startup failures of the storage initializer. Both are fatal for callers.
#[derive(Debug)]
pub enum DbError {
    /// Store could not be opened or did not answer a connectivity query.
    Connection(rusqlite::Error),
    /// Schema transaction failed and was rolled back.
    Schema(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "store connection failed: {err}"),
            Self::Schema(err) => write!(f, "store schema initialization failed: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) | Self::Schema(err) => Some(err),
        }
    }
}

/// Capability check for store errors caused by a uniqueness constraint.
///
/// Repository code classifies duplicates through this trait only, so the
/// engine-specific error code lives next to the engine adapter.
pub trait UniqueViolation {
    fn is_unique_violation(&self) -> bool;
}

impl UniqueViolation for rusqlite::Error {
    fn is_unique_violation(&self) -> bool {
        match self {
            rusqlite::Error::SqliteFailure(err, _) => {
                err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UniqueViolation;
    use rusqlite::ffi;

    fn failure(extended_code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(extended_code), None)
    }

    #[test]
    fn unique_constraint_is_classified_as_violation() {
        assert!(failure(ffi::SQLITE_CONSTRAINT_UNIQUE).is_unique_violation());
    }

    #[test]
    fn other_constraints_are_not_unique_violations() {
        assert!(!failure(ffi::SQLITE_CONSTRAINT_NOTNULL).is_unique_violation());
        assert!(!failure(ffi::SQLITE_CONSTRAINT_PRIMARYKEY).is_unique_violation());
        assert!(!rusqlite::Error::QueryReturnedNoRows.is_unique_violation());
    }
}

//! Core domain logic for the quotes store.
//! This crate owns the transactional quote repository and its storage
//! bootstrap; callers go through `QuoteService` or `QuoteRepository`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use db::{open_store, open_store_in_memory, DbError, DbResult, Store, UniqueViolation};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::quote::{NewQuote, Quote, QuoteId, QuoteValidationError};
pub use repo::quote_repo::{
    ErrorOutcome, QuoteListing, QuoteRepository, RepoError, RepoResult, SqliteQuoteRepository,
};
pub use service::quote_service::QuoteService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

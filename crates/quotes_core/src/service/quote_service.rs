//! Quote use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for quote callers.
//! - Reject blank author/text before the repository sees them.
//!
//! # Invariants
//! - Service APIs never bypass repository transactions.
//! - Service layer remains storage-agnostic.

use crate::model::quote::{NewQuote, Quote, QuoteId};
use crate::repo::quote_repo::{QuoteListing, QuoteRepository, RepoResult};

/// Use-case service wrapper for quote operations.
pub struct QuoteService<R: QuoteRepository> {
    repo: R,
}

impl<R: QuoteRepository> QuoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new quote.
    ///
    /// # Contract
    /// - Author and text are trimmed; blank values fail with
    ///   `RepoError::Validation` and nothing is written.
    /// - Duplicate pairs fail with `RepoError::Duplicate`.
    pub fn add_quote(&self, author: &str, text: &str) -> RepoResult<Quote> {
        let draft = NewQuote::new(author, text)?;
        self.repo.save(draft.author(), draft.text())
    }

    /// Lists quotes, filtered by exact author when `author` is not blank.
    pub fn list_quotes(&self, author: Option<&str>) -> RepoResult<QuoteListing> {
        self.repo.get_all_param(author.map(str::trim).unwrap_or_default())
    }

    /// Returns one random quote.
    pub fn random_quote(&self) -> RepoResult<Quote> {
        self.repo.get_random()
    }

    /// Deletes a quote by id.
    pub fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        self.repo.delete(id)
    }
}

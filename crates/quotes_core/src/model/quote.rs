//! Quote domain model.
//!
//! # Responsibility
//! - Define the persisted quote record returned by the repository.
//! - Validate caller input before it reaches the repository.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store and never edited.
//! - `NewQuote` fields are trimmed and non-empty.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned, monotonically increasing quote identifier.
pub type QuoteId = i64;

/// Persisted quote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Positive id assigned on insert.
    pub id: QuoteId,
    pub author: String,
    /// Serialized as `quote` to match the external payload naming.
    #[serde(rename = "quote")]
    pub text: String,
    /// Unix epoch milliseconds assigned by the store at insert time.
    pub created_at: i64,
}

/// Validation failures for caller-provided quote fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyAuthor,
    EmptyText,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAuthor => write!(f, "author must not be empty"),
            Self::EmptyText => write!(f, "quote text must not be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

/// Validated input for creating a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    author: String,
    text: String,
}

impl NewQuote {
    /// Trims both fields and rejects blank values.
    pub fn new(author: &str, text: &str) -> Result<Self, QuoteValidationError> {
        let author = author.trim();
        if author.is_empty() {
            return Err(QuoteValidationError::EmptyAuthor);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }

        Ok(Self {
            author: author.to_string(),
            text: text.to_string(),
        })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

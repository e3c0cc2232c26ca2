//! Domain model for stored quotes.
//!
//! # Invariants
//! - A persisted quote is identified by a store-assigned `QuoteId` that is
//!   never reused after deletion.
//! - `(author, text)` is unique among live quotes.

pub mod quote;

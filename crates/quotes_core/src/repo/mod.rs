//! Repository layer contracts and SQLite persistence.
//!
//! # Responsibility
//! - Turn quote use-cases into single SQLite transactions.
//! - Keep SQL and counter bookkeeping inside the persistence boundary.
//!
//! # Invariants
//! - Every operation commits on success and rolls back on any error.
//! - The live counter changes in the same transaction as the row it counts.
//! - Repository APIs return semantic errors (`Duplicate`, `NotFound`,
//!   `EmptyStore`, `Consistency`) in addition to transport errors.

pub mod quote_repo;

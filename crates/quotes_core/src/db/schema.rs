//! Idempotent schema for the quotes store.
//!
//! # Invariants
//! - Every statement is create-if-absent / insert-if-absent.
//! - All statements run in one IMMEDIATE transaction; a failure leaves no
//!   partial schema behind.
//! - The `quotes` counter row is seeded from the real row count, so a store
//!   that lost its counter row starts in agreement with its data.
//! - Counter triggers are only dropped once an existing `quotes` table has
//!   been checked to carry the columns the repository reads and writes.

use rusqlite::{Connection, TransactionBehavior};

/// Name of the table holding quote rows.
pub const QUOTES_TABLE: &str = "quotes";
/// Name of the table holding live row counters.
pub const COUNTERS_TABLE: &str = "counters";
/// Key of the counter row that tracks `quotes`.
pub const QUOTES_COUNTER_KEY: &str = "quotes";

const SCHEMA_SQL: &str = include_str!("schema.sql");
const DROP_COUNTER_TRIGGERS_SQL: &str = include_str!("drop_counter_triggers.sql");

/// Creates tables, index and counter row when they are missing.
///
/// # Errors
/// - Any failing statement, including a pre-existing `quotes` table without
///   `id`, `author`, `text` or `created_at`. Nothing is committed then.
pub fn ensure_schema(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.prepare("SELECT id, author, text, created_at FROM quotes LIMIT 0;")?;
    tx.execute_batch(DROP_COUNTER_TRIGGERS_SQL)?;
    tx.commit()
}

//! Quote repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/list/random/delete over the `quotes` table.
//! - Maintain the `counters` row for `quotes` alongside every mutation.
//! - Classify store failures into caller-meaningful error kinds.
//!
//! # Invariants
//! - Counter updates must touch exactly one row or the mutation rolls back.
//! - Random selection reads the counter and scans the offset inside one
//!   transaction, so both observe the same snapshot.
//! - Open statements and transactions are released on every exit path
//!   (uncommitted transactions roll back on drop).

use crate::db::schema::{COUNTERS_TABLE, QUOTES_COUNTER_KEY, QUOTES_TABLE};
use crate::db::{Store, UniqueViolation};
use crate::model::quote::{Quote, QuoteId, QuoteValidationError};
use log::{debug, error, warn};
use rand::Rng;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const QUOTE_SELECT_SQL: &str = "SELECT
    id,
    author,
    text,
    created_at
FROM quotes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for quote persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// `(author, text)` already exists.
    Duplicate { author: String },
    /// No quote with the given id.
    NotFound(QuoteId),
    /// Random pick requested while the live count is zero.
    EmptyStore,
    /// Live counter disagrees with the rows it tracks.
    Consistency(String),
    /// Begin/prepare/exec/scan/commit failure not otherwise classified.
    Transaction(rusqlite::Error),
    /// Caller input rejected before reaching the store.
    Validation(QuoteValidationError),
    MissingRequiredTable(&'static str),
    MissingCounterRow,
}

/// Caller-facing outcome class for a repository error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOutcome {
    Conflict,
    NotFound,
    InvalidInput,
    Internal,
}

impl RepoError {
    /// Maps the error kind to the outcome a caller should report.
    pub fn outcome(&self) -> ErrorOutcome {
        match self {
            Self::Duplicate { .. } => ErrorOutcome::Conflict,
            Self::NotFound(_) | Self::EmptyStore => ErrorOutcome::NotFound,
            Self::Validation(_) => ErrorOutcome::InvalidInput,
            Self::Consistency(_)
            | Self::Transaction(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingCounterRow => ErrorOutcome::Internal,
        }
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Duplicate { .. } => "duplicate",
            Self::NotFound(_) => "not_found",
            Self::EmptyStore => "empty_store",
            Self::Consistency(_) => "consistency",
            Self::Transaction(_) => "transaction",
            Self::Validation(_) => "validation",
            Self::MissingRequiredTable(_) => "missing_table",
            Self::MissingCounterRow => "missing_counter_row",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate { author } => {
                write!(f, "quote already exists for author `{author}`")
            }
            Self::NotFound(id) => write!(f, "quote not found: {id}"),
            Self::EmptyStore => write!(f, "no quotes stored"),
            Self::Consistency(message) => write!(f, "quote counter inconsistency: {message}"),
            Self::Transaction(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingCounterRow => {
                write!(f, "missing counter row `{QUOTES_COUNTER_KEY}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transaction(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Transaction(value)
    }
}

impl From<QuoteValidationError> for RepoError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Quotes returned by a listing, with the size of this result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteListing {
    pub quotes: Vec<Quote>,
    /// Length of `quotes`, not the store total.
    pub count: usize,
}

/// Repository interface for quote operations.
pub trait QuoteRepository {
    /// Inserts a quote and returns it with store-assigned fields.
    fn save(&self, author: &str, text: &str) -> RepoResult<Quote>;
    /// Lists all quotes, or only those by `author` when it is non-empty.
    fn get_all_param(&self, author: &str) -> RepoResult<QuoteListing>;
    /// Picks a uniformly random live quote.
    fn get_random(&self) -> RepoResult<Quote>;
    /// Deletes one quote by id.
    fn delete(&self, id: QuoteId) -> RepoResult<()>;
}

/// SQLite-backed quote repository.
pub struct SqliteQuoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuoteRepository<'conn> {
    /// Constructs a repository from a schema-ready store.
    pub fn try_new(store: &'conn Store) -> RepoResult<Self> {
        let conn = store.connection();
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Random pick with a caller-supplied generator for the offset.
    pub fn get_random_with<R: Rng>(&self, rng: &mut R) -> RepoResult<Quote> {
        let started_at = Instant::now();
        let result = self.pick_random(rng);
        match &result {
            Ok(quote) => debug!(
                "event=quote_random module=repo status=ok id={} duration_ms={}",
                quote.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("quote_random", started_at, err),
        }
        result
    }

    fn insert_quote(&self, author: &str, text: &str) -> RepoResult<Quote> {
        let tx = begin(self.conn, TransactionBehavior::Immediate)?;

        match tx.execute(
            "INSERT INTO quotes (author, text) VALUES (?1, ?2);",
            params![author, text],
        ) {
            Ok(_) => {}
            Err(err) if err.is_unique_violation() => {
                return Err(RepoError::Duplicate {
                    author: author.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        }
        let id = tx.last_insert_rowid();
        adjust_live_count(&tx, 1)?;

        let quote = tx.query_row(
            &format!("{QUOTE_SELECT_SQL} WHERE id = ?1;"),
            [id],
            quote_from_row,
        )?;
        tx.commit()?;
        Ok(quote)
    }

    fn list_quotes(&self, author: &str) -> RepoResult<QuoteListing> {
        let tx = begin(self.conn, TransactionBehavior::Deferred)?;
        let quotes = load_quotes(&tx, author)?;
        tx.commit()?;

        let count = quotes.len();
        Ok(QuoteListing { quotes, count })
    }

    fn pick_random<R: Rng>(&self, rng: &mut R) -> RepoResult<Quote> {
        let tx = begin(self.conn, TransactionBehavior::Deferred)?;

        let live_count = read_live_count(&tx)?;
        if live_count < 0 {
            return Err(RepoError::Consistency(format!(
                "live count is negative ({live_count})"
            )));
        }
        if live_count == 0 {
            return Err(RepoError::EmptyStore);
        }

        let offset = rng.random_range(0..live_count);
        let picked = tx
            .query_row(
                &format!("{QUOTE_SELECT_SQL} ORDER BY id ASC LIMIT 1 OFFSET ?1;"),
                [offset],
                quote_from_row,
            )
            .optional()?;
        let Some(quote) = picked else {
            return Err(RepoError::Consistency(format!(
                "live count is {live_count} but no quote exists at offset {offset}"
            )));
        };

        tx.commit()?;
        Ok(quote)
    }

    fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        let tx = begin(self.conn, TransactionBehavior::Immediate)?;

        let changed = tx.execute("DELETE FROM quotes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        adjust_live_count(&tx, -1)?;

        tx.commit()?;
        Ok(())
    }
}

impl QuoteRepository for SqliteQuoteRepository<'_> {
    fn save(&self, author: &str, text: &str) -> RepoResult<Quote> {
        let started_at = Instant::now();
        let result = self.insert_quote(author, text);
        match &result {
            Ok(quote) => debug!(
                "event=quote_save module=repo status=ok id={} duration_ms={}",
                quote.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("quote_save", started_at, err),
        }
        result
    }

    fn get_all_param(&self, author: &str) -> RepoResult<QuoteListing> {
        let started_at = Instant::now();
        let result = self.list_quotes(author);
        match &result {
            Ok(listing) => debug!(
                "event=quote_list module=repo status=ok filtered={} count={} duration_ms={}",
                !author.is_empty(),
                listing.count,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("quote_list", started_at, err),
        }
        result
    }

    fn get_random(&self) -> RepoResult<Quote> {
        self.get_random_with(&mut rand::rng())
    }

    fn delete(&self, id: QuoteId) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self.delete_quote(id);
        match &result {
            Ok(()) => debug!(
                "event=quote_delete module=repo status=ok id={id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("quote_delete", started_at, err),
        }
        result
    }
}

fn begin(conn: &Connection, behavior: TransactionBehavior) -> rusqlite::Result<Transaction<'_>> {
    Transaction::new_unchecked(conn, behavior)
}

fn load_quotes(tx: &Transaction<'_>, author: &str) -> RepoResult<Vec<Quote>> {
    let mut sql = String::from(QUOTE_SELECT_SQL);
    let mut bind_values: Vec<Value> = Vec::new();

    if !author.is_empty() {
        sql.push_str(" WHERE author = ?");
        bind_values.push(Value::Text(author.to_string()));
    }
    sql.push_str(" ORDER BY id ASC;");

    let mut stmt = tx.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut quotes = Vec::new();
    while let Some(row) = rows.next()? {
        quotes.push(quote_from_row(row)?);
    }

    Ok(quotes)
}

fn read_live_count(tx: &Transaction<'_>) -> RepoResult<i64> {
    tx.query_row(
        "SELECT count_value FROM counters WHERE table_name = ?1;",
        [QUOTES_COUNTER_KEY],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| RepoError::Consistency(format!("counter row `{QUOTES_COUNTER_KEY}` is missing")))
}

fn adjust_live_count(tx: &Transaction<'_>, delta: i64) -> RepoResult<()> {
    let changed = tx.execute(
        "UPDATE counters
         SET count_value = count_value + ?1
         WHERE table_name = ?2;",
        params![delta, QUOTES_COUNTER_KEY],
    )?;
    if changed != 1 {
        return Err(RepoError::Consistency(format!(
            "counter update for `{QUOTES_COUNTER_KEY}` touched {changed} rows"
        )));
    }
    Ok(())
}

fn quote_from_row(row: &Row<'_>) -> rusqlite::Result<Quote> {
    Ok(Quote {
        id: row.get("id")?,
        author: row.get("author")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
    })
}

fn log_failure(event: &str, started_at: Instant, err: &RepoError) {
    let duration_ms = started_at.elapsed().as_millis();
    let error_code = err.code();
    match err.outcome() {
        ErrorOutcome::Internal => error!(
            "event={event} module=repo status=error duration_ms={duration_ms} error_code={error_code} error={err}"
        ),
        _ => warn!(
            "event={event} module=repo status=rejected duration_ms={duration_ms} error_code={error_code} error={err}"
        ),
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    for table in [QUOTES_TABLE, COUNTERS_TABLE] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    let has_counter: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM counters
            WHERE table_name = ?1
        );",
        [QUOTES_COUNTER_KEY],
        |row| row.get(0),
    )?;
    if has_counter != 1 {
        return Err(RepoError::MissingCounterRow);
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

//! Store bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas and lock waiting.
//! - Check connectivity and run the schema transaction before returning.
//!
//! # Invariants
//! - Returned stores have `foreign_keys=ON` and a busy timeout.
//! - Returned stores have the full schema applied.

use super::schema::{ensure_schema, QUOTES_COUNTER_KEY};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// Path value selecting a private, non-persisted store.
pub const MEMORY_PATH: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opened, schema-ready handle to the quotes store.
///
/// One handle wraps one connection. Concurrent callers open their own
/// handle against the same path and rely on SQLite locking.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Returns the underlying connection for repositories and diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Reads the live counter for the quotes table.
    ///
    /// Returns `None` when the counter row is missing.
    pub fn live_count(&self) -> rusqlite::Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT count_value FROM counters WHERE table_name = ?1;",
                [QUOTES_COUNTER_KEY],
                |row| row.get(0),
            )
            .optional()
    }
}

/// Opens the store at `path` and ensures its schema.
///
/// `MEMORY_PATH` opens an ephemeral store private to this handle.
///
/// # Errors
/// - `DbError::Connection` when the file cannot be opened or queried.
/// - `DbError::Schema` when schema creation fails.
pub fn open_store(path: impl AsRef<Path>) -> DbResult<Store> {
    let path = path.as_ref();
    if path == Path::new(MEMORY_PATH) {
        return open_store_in_memory();
    }
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory store and ensures its schema.
pub fn open_store_in_memory() -> DbResult<Store> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Store> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    match bootstrap(connect) {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(Store { conn })
        }
        Err(err) => {
            let error_code = match &err {
                DbError::Connection(_) => "db_open_failed",
                DbError::Schema(_) => "db_schema_failed",
            };
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={error_code} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn bootstrap(connect: impl FnOnce() -> rusqlite::Result<Connection>) -> DbResult<Connection> {
    let mut conn = connect().map_err(DbError::Connection)?;
    check_connection(&conn).map_err(DbError::Connection)?;
    configure(&mut conn).map_err(DbError::Connection)?;
    init_schema(&mut conn).map_err(DbError::Schema)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> rusqlite::Result<()> {
    let started_at = Instant::now();
    info!("event=schema_init module=db status=start");

    match ensure_schema(conn) {
        Ok(()) => {
            info!(
                "event=schema_init module=db status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_init module=db status=error duration_ms={} error_code=schema_rolled_back error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

// Reads the schema table so an unreadable or non-database file fails here.
fn check_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.query_row("SELECT COUNT(*) FROM sqlite_master;", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(())
}

fn configure(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)
}

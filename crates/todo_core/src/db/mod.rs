//! SQLite connection bootstrap for the todo store.
//!
//! # Responsibility
//! - Open file or in-memory connections and make sure the `todos` table exists.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`; `0` means a fresh file.
//! - A file stamped with a newer version is refused, never rewritten.

use crate::store::todo_store::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Version stamped on databases holding the current `todos` table.
pub const TODO_SCHEMA_VERSION: u32 = 1;

const TODO_SCHEMA_SQL: &str = include_str!("todos_v1.sql");
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the todo database at `path`.
///
/// # Side effects
/// - Creates the file and the `todos` table on first use.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> StoreResult<Connection> {
    let path = path.as_ref();
    open_with("file", || Connection::open(path))
}

/// Opens an empty in-memory todo database.
pub fn open_db_in_memory() -> StoreResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

/// Reads the schema version stamped on `conn`.
pub fn schema_version(conn: &Connection) -> StoreResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StoreResult<Connection> {
    let started_at = Instant::now();
    let opened = connect()
        .map_err(StoreError::from)
        .and_then(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            ensure_todo_schema(&conn)?;
            Ok(conn)
        });

    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} schema_version={TODO_SCHEMA_VERSION} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    opened
}

fn ensure_todo_schema(conn: &Connection) -> StoreResult<()> {
    match schema_version(conn)? {
        TODO_SCHEMA_VERSION => Ok(()),
        0 => {
            conn.execute_batch(&format!(
                "BEGIN;
                 {TODO_SCHEMA_SQL}
                 PRAGMA user_version = {TODO_SCHEMA_VERSION};
                 COMMIT;"
            ))?;
            info!("event=db_schema module=db status=created version={TODO_SCHEMA_VERSION}");
            Ok(())
        }
        found => Err(StoreError::UnsupportedSchema {
            found,
            supported: TODO_SCHEMA_VERSION,
        }),
    }
}

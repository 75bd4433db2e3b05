//! Todo store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/delete over the `todos` table.
//! - Publish the full ordered result set after each successful mutation.
//!
//! # Invariants
//! - The post-mutation re-query and publish happen while the connection is
//!   held, so subscribers observe snapshots in mutation order.
//! - A failed re-query is delivered to subscribers as an error item.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Update/delete of an id with no row is a no-op: nothing changes, nothing
//!   is published, and the call succeeds.

use crate::db::{open_db, open_db_in_memory};
use crate::model::todo::TodoId;
use crate::store::live::{LivePublisher, LiveSubscription};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    isCompleted,
    createdAt
FROM todos";

const TODO_ORDER_SQL: &str = "ORDER BY createdAt DESC, id DESC";

pub type StoreResult<T> = Result<T, StoreError>;

/// One item of the live read query.
pub type StoreSnapshot = Result<Arc<Vec<TodoRecord>>, Arc<StoreError>>;

/// Subscriber handle returned by [`TodoStore::subscribe`].
pub type TodoSubscription = LiveSubscription<StoreSnapshot>;

/// Persistence error for todo storage operations.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// The database file carries a todo schema this binary does not know.
    UnsupportedSchema { found: u32, supported: u32 },
    /// Update/delete was asked for a record that was never persisted.
    MissingId,
    InvalidData(String),
    LockPoisoned,
    /// The worker task running a store call failed or was cancelled.
    Worker(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchema { found, supported } => write!(
                f,
                "todo database uses schema version {found}; this build supports up to {supported}"
            ),
            Self::MissingId => write!(f, "todo has no id; it was never saved"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::LockPoisoned => write!(f, "todo store is unavailable after a panic"),
            Self::Worker(message) => write!(f, "todo store task failed: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Row shape of the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRecord {
    pub id: Option<TodoId>,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub created_at: i64,
}

/// Storage contract for todo rows.
pub trait TodoStore: Send + Sync {
    /// All rows ordered by `createdAt DESC, id DESC`.
    fn list(&self) -> StoreResult<Vec<TodoRecord>>;
    fn get(&self, id: TodoId) -> StoreResult<Option<TodoRecord>>;
    /// Inserts a row and returns its id. A record that already carries an id
    /// replaces the row with that id.
    fn insert(&self, record: &TodoRecord) -> StoreResult<TodoId>;
    /// Rewrites the row with the record's id; a missing row is left missing.
    fn update(&self, record: &TodoRecord) -> StoreResult<()>;
    /// Erases the row with the record's id; a missing row is not an error.
    fn delete(&self, record: &TodoRecord) -> StoreResult<()>;
    /// Opens a live query whose first item is the current result set.
    fn subscribe(&self) -> StoreResult<TodoSubscription>;
}

/// SQLite-backed todo store.
pub struct SqliteTodoStore {
    conn: Mutex<Connection>,
    live: LivePublisher<StoreSnapshot>,
}

impl SqliteTodoStore {
    /// Wraps a connection whose todo schema is already in place.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            live: LivePublisher::default(),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Number of live subscribers currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.live.subscriber_count()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn publish(&self, conn: &Connection, cause: &'static str) {
        let snapshot = match query_all(conn) {
            Ok(records) => Ok(Arc::new(records)),
            Err(err) => {
                error!(
                    "event=store_publish module=store status=error cause={cause} error={err}"
                );
                Err(Arc::new(err))
            }
        };
        let reached = self.live.publish(snapshot);
        debug!("event=store_publish module=store status=ok cause={cause} subscribers={reached}");
    }
}

impl TodoStore for SqliteTodoStore {
    fn list(&self) -> StoreResult<Vec<TodoRecord>> {
        let conn = self.lock()?;
        query_all(&conn)
    }

    fn get(&self, id: TodoId) -> StoreResult<Option<TodoRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn insert(&self, record: &TodoRecord) -> StoreResult<TodoId> {
        let conn = self.lock()?;
        let id = match record.id {
            Some(id) => {
                conn.execute(
                    "INSERT OR REPLACE INTO todos (
                        id,
                        title,
                        description,
                        isCompleted,
                        createdAt
                    ) VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        id,
                        record.title.as_str(),
                        record.description.as_str(),
                        record.is_completed,
                        record.created_at,
                    ],
                )?;
                id
            }
            None => {
                conn.execute(
                    "INSERT INTO todos (
                        title,
                        description,
                        isCompleted,
                        createdAt
                    ) VALUES (?1, ?2, ?3, ?4);",
                    params![
                        record.title.as_str(),
                        record.description.as_str(),
                        record.is_completed,
                        record.created_at,
                    ],
                )?;
                conn.last_insert_rowid()
            }
        };

        self.publish(&conn, "insert");
        Ok(id)
    }

    fn update(&self, record: &TodoRecord) -> StoreResult<()> {
        let id = record.id.ok_or(StoreError::MissingId)?;
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE todos
             SET
                title = ?1,
                description = ?2,
                isCompleted = ?3,
                createdAt = ?4
             WHERE id = ?5;",
            params![
                record.title.as_str(),
                record.description.as_str(),
                record.is_completed,
                record.created_at,
                id,
            ],
        )?;

        if changed == 0 {
            debug!("event=store_update module=store status=noop todo_id={id}");
            return Ok(());
        }

        self.publish(&conn, "update");
        Ok(())
    }

    fn delete(&self, record: &TodoRecord) -> StoreResult<()> {
        let id = record.id.ok_or(StoreError::MissingId)?;
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM todos WHERE id = ?1;", [id])?;

        if changed == 0 {
            debug!("event=store_delete module=store status=noop todo_id={id}");
            return Ok(());
        }

        self.publish(&conn, "delete");
        Ok(())
    }

    fn subscribe(&self) -> StoreResult<TodoSubscription> {
        let conn = self.lock()?;
        let initial = query_all(&conn)?;
        Ok(self.live.subscribe(Ok(Arc::new(initial))))
    }
}

fn query_all(conn: &Connection) -> StoreResult<Vec<TodoRecord>> {
    let mut stmt = conn.prepare(&format!("{TODO_SELECT_SQL} {TODO_ORDER_SQL};"))?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();

    while let Some(row) = rows.next()? {
        records.push(parse_todo_row(row)?);
    }

    Ok(records)
}

fn parse_todo_row(row: &Row<'_>) -> StoreResult<TodoRecord> {
    let is_completed = match row.get::<_, i64>("isCompleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid isCompleted value `{other}` in todos.isCompleted"
            )));
        }
    };

    Ok(TodoRecord {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        description: row.get("description")?,
        is_completed,
        created_at: row.get("createdAt")?,
    })
}

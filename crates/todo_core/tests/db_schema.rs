use rusqlite::Connection;
use todo_core::db::{open_db, open_db_in_memory, schema_version, TODO_SCHEMA_VERSION};
use todo_core::StoreError;

#[test]
fn open_db_in_memory_creates_todos_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), TODO_SCHEMA_VERSION);
    assert_eq!(
        column_names(&conn, "todos"),
        ["id", "title", "description", "isCompleted", "createdAt"]
    );
}

#[test]
fn column_defaults_match_table_contract() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todos (title, createdAt) VALUES ('bare', 1);",
        [],
    )
    .unwrap();

    let (description, is_completed): (String, i64) = conn
        .query_row(
            "SELECT description, isCompleted FROM todos WHERE title = 'bare';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(description, "");
    assert_eq!(is_completed, 0);
}

#[test]
fn reopening_file_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO todos (title, createdAt) VALUES ('persisted', 1);",
        [],
    )
    .unwrap();
    drop(conn);

    let reopened = open_db(&path).unwrap();
    assert_eq!(schema_version(&reopened).unwrap(), TODO_SCHEMA_VERSION);
    let count: i64 = reopened
        .query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn newer_schema_version_is_refused_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match &err {
        StoreError::UnsupportedSchema { found, supported } => {
            assert_eq!(*found, 999);
            assert_eq!(*supported, TODO_SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("schema version 999"));

    let untouched = Connection::open(&path).unwrap();
    let tables: i64 = untouched
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'todos';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}

fn column_names(conn: &Connection, table_name: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table_name});"))
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

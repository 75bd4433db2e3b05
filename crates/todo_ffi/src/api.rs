//! FFI presentation API for the todo screen.
//!
//! # Responsibility
//! - Expose the screen state snapshot and user intents to Dart via FRB.
//! - Own the per-process session: tokio runtime, object graph, view model.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Intents are fire-and-forget; their outcome shows up in `todo_ui_state`.
//! - One session per process; reopening with another database path is rejected.

use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Todo, TodoApp, TodoConfig, TodoUiState, TodoViewModel,
};
use tokio::runtime::{Builder, Runtime};

const SESSION_WORKER_THREADS: usize = 2;
const SESSION_NOT_OPEN: &str = "todo session is not open; call todo_open first";

static SESSION: OnceLock<TodoSession> = OnceLock::new();

struct TodoSession {
    db_path: PathBuf,
    view_model: TodoViewModel,
    // Declared last so the view model is dropped before its runtime.
    _runtime: Runtime,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Exposes the core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path for rolling logs.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Screen state snapshot rendered by the Flutter todo screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoScreenState {
    /// Newest first.
    pub todos: Vec<TodoItem>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub show_add_dialog: bool,
}

/// Whether an FFI call was accepted, with a message for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    pub ok: bool,
    pub message: String,
}

impl TodoActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Opens the todo session over the SQLite file at `db_path`.
///
/// A blank `db_path` falls back to `TODO_DB_PATH` or the temp directory.
///
/// # FFI contract
/// - Sync call; opens the database and starts the live list query.
/// - Idempotent for the same path; a different path is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_open(db_path: String) -> TodoActionResponse {
    let mut config = TodoConfig::from_env();
    if !db_path.trim().is_empty() {
        config.db_path = PathBuf::from(db_path.trim());
    }

    match open_session(config) {
        Ok(session) => TodoActionResponse::success(format!(
            "Todo session open at {}.",
            session.db_path.display()
        )),
        Err(err) => TodoActionResponse::failure(format!("todo_open failed: {err}")),
    }
}

/// Returns the current screen state.
///
/// Before `todo_open`, returns an empty, not-loading state carrying an error.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_ui_state() -> TodoScreenState {
    match SESSION.get() {
        Some(session) => to_screen_state(session.view_model.snapshot()),
        None => TodoScreenState {
            todos: Vec::new(),
            is_loading: false,
            error: Some(SESSION_NOT_OPEN.to_string()),
            show_add_dialog: false,
        },
    }
}

/// Requests a new todo. Validation and storage failures land in `error`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(title: String, description: String) -> TodoActionResponse {
    with_session(|vm| {
        drop(vm.add_todo(title, description));
        Ok("Add requested.")
    })
}

/// Requests a completion flip for the listed todo with `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_toggle(id: i64) -> TodoActionResponse {
    with_session(|vm| {
        let todo = listed_todo(vm, id)?;
        drop(vm.toggle_todo(todo));
        Ok("Toggle requested.")
    })
}

/// Requests deletion of the listed todo with `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(id: i64) -> TodoActionResponse {
    with_session(|vm| {
        let todo = listed_todo(vm, id)?;
        drop(vm.delete_todo(todo));
        Ok("Delete requested.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_show_add_dialog() -> TodoActionResponse {
    with_session(|vm| {
        vm.show_add_dialog();
        Ok("Add dialog shown.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_hide_add_dialog() -> TodoActionResponse {
    with_session(|vm| {
        vm.hide_add_dialog();
        Ok("Add dialog hidden.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_clear_error() -> TodoActionResponse {
    with_session(|vm| {
        vm.clear_error();
        Ok("Error cleared.")
    })
}

fn open_session(config: TodoConfig) -> Result<&'static TodoSession, String> {
    if let Some(session) = SESSION.get() {
        return ensure_same_path(session, &config.db_path);
    }

    let runtime = Builder::new_multi_thread()
        .worker_threads(SESSION_WORKER_THREADS)
        .thread_name("todo-ffi")
        .enable_all()
        .build()
        .map_err(|err| format!("runtime start failed: {err}"))?;
    let app = TodoApp::open(&config).map_err(|err| format!("store open failed: {err}"))?;
    let view_model = app.view_model(runtime.handle().clone());

    if SESSION
        .set(TodoSession {
            db_path: config.db_path.clone(),
            view_model,
            _runtime: runtime,
        })
        .is_err()
    {
        warn!("event=ffi_session_open module=ffi status=race_lost");
    }

    match SESSION.get() {
        Some(session) => {
            info!(
                "event=ffi_session_open module=ffi status=ok db_path={}",
                session.db_path.display()
            );
            ensure_same_path(session, &config.db_path)
        }
        None => Err(SESSION_NOT_OPEN.to_string()),
    }
}

fn ensure_same_path<'s>(
    session: &'s TodoSession,
    db_path: &Path,
) -> Result<&'s TodoSession, String> {
    if session.db_path == db_path {
        Ok(session)
    } else {
        Err(format!(
            "session already open at `{}`; refusing to switch to `{}`",
            session.db_path.display(),
            db_path.display()
        ))
    }
}

fn with_session(
    intent: impl FnOnce(&TodoViewModel) -> Result<&'static str, String>,
) -> TodoActionResponse {
    let Some(session) = SESSION.get() else {
        return TodoActionResponse::failure(SESSION_NOT_OPEN);
    };
    match intent(&session.view_model) {
        Ok(message) => TodoActionResponse::success(message),
        Err(message) => TodoActionResponse::failure(message),
    }
}

fn listed_todo(vm: &TodoViewModel, id: i64) -> Result<Todo, String> {
    vm.snapshot()
        .todos
        .into_iter()
        .find(|todo| todo.id == Some(id))
        .ok_or_else(|| format!("todo {id} is not in the current list"))
}

fn to_screen_state(state: TodoUiState) -> TodoScreenState {
    TodoScreenState {
        todos: state.todos.into_iter().filter_map(to_todo_item).collect(),
        is_loading: state.is_loading,
        error: state.error,
        show_add_dialog: state.show_add_dialog,
    }
}

fn to_todo_item(todo: Todo) -> Option<TodoItem> {
    Some(TodoItem {
        id: todo.id?,
        title: todo.title,
        description: todo.description,
        is_completed: todo.is_completed,
        created_at: todo.created_at,
    })
}

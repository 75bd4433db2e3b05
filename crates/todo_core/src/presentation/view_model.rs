//! Todo screen state holder.
//!
//! # Invariants
//! - Every state change goes through `watch::Sender::send_modify`, so each
//!   transition is applied to the latest state and transitions never interleave.
//! - The list only changes when the store's live query emits; intents never
//!   edit `todos` optimistically.
//! - The live query task lives exactly as long as the view model.

use crate::error::TodoError;
use crate::model::todo::Todo;
use crate::usecase::{GetTodos, TodoUseCases};
use log::{debug, error};
use serde::Serialize;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const LOAD_FAILED_MESSAGE: &str = "An error occurred";
const ADD_FAILED_MESSAGE: &str = "Failed to add todo";
const UPDATE_FAILED_MESSAGE: &str = "Failed to update todo";
const DELETE_FAILED_MESSAGE: &str = "Failed to delete todo";

/// Snapshot rendered by the todo screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUiState {
    /// Newest first.
    pub todos: Vec<Todo>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub show_add_dialog: bool,
}

impl TodoUiState {
    /// State before the first list arrives.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }
}

type StateCell = Arc<watch::Sender<TodoUiState>>;

/// Holder of [`TodoUiState`] that forwards user intents to the use cases.
pub struct TodoViewModel {
    state: StateCell,
    use_cases: TodoUseCases,
    runtime: Handle,
    live_query: JoinHandle<()>,
}

impl TodoViewModel {
    /// Creates the holder and starts following the live todo list on `runtime`.
    pub fn new(use_cases: TodoUseCases, runtime: Handle) -> Self {
        let state: StateCell = Arc::new(watch::Sender::new(TodoUiState::loading()));
        let live_query = runtime.spawn(follow_todos(
            use_cases.get_todos.clone(),
            Arc::clone(&state),
        ));

        Self {
            state,
            use_cases,
            runtime,
            live_query,
        }
    }

    /// Read-only observable of the UI state.
    pub fn ui_state(&self) -> watch::Receiver<TodoUiState> {
        self.state.subscribe()
    }

    /// Copy of the current UI state.
    pub fn snapshot(&self) -> TodoUiState {
        self.state.borrow().clone()
    }

    /// Adds a todo; closes the add dialog on success, keeps it open on failure.
    pub fn add_todo(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> JoinHandle<()> {
        let add_todo = self.use_cases.add_todo.clone();
        let state = Arc::clone(&self.state);
        let title = title.into();
        let description = description.into();

        self.runtime.spawn(async move {
            match add_todo.execute(&title, &description).await {
                Ok(id) => {
                    debug!("event=intent_add module=presentation status=ok todo_id={id}");
                    state.send_modify(|ui| ui.show_add_dialog = false);
                }
                Err(err) => report_failure(&state, "intent_add", &err, ADD_FAILED_MESSAGE),
            }
        })
    }

    pub fn toggle_todo(&self, todo: Todo) -> JoinHandle<()> {
        let toggle_todo = self.use_cases.toggle_todo.clone();
        let state = Arc::clone(&self.state);

        self.runtime.spawn(async move {
            if let Err(err) = toggle_todo.execute(&todo).await {
                report_failure(&state, "intent_toggle", &err, UPDATE_FAILED_MESSAGE);
            }
        })
    }

    pub fn delete_todo(&self, todo: Todo) -> JoinHandle<()> {
        let delete_todo = self.use_cases.delete_todo.clone();
        let state = Arc::clone(&self.state);

        self.runtime.spawn(async move {
            if let Err(err) = delete_todo.execute(&todo).await {
                report_failure(&state, "intent_delete", &err, DELETE_FAILED_MESSAGE);
            }
        })
    }

    pub fn show_add_dialog(&self) {
        self.state.send_modify(|ui| ui.show_add_dialog = true);
    }

    pub fn hide_add_dialog(&self) {
        self.state.send_modify(|ui| ui.show_add_dialog = false);
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|ui| ui.error = None);
    }
}

impl Drop for TodoViewModel {
    fn drop(&mut self) {
        self.live_query.abort();
    }
}

async fn follow_todos(get_todos: GetTodos, state: StateCell) {
    let mut stream = match get_todos.execute().await {
        Ok(stream) => stream,
        Err(err) => {
            stop_loading_with_error(&state, &err);
            return;
        }
    };

    while let Some(item) = stream.next().await {
        match item {
            Ok(todos) => state.send_modify(|ui| {
                ui.todos = todos;
                ui.is_loading = false;
            }),
            Err(err) => {
                stop_loading_with_error(&state, &err);
                return;
            }
        }
    }

    debug!("event=live_query module=presentation status=closed");
}

fn stop_loading_with_error(state: &StateCell, err: &TodoError) {
    error!("event=live_query module=presentation status=error error={err}");
    let message = failure_message(err, LOAD_FAILED_MESSAGE);
    state.send_modify(|ui| {
        ui.is_loading = false;
        ui.error = Some(message);
    });
}

fn report_failure(state: &StateCell, event: &str, err: &TodoError, fallback: &str) {
    if err.is_validation() {
        debug!("event={event} module=presentation status=rejected error={err}");
    } else {
        error!("event={event} module=presentation status=error error={err}");
    }
    let message = failure_message(err, fallback);
    state.send_modify(|ui| ui.error = Some(message));
}

fn failure_message(err: &TodoError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

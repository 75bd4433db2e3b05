//! Core of the todo list app: storage, repository, use cases and the
//! screen state holder, wired together by [`TodoApp`].

pub mod app;
pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod repo;
pub mod store;
pub mod usecase;

pub use app::TodoApp;
pub use config::TodoConfig;
pub use data::local_source::{LocalTodoDataSource, TodoStream};
pub use error::{TodoError, TodoResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{Todo, TodoId};
pub use presentation::view_model::{TodoUiState, TodoViewModel};
pub use repo::todo_repo::TodoRepository;
pub use store::todo_store::{
    SqliteTodoStore, StoreError, StoreResult, TodoRecord, TodoStore, TodoSubscription,
};
pub use usecase::{AddTodo, DeleteTodo, GetTodos, TodoUseCases, ToggleTodo};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

//! Composition root: Store -> Data source -> Repository -> Use cases -> View model.

use crate::config::TodoConfig;
use crate::data::local_source::LocalTodoDataSource;
use crate::presentation::view_model::TodoViewModel;
use crate::repo::todo_repo::TodoRepository;
use crate::store::todo_store::{SqliteTodoStore, StoreResult, TodoStore};
use crate::usecase::TodoUseCases;
use log::info;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Fully wired todo object graph.
#[derive(Clone)]
pub struct TodoApp {
    repository: Arc<TodoRepository>,
    use_cases: TodoUseCases,
}

impl TodoApp {
    /// Opens the SQLite store at `config.db_path` and wires the graph over it.
    pub fn open(config: &TodoConfig) -> StoreResult<Self> {
        let store = SqliteTodoStore::open(&config.db_path)?;
        info!(
            "event=app_open module=app status=ok db_path={}",
            config.db_path.display()
        );
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Wires the graph over a fresh in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::with_store(Arc::new(SqliteTodoStore::open_in_memory()?)))
    }

    /// Wires the graph over any store implementation.
    pub fn with_store(store: Arc<dyn TodoStore>) -> Self {
        let source = LocalTodoDataSource::new(store);
        let repository = Arc::new(TodoRepository::new(source));
        let use_cases = TodoUseCases::new(Arc::clone(&repository));
        Self {
            repository,
            use_cases,
        }
    }

    pub fn repository(&self) -> &Arc<TodoRepository> {
        &self.repository
    }

    pub fn use_cases(&self) -> &TodoUseCases {
        &self.use_cases
    }

    /// Creates a view model whose tasks run on `runtime`.
    pub fn view_model(&self, runtime: Handle) -> TodoViewModel {
        TodoViewModel::new(self.use_cases.clone(), runtime)
    }
}

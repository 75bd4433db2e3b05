//! Todo repository over the local data source.
//!
//! # Invariants
//! - Each mutation runs as one blocking task and yields exactly one result.
//! - A failed or cancelled worker task is reported as a storage failure.

use crate::data::local_source::{LocalTodoDataSource, TodoStream};
use crate::error::TodoResult;
use crate::model::todo::{Todo, TodoId};
use crate::store::todo_store::{StoreError, StoreResult};
use log::{error, info};
use std::time::Instant;

/// Async repository wrapping [`LocalTodoDataSource`].
#[derive(Clone)]
pub struct TodoRepository {
    source: LocalTodoDataSource,
}

impl TodoRepository {
    pub fn new(source: LocalTodoDataSource) -> Self {
        Self { source }
    }

    /// Opens the live read query.
    pub async fn todos(&self) -> TodoResult<TodoStream> {
        self.run("todos_subscribe", |source| source.todos()).await
    }

    /// Reads one todo by id.
    pub async fn get(&self, id: TodoId) -> TodoResult<Option<Todo>> {
        self.run("todo_get", move |source| source.get(id)).await
    }

    /// Persists a new todo and returns the id the store assigned.
    pub async fn add(&self, todo: Todo) -> TodoResult<TodoId> {
        self.run("todo_add", move |source| source.add(&todo)).await
    }

    /// Writes every field of an already persisted todo.
    pub async fn update(&self, todo: Todo) -> TodoResult<()> {
        self.run("todo_update", move |source| source.update(&todo)).await
    }

    /// Erases the todo with the same id.
    pub async fn delete(&self, todo: Todo) -> TodoResult<()> {
        self.run("todo_delete", move |source| source.delete(&todo)).await
    }

    async fn run<T, F>(&self, event: &'static str, call: F) -> TodoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&LocalTodoDataSource) -> StoreResult<T> + Send + 'static,
    {
        let started_at = Instant::now();
        let source = self.source.clone();
        let outcome = tokio::task::spawn_blocking(move || call(&source))
            .await
            .unwrap_or_else(|err| Err(StoreError::Worker(err.to_string())));

        match outcome {
            Ok(value) => {
                info!(
                    "event={event} module=repo status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event={event} module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

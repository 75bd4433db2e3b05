use crate::data::local_source::TodoStream;
use crate::error::TodoResult;
use crate::repo::todo_repo::TodoRepository;
use std::sync::Arc;

/// Opens the live, newest-first list of todos.
#[derive(Clone)]
pub struct GetTodos {
    repository: Arc<TodoRepository>,
}

impl GetTodos {
    pub fn new(repository: Arc<TodoRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> TodoResult<TodoStream> {
        self.repository.todos().await
    }
}

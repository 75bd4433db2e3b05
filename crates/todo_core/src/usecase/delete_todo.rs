use crate::error::TodoResult;
use crate::model::todo::Todo;
use crate::repo::todo_repo::TodoRepository;
use std::sync::Arc;

/// Removes a todo by its id.
#[derive(Clone)]
pub struct DeleteTodo {
    repository: Arc<TodoRepository>,
}

impl DeleteTodo {
    pub fn new(repository: Arc<TodoRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, todo: &Todo) -> TodoResult<()> {
        self.repository.delete(todo.clone()).await
    }
}

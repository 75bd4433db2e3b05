use crate::error::TodoResult;
use crate::model::todo::Todo;
use crate::repo::todo_repo::TodoRepository;
use std::sync::Arc;

/// Flips the completion flag of a persisted todo.
///
/// Two rapid toggles of the same todo both write through the update path and
/// can land in either order; nothing serializes them.
#[derive(Clone)]
pub struct ToggleTodo {
    repository: Arc<TodoRepository>,
}

impl ToggleTodo {
    pub fn new(repository: Arc<TodoRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, todo: &Todo) -> TodoResult<()> {
        self.repository.update(todo.toggled()).await
    }
}

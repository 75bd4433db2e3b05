use crate::error::{TodoError, TodoResult};
use crate::model::todo::{Todo, TodoId};
use crate::repo::todo_repo::TodoRepository;
use log::warn;
use std::sync::Arc;

pub const EMPTY_TITLE_MESSAGE: &str = "Title cannot be empty";

/// Creates a todo from user input.
#[derive(Clone)]
pub struct AddTodo {
    repository: Arc<TodoRepository>,
}

impl AddTodo {
    pub fn new(repository: Arc<TodoRepository>) -> Self {
        Self { repository }
    }

    /// Saves a new todo with trimmed title and description.
    ///
    /// # Errors
    /// - `TodoError::Validation` when the title is blank; storage is not touched.
    /// - `TodoError::Storage` when the insert fails.
    pub async fn execute(&self, title: &str, description: &str) -> TodoResult<TodoId> {
        let title = title.trim();
        if title.is_empty() {
            warn!("event=todo_add module=usecase status=rejected reason=empty_title");
            return Err(TodoError::Validation(EMPTY_TITLE_MESSAGE.to_string()));
        }

        self.repository
            .add(Todo::new(title, description.trim()))
            .await
    }
}

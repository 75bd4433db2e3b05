//! Business operations between the view state holder and the repository.
//!
//! # Responsibility
//! - Apply one business rule per operation.
//! - Surface repository failures unchanged.

mod add_todo;
mod delete_todo;
mod get_todos;
mod toggle_todo;

pub use add_todo::{AddTodo, EMPTY_TITLE_MESSAGE};
pub use delete_todo::DeleteTodo;
pub use get_todos::GetTodos;
pub use toggle_todo::ToggleTodo;

use crate::repo::todo_repo::TodoRepository;
use std::sync::Arc;

/// The four todo operations, built over one shared repository.
#[derive(Clone)]
pub struct TodoUseCases {
    pub get_todos: GetTodos,
    pub add_todo: AddTodo,
    pub toggle_todo: ToggleTodo,
    pub delete_todo: DeleteTodo,
}

impl TodoUseCases {
    pub fn new(repository: Arc<TodoRepository>) -> Self {
        Self {
            get_todos: GetTodos::new(Arc::clone(&repository)),
            add_todo: AddTodo::new(Arc::clone(&repository)),
            toggle_todo: ToggleTodo::new(Arc::clone(&repository)),
            delete_todo: DeleteTodo::new(repository),
        }
    }
}

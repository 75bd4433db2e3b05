//! Local data source over a [`TodoStore`].
//!
//! # Responsibility
//! - Translate `TodoRecord` rows to `Todo` entities and back.
//! - Expose the store's live query as a stream of domain lists.

use crate::error::{TodoError, TodoResult};
use crate::model::todo::{Todo, TodoId};
use crate::store::todo_store::{StoreResult, TodoRecord, TodoStore, TodoSubscription};
use std::sync::Arc;

impl From<&Todo> for TodoRecord {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            is_completed: todo.is_completed,
            created_at: todo.created_at,
        }
    }
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            is_completed: record.is_completed,
            created_at: record.created_at,
        }
    }
}

/// Live sequence of ordered todo lists.
#[derive(Debug)]
pub struct TodoStream {
    subscription: TodoSubscription,
}

impl TodoStream {
    /// Waits for the next full list, or `None` when the store is gone.
    pub async fn next(&mut self) -> Option<TodoResult<Vec<Todo>>> {
        let snapshot = self.subscription.next().await?;
        Some(match snapshot {
            Ok(records) => Ok(records.iter().cloned().map(Todo::from).collect()),
            Err(err) => Err(TodoError::Storage(err)),
        })
    }
}

/// Adapter from domain calls to store calls.
#[derive(Clone)]
pub struct LocalTodoDataSource {
    store: Arc<dyn TodoStore>,
}

impl LocalTodoDataSource {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub fn todos(&self) -> StoreResult<TodoStream> {
        let subscription = self.store.subscribe()?;
        Ok(TodoStream { subscription })
    }

    pub fn get(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        Ok(self.store.get(id)?.map(Todo::from))
    }

    pub fn add(&self, todo: &Todo) -> StoreResult<TodoId> {
        self.store.insert(&TodoRecord::from(todo))
    }

    pub fn update(&self, todo: &Todo) -> StoreResult<()> {
        self.store.update(&TodoRecord::from(todo))
    }

    pub fn delete(&self, todo: &Todo) -> StoreResult<()> {
        self.store.delete(&TodoRecord::from(todo))
    }
}

#[cfg(test)]
mod tests {
    use super::LocalTodoDataSource;
    use crate::model::todo::Todo;
    use crate::store::todo_store::{SqliteTodoStore, TodoRecord};
    use std::sync::Arc;

    #[test]
    fn record_conversion_keeps_every_field() {
        let todo = Todo::new("Buy milk", "2%").with_id(3).toggled();
        let record = TodoRecord::from(&todo);
        assert_eq!(record.id, Some(3));
        assert!(record.is_completed);
        assert_eq!(Todo::from(record), todo);
    }

    #[tokio::test]
    async fn stream_maps_rows_to_domain_lists() {
        let store = Arc::new(SqliteTodoStore::open_in_memory().unwrap());
        let source = LocalTodoDataSource::new(store);
        let mut stream = source.todos().unwrap();

        assert!(stream.next().await.unwrap().unwrap().is_empty());

        let id = source.add(&Todo::new("Buy milk", "2%")).unwrap();
        let todos = stream.next().await.unwrap().unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, Some(id));
        assert_eq!(todos[0].title, "Buy milk");
    }
}

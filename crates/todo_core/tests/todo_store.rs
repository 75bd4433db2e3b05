use std::sync::Arc;
use todo_core::{SqliteTodoStore, StoreError, TodoRecord, TodoStore};

fn record(title: &str, created_at: i64) -> TodoRecord {
    TodoRecord {
        id: None,
        title: title.to_string(),
        description: String::new(),
        is_completed: false,
        created_at,
    }
}

#[test]
fn insert_assigns_distinct_ids() {
    let store = SqliteTodoStore::open_in_memory().unwrap();

    let first = store.insert(&record("first", 1)).unwrap();
    let second = store.insert(&record("second", 2)).unwrap();

    assert_ne!(first, second);
    let loaded = store.get(first).unwrap().unwrap();
    assert_eq!(loaded.id, Some(first));
    assert_eq!(loaded.title, "first");
}

#[test]
fn list_is_newest_first_with_id_tiebreak() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let old = store.insert(&record("old", 100)).unwrap();
    let new = store.insert(&record("new", 300)).unwrap();
    let same_a = store.insert(&record("same a", 200)).unwrap();
    let same_b = store.insert(&record("same b", 200)).unwrap();

    let ids: Vec<_> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|todo| todo.id.unwrap())
        .collect();
    assert_eq!(ids, [new, same_b, same_a, old]);
}

#[test]
fn insert_with_existing_id_replaces_row() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let id = store.insert(&record("draft", 1)).unwrap();

    let replacement = TodoRecord {
        id: Some(id),
        title: "final".to_string(),
        ..record("ignored", 5)
    };
    assert_eq!(store.insert(&replacement).unwrap(), id);

    let all = store.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "final");
    assert_eq!(all[0].created_at, 5);
}

#[test]
fn update_and_delete_require_an_id_but_not_a_row() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let kept = store.insert(&record("kept", 1)).unwrap();

    let unsaved = record("unsaved", 1);
    assert!(matches!(store.update(&unsaved), Err(StoreError::MissingId)));
    assert!(matches!(store.delete(&unsaved), Err(StoreError::MissingId)));

    let ghost = TodoRecord {
        id: Some(42),
        ..record("ghost", 1)
    };
    store.update(&ghost).unwrap();
    store.delete(&ghost).unwrap();

    let rows = store.list().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, Some(kept));
    assert!(store.get(42).unwrap().is_none());
}

#[test]
fn delete_removes_only_matching_id() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let keep = store.insert(&record("keep", 1)).unwrap();
    let drop_id = store.insert(&record("drop", 2)).unwrap();

    let mut target = store.get(drop_id).unwrap().unwrap();
    target.title = "title is not used for addressing".to_string();
    store.delete(&target).unwrap();

    let remaining = store.list().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, Some(keep));
    assert!(store.get(drop_id).unwrap().is_none());
}

#[test]
fn invalid_completion_flag_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.db");
    let store = SqliteTodoStore::open(&path).unwrap();
    store.insert(&record("ok", 1)).unwrap();

    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         UPDATE todos SET isCompleted = 7;",
    )
    .unwrap();
    drop(raw);

    assert!(matches!(store.list(), Err(StoreError::InvalidData(_))));
}

#[tokio::test]
async fn every_subscriber_receives_each_mutation() {
    let store = Arc::new(SqliteTodoStore::open_in_memory().unwrap());
    let mut first = store.subscribe().unwrap();
    let mut second = store.subscribe().unwrap();
    assert_eq!(store.subscriber_count(), 2);

    assert!(first.next().await.unwrap().unwrap().is_empty());
    assert!(second.next().await.unwrap().unwrap().is_empty());

    let id = store.insert(&record("watched", 1)).unwrap();
    let mut done = store.get(id).unwrap().unwrap();
    done.is_completed = true;
    store.update(&done).unwrap();
    store.delete(&done).unwrap();

    for subscription in [&mut first, &mut second] {
        let inserted = subscription.next().await.unwrap().unwrap();
        assert_eq!(inserted.len(), 1);
        assert!(!inserted[0].is_completed);

        let updated = subscription.next().await.unwrap().unwrap();
        assert!(updated[0].is_completed);

        let deleted = subscription.next().await.unwrap().unwrap();
        assert!(deleted.is_empty());
    }
}

#[tokio::test]
async fn mutation_of_missing_row_publishes_nothing() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    let mut subscription = store.subscribe().unwrap();
    assert!(subscription.next().await.unwrap().unwrap().is_empty());

    let ghost = TodoRecord {
        id: Some(9),
        ..record("ghost", 1)
    };
    store.update(&ghost).unwrap();
    store.delete(&ghost).unwrap();
    assert!(matches!(store.delete(&record("unsaved", 1)), Err(StoreError::MissingId)));
    store.insert(&record("real", 2)).unwrap();

    let next = subscription.next().await.unwrap().unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].title, "real");
}

#[tokio::test]
async fn subscription_starts_with_current_rows() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    store.insert(&record("existing", 1)).unwrap();

    let mut subscription = store.subscribe().unwrap();
    let initial = subscription.next().await.unwrap().unwrap();
    assert_eq!(initial.len(), 1);
    assert_eq!(initial[0].title, "existing");
}

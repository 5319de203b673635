//! End-to-end behaviour of `TodoStore` against real and mock storage.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use composable_todo_testing::{InMemoryStorage, SequentialIdGenerator};
use std::sync::Arc;
use todo::persistence::{self, seed_todos};
use todo::{FileStorage, TodoAction, TodoEnvironment, TodoId, TodoStore};

// ============================================================================
// Test Fixtures
// ============================================================================

fn env_with(storage: Arc<InMemoryStorage>) -> TodoEnvironment {
    TodoEnvironment::new(Arc::new(SequentialIdGenerator::new()), storage)
}

fn empty_store() -> (TodoStore, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::with_value("todos", "[]"));
    (TodoStore::initialize(env_with(storage.clone())), storage)
}

fn texts(todos: &[todo::Todo]) -> Vec<(&str, bool)> {
    todos.iter().map(|t| (t.text.as_str(), t.completed)).collect()
}

// ============================================================================
// Scenario
// ============================================================================

#[tokio::test]
async fn test_buy_milk_walk_dog_scenario() {
    let (store, _) = empty_store();
    let mut feedback = store.subscribe();

    // addTodo("buy milk") from an empty list: no modal transition
    let t = store.add_todo("buy milk").await;
    assert_eq!(texts(t.next.todos()), vec![("buy milk", false)]);
    assert_eq!(store.total_count().await, 1);
    assert_eq!(store.completed_count().await, 0);
    assert!(feedback.try_recv().is_err());
    assert!(!store.modal_open().await);
    let milk = t.next.todos()[0].id.clone();
    assert_eq!(store.visible_todos().await[0].id, milk);

    // addTodo("walk dog"): modal transition fires
    let t = store.add_todo("walk dog").await;
    assert_eq!(
        texts(t.next.todos()),
        vec![("walk dog", false), ("buy milk", false)]
    );
    let dog = t.next.todos()[0].id.clone();
    assert_eq!(store.visible_todos().await[0].id, dog);
    assert_eq!(
        feedback.try_recv().unwrap(),
        TodoAction::JustAdded { id: dog.clone() }
    );
    assert!(store.modal_open().await);

    // toggleCompleted(buy milk)
    store.toggle_completed(&milk).await;
    assert_eq!(store.completed_count().await, 1);

    // setFilter("walk")
    store.set_filter("walk").await;
    assert_eq!(texts(&store.visible_todos().await), vec![("walk dog", false)]);

    // deleteTodo(walk dog): no modal transition
    let t = store.delete_todo(&dog).await;
    assert_eq!(texts(t.next.todos()), vec![("buy milk", true)]);
    assert!(feedback.try_recv().is_err());
}

// ============================================================================
// Just-added transition
// ============================================================================

#[tokio::test]
async fn test_just_added_rules() {
    let (store, _) = empty_store();

    let first = store.add_todo("one").await;
    assert!(!first.next.grew_from(&first.previous));

    let second = store.add_todo("two").await;
    assert!(second.next.grew_from(&second.previous));

    let third = store.add_todo("three").await;
    assert!(third.next.grew_from(&third.previous));
    // Each growth toggles the modal
    assert!(!third.next.modal_open());

    let deleted = store.delete_todo(&TodoId::from("todo-1")).await;
    assert!(!deleted.next.grew_from(&deleted.previous));
    assert_eq!(deleted.next.modal_open(), deleted.previous.modal_open());

    let toggled = store.toggle_completed(&TodoId::from("todo-2")).await;
    assert!(!toggled.next.grew_from(&toggled.previous));
}

#[tokio::test]
async fn test_emptied_list_does_not_announce_next_add() {
    let (store, _) = empty_store();
    store.add_todo("only").await;
    store.delete_todo(&TodoId::from("todo-1")).await;

    let mut feedback = store.subscribe();
    store.add_todo("again").await;

    assert!(feedback.try_recv().is_err());
}

#[tokio::test]
async fn test_seeded_store_announces_first_add() {
    let storage = Arc::new(InMemoryStorage::new());
    let store = TodoStore::initialize(env_with(storage));
    assert_eq!(store.total_count().await, seed_todos().len());

    let mut feedback = store.subscribe();
    store.add_todo("new").await;

    assert!(matches!(
        feedback.try_recv().unwrap(),
        TodoAction::JustAdded { .. }
    ));
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_written_blob_restores_equivalent_store() {
    let (store, storage) = empty_store();
    store.add_todo("buy milk").await;
    store.add_todo("walk dog").await;
    store.add_todo("").await;
    store.toggle_completed(&TodoId::from("todo-2")).await;
    store.delete_todo(&TodoId::from("todo-1")).await;

    let blob = storage.value("todos").expect("collection persisted");
    let restored = TodoStore::initialize(env_with(Arc::new(InMemoryStorage::with_value(
        "todos", blob,
    ))));

    let original = store.snapshot().await;
    let reloaded = restored.snapshot().await;
    assert_eq!(original.todos(), reloaded.todos());
}

#[tokio::test]
async fn test_blob_format_is_plain_json_array() {
    let (store, storage) = empty_store();
    store.add_todo("buy milk").await;

    assert_eq!(
        storage.value("todos").as_deref(),
        Some(r#"[{"id":"todo-1","text":"buy milk","completed":false}]"#)
    );
}

#[tokio::test]
async fn test_malformed_storage_falls_back_to_seed() {
    let storage = Arc::new(InMemoryStorage::with_value("todos", "[{broken"));
    let store = TodoStore::initialize(env_with(storage.clone()));

    assert_eq!(store.snapshot().await.todos(), seed_todos().as_slice());
    // Fallback alone does not overwrite the bad value
    assert_eq!(storage.value("todos").as_deref(), Some("[{broken"));
}

#[tokio::test]
async fn test_custom_storage_key() {
    let storage = Arc::new(InMemoryStorage::new());
    let env = env_with(storage.clone()).with_storage_key("work");
    let store = TodoStore::initialize(env);

    store.add_todo("ship it").await;

    assert!(storage.value("todos").is_none());
    let saved = persistence::decode(&storage.value("work").unwrap()).unwrap().unwrap();
    assert_eq!(saved[0].text, "ship it");
}

#[tokio::test]
async fn test_file_storage_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let open = || {
        TodoStore::initialize(TodoEnvironment::new(
            Arc::new(SequentialIdGenerator::with_prefix("run")),
            Arc::new(FileStorage::new(&path)),
        ))
    };

    let first = open();
    let seeded = first.total_count().await;
    let added = first.add_todo("persisted").await;
    let id = added.next.todos()[0].id.clone();
    first.toggle_completed(&id).await;

    let second = open();
    let snapshot = second.snapshot().await;
    assert_eq!(snapshot.total_count(), seeded + 1);
    assert!(snapshot.get(&id).unwrap().completed);
}

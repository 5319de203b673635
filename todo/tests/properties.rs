//! Property tests for the todo reducer.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use composable_todo_core::reducer::Reducer;
use composable_todo_testing::{InMemoryStorage, SequentialIdGenerator};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use todo::{TodoAction, TodoEnvironment, TodoId, TodoReducer, TodoState};

fn env() -> TodoEnvironment {
    TodoEnvironment::new(
        Arc::new(SequentialIdGenerator::new()),
        Arc::new(InMemoryStorage::new()),
    )
}

fn apply(state: &mut TodoState, action: TodoAction, env: &TodoEnvironment) {
    TodoReducer::new().reduce(state, action, env);
}

fn state_with(texts: &[String], env: &TodoEnvironment) -> TodoState {
    let mut state = TodoState::default();
    for text in texts {
        apply(&mut state, TodoAction::AddTodo { text: text.clone() }, env);
    }
    state
}

proptest! {
    #[test]
    fn adds_are_newest_first_with_unique_ids(texts in prop::collection::vec(".{0,12}", 0..20)) {
        let env = env();
        let state = state_with(&texts, &env);

        let stored: Vec<&str> = state.todos().iter().map(|t| t.text.as_str()).collect();
        let expected: Vec<&str> = texts.iter().rev().map(String::as_str).collect();
        prop_assert_eq!(stored, expected);

        let ids: HashSet<&TodoId> = state.todos().iter().map(|t| &t.id).collect();
        prop_assert_eq!(ids.len(), texts.len());
        prop_assert!(state.todos().iter().all(|t| !t.completed));
    }

    #[test]
    fn toggle_twice_restores(texts in prop::collection::vec("[a-z]{1,8}", 1..10), pick in any::<prop::sample::Index>()) {
        let env = env();
        let mut state = state_with(&texts, &env);
        let before = state.todos().to_vec();
        let id = before[pick.index(before.len())].id.clone();

        apply(&mut state, TodoAction::ToggleCompleted { id: id.clone() }, &env);
        prop_assert_ne!(state.todos(), before.as_slice());
        apply(&mut state, TodoAction::ToggleCompleted { id }, &env);
        prop_assert_eq!(state.todos(), before.as_slice());
    }

    #[test]
    fn delete_removes_at_most_one(texts in prop::collection::vec("[a-z]{1,8}", 0..10), pick in any::<prop::sample::Index>(), hit in any::<bool>()) {
        let env = env();
        let mut state = state_with(&texts, &env);
        let before = state.total_count();
        let id = if hit && before > 0 {
            state.todos()[pick.index(before)].id.clone()
        } else {
            TodoId::from("absent")
        };

        apply(&mut state, TodoAction::DeleteTodo { id: id.clone() }, &env);

        prop_assert!(!state.exists(&id));
        let expected = if hit && before > 0 { before - 1 } else { before };
        prop_assert_eq!(state.total_count(), expected);
    }

    #[test]
    fn filter_selects_case_insensitive_substrings(texts in prop::collection::vec("[a-zA-Z ]{0,10}", 0..15), filter in "[a-zA-Z]{0,3}") {
        let env = env();
        let mut state = state_with(&texts, &env);
        apply(&mut state, TodoAction::SetFilter { text: filter.clone() }, &env);

        let needle = filter.to_lowercase();
        let expected: Vec<&str> = state
            .todos()
            .iter()
            .filter(|t| t.text.to_lowercase().contains(&needle))
            .map(|t| t.id.as_str())
            .collect();
        let visible: Vec<&str> = state.visible_todos().iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(visible, expected);

        apply(&mut state, TodoAction::SetFilter { text: String::new() }, &env);
        prop_assert_eq!(state.visible_todos().len(), state.total_count());
    }
}

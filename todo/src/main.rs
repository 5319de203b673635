//! Command-line front end for the todo store.
//!
//! Each invocation loads the list from the storage file, applies one
//! command, and exits. Changes are written back by the store itself.
//!
//! ```text
//! todo list [FILTER]    show todos, optionally filtered
//! todo add TEXT...      add a todo
//! todo toggle ID        flip completed
//! todo delete ID        remove a todo
//! todo stats            totals only
//! todo reset            forget the stored list (next run starts from the seed)
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use composable_todo_core::environment::KeyValueStore;
use std::sync::Arc;
use todo::{FileStorage, Todo, TodoAction, TodoConfig, TodoEnvironment, TodoError, TodoId, TodoStore, UuidGenerator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "todo")]
#[command(about = "Manage a persisted to-do list")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Show todos, optionally filtered by a case-insensitive substring
    List { filter: Vec<String> },
    /// Add a todo; words are joined with spaces
    Add { text: Vec<String> },
    /// Flip the completed flag of a todo
    Toggle { id: String },
    /// Remove a todo
    Delete { id: String },
    /// Print totals only
    Stats,
    /// Forget the stored list (the next run starts from the seed)
    Reset,
}

fn print_todos(todos: &[Todo]) {
    for todo in todos {
        let status = if todo.completed { "✓" } else { " " };
        println!("  [{status}] {}  {}", todo.id, todo.text);
    }
}

async fn print_stats(store: &TodoStore) {
    println!(
        "Total: {}  Completed: {}",
        store.total_count().await,
        store.completed_count().await
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let command = Cli::parse().command;

    let config = TodoConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let storage = Arc::new(FileStorage::new(&config.storage_path));
    tracing::debug!(path = %storage.path().display(), key = %config.storage_key, "Opening storage");

    if command == Command::Reset {
        storage
            .remove(&config.storage_key)
            .map_err(TodoError::from)
            .context("clearing stored todos")?;
        println!("Stored list cleared.");
        return Ok(());
    }

    let env = TodoEnvironment::new(Arc::new(UuidGenerator), storage)
        .with_storage_key(config.storage_key.clone());
    let store = TodoStore::with_config(env, config.store_config());
    let mut feedback = store.subscribe();

    match command {
        Command::List { filter } => {
            store.set_filter(filter.join(" ")).await;
            print_todos(&store.visible_todos().await);
            print_stats(&store).await;
        },
        Command::Add { text } => {
            let transition = store.add_todo(text.join(" ")).await;
            if let Some(todo) = transition.next.todos().first() {
                println!("Added {}", todo.id);
            }
        },
        Command::Toggle { id } => {
            let id = TodoId::from(id);
            let transition = store.toggle_completed(&id).await;
            if transition.previous.exists(&id) {
                println!("Toggled {id}");
            } else {
                println!("No todo with id {id}");
            }
        },
        Command::Delete { id } => {
            let id = TodoId::from(id);
            let transition = store.delete_todo(&id).await;
            if transition.previous.exists(&id) {
                println!("Deleted {id}");
            } else {
                println!("No todo with id {id}");
            }
        },
        Command::Stats => print_stats(&store).await,
        Command::Reset => {},
    }

    while let Ok(action) = feedback.try_recv() {
        match action {
            TodoAction::JustAdded { id } => println!("Editor opened for the next todo (after {id})."),
            TodoAction::PersistFailed { error } => eprintln!("warning: changes not saved: {error}"),
            _ => {},
        }
    }

    Ok(())
}

//! Error types for the todo application shell.

use composable_todo_core::error::StorageError;

/// Errors raised outside the store itself (configuration and direct storage access)
///
/// Store operations never fail; these only come from the code around them.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// An environment variable held a value that could not be parsed
    #[error("invalid value {value:?} for {name}")]
    InvalidConfig {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },

    /// Direct storage access by the shell failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

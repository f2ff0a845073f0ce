mod commands;
mod history;

pub use commands::Command;
pub use history::{HistoryEntry, HistoryManager, Snapshot};

/// Errors that can occur during command execution
pub type CommandError = crate::error::EditorError;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

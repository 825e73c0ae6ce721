//! Game-state initialization errors

use jester_core::Tag;
use thiserror::Error;

/// Stage sequence configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameStateError {
    /// A stage appears more than once
    #[error("Initialization stage '{0}' appears more than once")]
    DuplicateStage(Tag),

    /// No stages were supplied
    #[error("Initialization sequence has no stages")]
    EmptySequence,
}

/// Result type for game-state operations
pub type Result<T> = std::result::Result<T, GameStateError>;

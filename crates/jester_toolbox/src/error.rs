//! Toolbox error types

use std::path::PathBuf;

use jester_assets::AssetError;
use jester_core::CoreError;
use jester_gamestate::GameStateError;
use thiserror::Error;

/// Errors surfaced while building or driving a [`crate::ToolboxContext`]
#[derive(Debug, Error)]
pub enum ToolboxError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    GameState(#[from] GameStateError),

    /// Settings file could not be read
    #[error("Failed to read settings '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings text is not valid
    #[error("Invalid toolbox settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for toolbox operations
pub type Result<T> = std::result::Result<T, ToolboxError>;

//! Error types for the core library

use thiserror::Error;

use crate::handle::ObjectHandle;

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;

/// The core error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Tag text is not a valid dotted identifier
    #[error("Invalid tag '{0}'")]
    InvalidTag(String),

    /// Class name not registered
    #[error("Class not registered: {0}")]
    UnknownClass(String),

    /// Class name registered twice
    #[error("Class already registered: {0}")]
    ClassAlreadyRegistered(String),

    /// Handle refers to a destroyed object
    #[error("Object handle is stale: {0:?}")]
    StaleHandle(ObjectHandle),
}

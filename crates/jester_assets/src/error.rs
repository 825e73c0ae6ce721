//! Error types for asset lookups

use jester_core::Tag;
use thiserror::Error;

/// Asset locator errors. Every variant is a configuration error: the tag
/// tables disagree with what the caller expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// Lookup before the locator was flattened
    #[error("Asset locator used before initialization")]
    NotInitialized,

    /// No object registered under the tag
    #[error("Data asset with tag '{0}' not found in asset locator")]
    ObjectNotFound(Tag),

    /// No class registered under the tag
    #[error("Asset class with tag '{0}' not found in asset locator")]
    ClassNotFound(Tag),

    /// Registered object is not of the expected class
    #[error("Data asset with tag '{tag}' is not of expected type '{expected}'! Found: '{found}'")]
    ObjectTypeMismatch {
        tag: Tag,
        expected: String,
        found: String,
    },

    /// Registered class does not derive from the expected class
    #[error("Asset class with tag '{tag}' is not of expected type '{expected}'! Found: '{found}'")]
    ClassTypeMismatch {
        tag: Tag,
        expected: String,
        found: String,
    },

    /// Registered object has been destroyed
    #[error("Data asset with tag '{0}' has been destroyed")]
    StaleAsset(Tag),

    /// Settings name an object the world does not contain
    #[error("Asset '{tag}' refers to unknown object '{path}'")]
    UnresolvedObject { tag: Tag, path: String },

    /// Settings name a class the registry does not contain
    #[error("Asset class '{tag}' refers to unknown class '{name}'")]
    UnresolvedClass { tag: Tag, name: String },
}

/// Result type for asset operations
pub type Result<T> = std::result::Result<T, AssetError>;

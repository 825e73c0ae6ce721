//! Asset locator configuration

use std::collections::BTreeMap;

use jester_core::Tag;
use serde::{Deserialize, Serialize};

/// How configuration errors (missing tag, wrong type) are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPolicy {
    /// Log, then panic
    Fatal,
    /// Log and hand the error back to the caller
    Lenient,
}

impl LookupPolicy {
    /// Check if configuration errors abort
    pub fn is_fatal(self) -> bool {
        self == LookupPolicy::Fatal
    }
}

impl Default for LookupPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            LookupPolicy::Fatal
        } else {
            LookupPolicy::Lenient
        }
    }
}

/// One authoring category. The category name carries no runtime meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetCategorySettings {
    /// Tag to object name
    pub assets: BTreeMap<Tag, String>,
    /// Tag to class name
    pub classes: BTreeMap<Tag, String>,
}

impl AssetCategorySettings {
    /// Add an object entry
    pub fn with_asset(mut self, tag: Tag, object: impl Into<String>) -> Self {
        self.assets.insert(tag, object.into());
        self
    }

    /// Add a class entry
    pub fn with_class(mut self, tag: Tag, class: impl Into<String>) -> Self {
        self.classes.insert(tag, class.into());
        self
    }
}

/// Authoring-side description of an asset locator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetLocatorSettings {
    /// Categories, flattened at initialization
    pub categories: BTreeMap<String, AssetCategorySettings>,
    /// Tag to lazily loaded level path; never flattened
    pub levels: BTreeMap<Tag, String>,
}

impl AssetLocatorSettings {
    /// Add a category
    pub fn with_category(mut self, name: impl Into<String>, category: AssetCategorySettings) -> Self {
        self.categories.insert(name.into(), category);
        self
    }

    /// Add a level
    pub fn with_level(mut self, tag: Tag, path: impl Into<String>) -> Self {
        self.levels.insert(tag, path.into());
        self
    }
}

//! Tag-keyed asset locator
//!
//! Assets and classes are authored in named categories and flattened once
//! into two global tables. A lookup for a tag that is missing, or whose
//! entry is not of the expected class, is a configuration error and goes
//! through the locator's [`LookupPolicy`]. Level lookups are sparse by
//! nature and only warn on a miss.

use std::collections::BTreeMap;

use jester_core::{ClassId, ClassRegistry, ObjectHandle, ObjectWorld, Tag};

use crate::error::{AssetError, Result};
use crate::settings::{AssetLocatorSettings, LookupPolicy};

/// Authoring category: tag to object and tag to class
#[derive(Debug, Clone, Default)]
pub struct AssetCategory {
    pub assets: BTreeMap<Tag, ObjectHandle>,
    pub classes: BTreeMap<Tag, ClassId>,
}

impl AssetCategory {
    /// Create an empty category
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object entry
    pub fn with_asset(mut self, tag: Tag, object: ObjectHandle) -> Self {
        self.assets.insert(tag, object);
        self
    }

    /// Add a class entry
    pub fn with_class(mut self, tag: Tag, class: ClassId) -> Self {
        self.classes.insert(tag, class);
        self
    }
}

/// Soft reference to a level, loaded on demand by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LevelRef(Option<String>);

impl LevelRef {
    /// Reference a level by path
    pub fn new(path: impl Into<String>) -> Self {
        Self(Some(path.into()))
    }

    /// The empty reference
    pub fn null() -> Self {
        Self(None)
    }

    /// Check if this references nothing
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Level path
    pub fn path(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Flattened tag to object / class tables
#[derive(Debug, Clone)]
pub struct AssetLocator {
    categories: BTreeMap<String, AssetCategory>,
    levels: BTreeMap<Tag, LevelRef>,
    assets: BTreeMap<Tag, ObjectHandle>,
    classes: BTreeMap<Tag, ClassId>,
    initialized: bool,
    policy: LookupPolicy,
}

impl AssetLocator {
    /// Create an empty, uninitialized locator
    pub fn new(policy: LookupPolicy) -> Self {
        Self {
            categories: BTreeMap::new(),
            levels: BTreeMap::new(),
            assets: BTreeMap::new(),
            classes: BTreeMap::new(),
            initialized: false,
            policy,
        }
    }

    /// Resolve authored names against `world` and build an uninitialized locator
    pub fn from_settings(
        settings: &AssetLocatorSettings,
        world: &ObjectWorld,
        policy: LookupPolicy,
    ) -> Result<Self> {
        let mut locator = Self::new(policy);

        for (name, authored) in &settings.categories {
            let mut category = AssetCategory::new();
            for (tag, path) in &authored.assets {
                let object = world
                    .find_by_name(path)
                    .ok_or_else(|| AssetError::UnresolvedObject {
                        tag: tag.clone(),
                        path: path.clone(),
                    })?;
                category.assets.insert(tag.clone(), object);
            }
            for (tag, class_name) in &authored.classes {
                let class = world.classes().find(class_name).ok_or_else(|| {
                    AssetError::UnresolvedClass {
                        tag: tag.clone(),
                        name: class_name.clone(),
                    }
                })?;
                category.classes.insert(tag.clone(), class);
            }
            locator.categories.insert(name.clone(), category);
        }

        for (tag, path) in &settings.levels {
            locator.levels.insert(tag.clone(), LevelRef::new(path.clone()));
        }

        Ok(locator)
    }

    /// Add an authoring category. Ignored once initialized.
    pub fn with_category(mut self, name: impl Into<String>, category: AssetCategory) -> Self {
        let name = name.into();
        if self.initialized {
            log::warn!("Category '{}' added after initialization is ignored", name);
        } else {
            self.categories.insert(name, category);
        }
        self
    }

    /// Add a level entry
    pub fn with_level(mut self, tag: Tag, level: LevelRef) -> Self {
        self.levels.insert(tag, level);
        self
    }

    /// Flatten categories into the lookup tables. Only the first call does
    /// any work; returns whether this call performed the flattening.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }

        for (name, category) in &self.categories {
            for (tag, object) in &category.assets {
                if self.assets.contains_key(tag) {
                    log::error!("Asset tag '{}' in category '{}' is already registered", tag, name);
                    continue;
                }
                self.assets.insert(tag.clone(), *object);
            }
            for (tag, class) in &category.classes {
                if self.classes.contains_key(tag) {
                    log::error!("Class tag '{}' in category '{}' is already registered", tag, name);
                    continue;
                }
                self.classes.insert(tag.clone(), *class);
            }
        }

        self.initialized = true;
        log::debug!(
            "Asset locator initialized: {} assets, {} classes, {} levels",
            self.assets.len(),
            self.classes.len(),
            self.levels.len()
        );
        true
    }

    /// Check if the tables have been flattened
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Configuration error policy
    pub fn policy(&self) -> LookupPolicy {
        self.policy
    }

    fn fail<T>(&self, error: AssetError) -> Result<T> {
        log::error!("{}", error);
        if self.policy.is_fatal() {
            panic!("{}", error);
        }
        Err(error)
    }

    /// Object registered under `tag`, optionally checked to be `expected`
    /// or a subclass of it
    pub fn resolve_object(
        &self,
        world: &ObjectWorld,
        tag: &Tag,
        expected: Option<ClassId>,
    ) -> Result<ObjectHandle> {
        if !self.initialized {
            return self.fail(AssetError::NotInitialized);
        }
        let Some(object) = self.assets.get(tag).copied() else {
            return self.fail(AssetError::ObjectNotFound(tag.clone()));
        };
        let Some(expected) = expected else {
            return Ok(object);
        };

        let classes = world.classes();
        match world.class_of(object) {
            None => self.fail(AssetError::StaleAsset(tag.clone())),
            Some(actual) if classes.is_child_of(actual, expected) => Ok(object),
            Some(actual) => self.fail(AssetError::ObjectTypeMismatch {
                tag: tag.clone(),
                expected: classes.name(expected).into(),
                found: classes.name(actual).into(),
            }),
        }
    }

    /// Class registered under `tag`, optionally checked to derive from `expected`
    pub fn resolve_class(
        &self,
        classes: &ClassRegistry,
        tag: &Tag,
        expected: Option<ClassId>,
    ) -> Result<ClassId> {
        if !self.initialized {
            return self.fail(AssetError::NotInitialized);
        }
        let Some(class) = self.classes.get(tag).copied() else {
            return self.fail(AssetError::ClassNotFound(tag.clone()));
        };
        match expected {
            Some(expected) if !classes.is_child_of(class, expected) => {
                self.fail(AssetError::ClassTypeMismatch {
                    tag: tag.clone(),
                    expected: classes.name(expected).into(),
                    found: classes.name(class).into(),
                })
            }
            _ => Ok(class),
        }
    }

    /// Level registered under `tag`, or a null reference with a warning
    pub fn resolve_level(&self, tag: &Tag) -> LevelRef {
        match self.levels.get(tag) {
            Some(level) => level.clone(),
            None => {
                log::warn!("Level with tag '{}' not found in asset locator", tag);
                LevelRef::null()
            }
        }
    }

    /// Flattened object entries
    pub fn assets(&self) -> impl Iterator<Item = (&Tag, &ObjectHandle)> {
        self.assets.iter()
    }

    /// Flattened class entries
    pub fn classes(&self) -> impl Iterator<Item = (&Tag, &ClassId)> {
        self.classes.iter()
    }
}

impl Default for AssetLocator {
    fn default() -> Self {
        Self::new(LookupPolicy::default())
    }
}

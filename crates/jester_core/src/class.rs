//! Runtime class lattice
//!
//! Stands in for engine reflection: each class has at most one parent and
//! "is-a" checks walk towards the root. Classes also carry a table of
//! callables that objects of the class (or any subclass) expose by name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{CoreError, Result};
use crate::handle::ObjectHandle;

/// Identifier of a registered class
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ClassId(u32);

impl ClassId {
    /// Raw index into the registry
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Callable exposed by a class, invoked with the receiving object
pub type ObjectFunction = Arc<dyn Fn(ObjectHandle) + Send + Sync>;

/// Information about a registered class
pub struct ClassInfo {
    /// Class identifier
    pub id: ClassId,
    /// Human-readable class name
    pub name: String,
    /// Parent class, `None` only for the root
    pub parent: Option<ClassId>,
    functions: BTreeMap<String, ObjectFunction>,
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Central registry for all classes
pub struct ClassRegistry {
    classes: Vec<ClassInfo>,
    by_name: BTreeMap<String, ClassId>,
}

impl ClassRegistry {
    /// Root of every class
    pub const OBJECT: ClassId = ClassId(0);
    /// Base of standalone entities (manager actors)
    pub const ACTOR: ClassId = ClassId(1);
    /// Base of sub-objects attached to an actor (manager components)
    pub const COMPONENT: ClassId = ClassId(2);

    /// Create a registry holding the built-in base classes
    pub fn new() -> Self {
        let mut registry = Self {
            classes: Vec::new(),
            by_name: BTreeMap::new(),
        };
        registry.insert("Object", None);
        registry.insert("Actor", Some(Self::OBJECT));
        registry.insert("ActorComponent", Some(Self::OBJECT));
        registry
    }

    fn insert(&mut self, name: &str, parent: Option<ClassId>) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassInfo {
            id,
            name: name.into(),
            parent,
            functions: BTreeMap::new(),
        });
        self.by_name.insert(name.into(), id);
        id
    }

    /// Register a class deriving from `parent`
    pub fn register(&mut self, name: &str, parent: ClassId) -> Result<ClassId> {
        if self.by_name.contains_key(name) {
            return Err(CoreError::ClassAlreadyRegistered(name.into()));
        }
        if self.get(parent).is_none() {
            return Err(CoreError::UnknownClass(format!("{:?}", parent)));
        }
        Ok(self.insert(name, Some(parent)))
    }

    /// Get class info
    pub fn get(&self, id: ClassId) -> Option<&ClassInfo> {
        self.classes.get(id.index())
    }

    /// Look a class up by name
    pub fn find(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Class name, or `<unknown>` for a foreign id
    pub fn name(&self, id: ClassId) -> &str {
        self.get(id).map_or("<unknown>", |info| info.name.as_str())
    }

    /// Reflexive is-a check: true when `class` is `ancestor` or derives from it
    pub fn is_child_of(&self, class: ClassId, ancestor: ClassId) -> bool {
        let mut current = Some(class);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|info| info.parent);
        }
        false
    }

    /// `class` followed by each ancestor up to the root
    pub fn ancestors(&self, class: ClassId) -> Vec<ClassId> {
        let mut out = Vec::new();
        let mut current = self.get(class).map(|info| info.id);
        while let Some(id) = current {
            out.push(id);
            current = self.get(id).and_then(|info| info.parent);
        }
        out
    }

    /// Expose a callable on `class` under `name`
    pub fn add_function<F>(&mut self, class: ClassId, name: &str, function: F) -> Result<()>
    where
        F: Fn(ObjectHandle) + Send + Sync + 'static,
    {
        let info = self
            .classes
            .get_mut(class.index())
            .ok_or_else(|| CoreError::UnknownClass(format!("{:?}", class)))?;
        info.functions.insert(name.into(), Arc::new(function));
        Ok(())
    }

    /// Find a callable on `class` or the nearest ancestor exposing it
    pub fn find_function(&self, class: ClassId, name: &str) -> Option<ObjectFunction> {
        self.ancestors(class)
            .into_iter()
            .filter_map(|id| self.get(id))
            .find_map(|info| info.functions.get(name).cloned())
    }

    /// Get the number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.classes.len())
            .finish()
    }
}

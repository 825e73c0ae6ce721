//! Host object graph
//!
//! The [`ObjectWorld`] owns every object: it creates and destroys them,
//! answers validity and is-a queries, dispatches callables by name, and
//! reports destructions to whoever asked to observe them. Everything else
//! refers to objects through [`ObjectHandle`]s.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::class::{ClassId, ClassRegistry};
use crate::error::{CoreError, Result};
use crate::handle::{HandleAllocator, ObjectHandle};

/// Identifies a party interested in destruction notices
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub u64);

/// Emitted once per destroyed object
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestroyNotice {
    /// The destroyed object (now stale)
    pub object: ObjectHandle,
    /// Its class
    pub class: ClassId,
    /// Its owner at the time of destruction
    pub owner: Option<ObjectHandle>,
    /// Observers that were watching it
    pub observers: Vec<ObserverId>,
}

impl DestroyNotice {
    /// Check if `observer` was watching the destroyed object
    pub fn is_observed_by(&self, observer: ObserverId) -> bool {
        self.observers.contains(&observer)
    }
}

struct ObjectRecord {
    class: ClassId,
    name: String,
    owner: Option<ObjectHandle>,
    owned: Vec<ObjectHandle>,
    observers: BTreeSet<ObserverId>,
}

/// Object graph with generational handles
pub struct ObjectWorld {
    classes: ClassRegistry,
    allocator: HandleAllocator,
    objects: Vec<Option<ObjectRecord>>,
    by_name: BTreeMap<String, ObjectHandle>,
    next_observer: u64,
}

impl ObjectWorld {
    /// Create a world with only the built-in classes
    pub fn new() -> Self {
        Self::with_classes(ClassRegistry::new())
    }

    /// Create a world over an existing class registry
    pub fn with_classes(classes: ClassRegistry) -> Self {
        Self {
            classes,
            allocator: HandleAllocator::new(),
            objects: Vec::new(),
            by_name: BTreeMap::new(),
            next_observer: 1,
        }
    }

    /// Class registry
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Mutable class registry
    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    /// Create a root object
    pub fn spawn(&mut self, class: ClassId, name: &str) -> Result<ObjectHandle> {
        self.spawn_inner(class, name, None)
    }

    /// Create an object owned by `owner`; it is destroyed with its owner
    pub fn spawn_owned(
        &mut self,
        class: ClassId,
        name: &str,
        owner: ObjectHandle,
    ) -> Result<ObjectHandle> {
        if !self.is_valid(owner) {
            return Err(CoreError::StaleHandle(owner));
        }
        self.spawn_inner(class, name, Some(owner))
    }

    fn spawn_inner(
        &mut self,
        class: ClassId,
        name: &str,
        owner: Option<ObjectHandle>,
    ) -> Result<ObjectHandle> {
        if self.classes.get(class).is_none() {
            return Err(CoreError::UnknownClass(format!("{:?}", class)));
        }

        let handle = self.allocator.allocate();
        let index = handle.index() as usize;
        if index >= self.objects.len() {
            self.objects.resize_with(index + 1, || None);
        }
        self.objects[index] = Some(ObjectRecord {
            class,
            name: name.into(),
            owner,
            owned: Vec::new(),
            observers: BTreeSet::new(),
        });
        self.by_name.insert(name.into(), handle);

        if let Some(owner) = owner.and_then(|owner| self.record_mut(owner)) {
            owner.owned.push(handle);
        }

        log::debug!("Spawned '{}' ({}) as {:?}", name, self.classes.name(class), handle);
        Ok(handle)
    }

    fn record(&self, handle: ObjectHandle) -> Option<&ObjectRecord> {
        if !self.allocator.is_valid(handle) {
            return None;
        }
        self.objects.get(handle.index() as usize)?.as_ref()
    }

    fn record_mut(&mut self, handle: ObjectHandle) -> Option<&mut ObjectRecord> {
        if !self.allocator.is_valid(handle) {
            return None;
        }
        self.objects.get_mut(handle.index() as usize)?.as_mut()
    }

    /// Validity oracle: false for null, stale, or foreign handles
    pub fn is_valid(&self, handle: ObjectHandle) -> bool {
        self.record(handle).is_some()
    }

    /// Runtime class of a live object
    pub fn class_of(&self, handle: ObjectHandle) -> Option<ClassId> {
        self.record(handle).map(|r| r.class)
    }

    /// Name of a live object
    pub fn name_of(&self, handle: ObjectHandle) -> Option<&str> {
        self.record(handle).map(|r| r.name.as_str())
    }

    /// Owner of a live object
    pub fn owner_of(&self, handle: ObjectHandle) -> Option<ObjectHandle> {
        self.record(handle).and_then(|r| r.owner)
    }

    /// Find a live object by name
    pub fn find_by_name(&self, name: &str) -> Option<ObjectHandle> {
        self.by_name
            .get(name)
            .copied()
            .filter(|handle| self.is_valid(*handle))
    }

    /// Check if a live object is `class` or a subclass of it
    pub fn is_a(&self, handle: ObjectHandle, class: ClassId) -> bool {
        self.class_of(handle)
            .is_some_and(|own| self.classes.is_child_of(own, class))
    }

    /// Call a function by name on a live object. Returns whether the object
    /// exposed that function and it ran.
    pub fn invoke(&self, handle: ObjectHandle, function: &str) -> bool {
        let Some(class) = self.class_of(handle) else {
            return false;
        };
        match self.classes.find_function(class, function) {
            Some(callable) => {
                callable(handle);
                true
            }
            None => {
                log::warn!(
                    "Function '{}' not found on '{}' ({})",
                    function,
                    self.name_of(handle).unwrap_or_default(),
                    self.classes.name(class)
                );
                false
            }
        }
    }

    /// Allocate a fresh observer identity
    pub fn new_observer(&mut self) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        id
    }

    /// Ask to be listed in the destruction notice of `handle`.
    /// Observing twice is the same as observing once.
    pub fn observe_destroyed(&mut self, handle: ObjectHandle, observer: ObserverId) -> bool {
        match self.record_mut(handle) {
            Some(record) => {
                record.observers.insert(observer);
                true
            }
            None => false,
        }
    }

    /// Stop observing `handle`
    pub fn unobserve_destroyed(&mut self, handle: ObjectHandle, observer: ObserverId) {
        if let Some(record) = self.record_mut(handle) {
            record.observers.remove(&observer);
        }
    }

    /// Destroy an object and everything it owns. Owned objects are
    /// destroyed first; one notice is returned per destroyed object.
    pub fn destroy(&mut self, handle: ObjectHandle) -> Vec<DestroyNotice> {
        let mut notices = Vec::new();
        self.destroy_recursive(handle, &mut notices);
        notices
    }

    fn destroy_recursive(&mut self, handle: ObjectHandle, notices: &mut Vec<DestroyNotice>) {
        let owned = match self.record(handle) {
            Some(record) => record.owned.clone(),
            None => return,
        };
        for child in owned {
            self.destroy_recursive(child, notices);
        }

        let Some(record) = self
            .objects
            .get_mut(handle.index() as usize)
            .and_then(Option::take)
        else {
            return;
        };
        self.allocator.free(handle);

        if self.by_name.get(&record.name) == Some(&handle) {
            self.by_name.remove(&record.name);
        }
        if let Some(owner) = record.owner.and_then(|owner| self.record_mut(owner)) {
            owner.owned.retain(|h| *h != handle);
        }

        log::debug!("Destroyed '{}' ({:?})", record.name, handle);
        notices.push(DestroyNotice {
            object: handle,
            class: record.class,
            owner: record.owner,
            observers: record.observers.into_iter().collect(),
        });
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.allocator.len()
    }

    /// Check if no objects are alive
    pub fn is_empty(&self) -> bool {
        self.allocator.is_empty()
    }
}

impl Default for ObjectWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectWorld")
            .field("classes", &self.classes.len())
            .field("objects", &self.len())
            .finish()
    }
}

//! Manager locator
//!
//! Registration, lookup by most-derived class match, and eviction.

use std::sync::Arc;

use jester_core::{ClassId, ClassRegistry, DestroyNotice, ObjectHandle, ObjectWorld, ObserverId};
use parking_lot::RwLock;

/// Which collection a manager lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerKind {
    /// Standalone actor
    Actor,
    /// Component attached to an actor
    Component,
}

impl ManagerKind {
    /// Base class of every registrant of this kind
    pub fn base_class(self) -> ClassId {
        match self {
            ManagerKind::Actor => ClassRegistry::ACTOR,
            ManagerKind::Component => ClassRegistry::COMPONENT,
        }
    }

    /// Kind whose base class `class` derives from
    pub fn of_class(classes: &ClassRegistry, class: ClassId) -> Option<Self> {
        [ManagerKind::Actor, ManagerKind::Component]
            .into_iter()
            .find(|kind| classes.is_child_of(class, kind.base_class()))
    }
}

/// Outcome of a registration request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The manager is now registered
    Added,
    /// A manager of the same concrete class is already registered; the
    /// request was dropped and `existing` stays in place
    Conflict { existing: ObjectHandle },
    /// The handle is stale or the object is not of the right kind
    Invalid,
}

#[derive(Debug, Clone, Copy)]
struct ManagerEntry {
    manager: ObjectHandle,
    class: ClassId,
    /// Object whose destruction evicts this entry: the manager itself for
    /// actors, the owning actor for components
    watched: ObjectHandle,
}

/// Registry of live managers, keyed by class
#[derive(Debug)]
pub struct ManagerLocator {
    observer: ObserverId,
    actor_managers: Vec<ManagerEntry>,
    component_managers: Vec<ManagerEntry>,
}

impl ManagerLocator {
    /// Create an empty locator observing destructions in `world`
    pub fn new(world: &mut ObjectWorld) -> Self {
        Self {
            observer: world.new_observer(),
            actor_managers: Vec::new(),
            component_managers: Vec::new(),
        }
    }

    /// Identity under which this locator observes destructions
    pub fn observer_id(&self) -> ObserverId {
        self.observer
    }

    fn collection(&self, kind: ManagerKind) -> &Vec<ManagerEntry> {
        match kind {
            ManagerKind::Actor => &self.actor_managers,
            ManagerKind::Component => &self.component_managers,
        }
    }

    fn collection_mut(&mut self, kind: ManagerKind) -> &mut Vec<ManagerEntry> {
        match kind {
            ManagerKind::Actor => &mut self.actor_managers,
            ManagerKind::Component => &mut self.component_managers,
        }
    }

    /// Register a manager in the collection matching its class
    pub fn register(&mut self, world: &mut ObjectWorld, manager: ObjectHandle) -> Registration {
        let kind = world
            .class_of(manager)
            .and_then(|class| ManagerKind::of_class(world.classes(), class));
        match kind {
            Some(kind) => self.register_as(world, manager, kind),
            None => {
                log::error!("Cannot register {:?} as a manager: not an actor or component", manager);
                Registration::Invalid
            }
        }
    }

    /// Register a standalone actor manager
    pub fn register_actor(&mut self, world: &mut ObjectWorld, manager: ObjectHandle) -> Registration {
        self.register_as(world, manager, ManagerKind::Actor)
    }

    /// Register a component manager
    pub fn register_component(
        &mut self,
        world: &mut ObjectWorld,
        manager: ObjectHandle,
    ) -> Registration {
        self.register_as(world, manager, ManagerKind::Component)
    }

    fn register_as(
        &mut self,
        world: &mut ObjectWorld,
        manager: ObjectHandle,
        kind: ManagerKind,
    ) -> Registration {
        let Some(class) = world.class_of(manager) else {
            log::error!("Cannot register stale manager {:?}", manager);
            return Registration::Invalid;
        };
        if !world.classes().is_child_of(class, kind.base_class()) {
            log::error!(
                "Cannot register '{}' as {:?} manager: class '{}' is not a {}",
                world.name_of(manager).unwrap_or_default(),
                kind,
                world.classes().name(class),
                world.classes().name(kind.base_class())
            );
            return Registration::Invalid;
        }

        self.prune(world, kind);
        if let Some(existing) = self.collection(kind).iter().find(|e| e.class == class) {
            log::error!(
                "Manager {} is already registered!",
                world.name_of(manager).unwrap_or_default()
            );
            return Registration::Conflict {
                existing: existing.manager,
            };
        }

        let watched = match kind {
            ManagerKind::Actor => manager,
            ManagerKind::Component => world.owner_of(manager).unwrap_or(manager),
        };
        world.observe_destroyed(watched, self.observer);
        self.collection_mut(kind).push(ManagerEntry {
            manager,
            class,
            watched,
        });

        log::debug!(
            "Registered {:?} manager '{}' ({})",
            kind,
            world.name_of(manager).unwrap_or_default(),
            world.classes().name(class)
        );
        Registration::Added
    }

    /// Unregister from whichever collection holds `manager`
    pub fn unregister(&mut self, world: &mut ObjectWorld, manager: ObjectHandle) -> bool {
        self.unregister_from(world, manager, &[ManagerKind::Actor, ManagerKind::Component])
    }

    /// Remove an actor manager. Absent or null handles are a no-op.
    pub fn unregister_actor(&mut self, world: &mut ObjectWorld, manager: ObjectHandle) -> bool {
        self.unregister_from(world, manager, &[ManagerKind::Actor])
    }

    /// Remove a component manager. Absent or null handles are a no-op.
    pub fn unregister_component(&mut self, world: &mut ObjectWorld, manager: ObjectHandle) -> bool {
        self.unregister_from(world, manager, &[ManagerKind::Component])
    }

    fn unregister_from(
        &mut self,
        world: &mut ObjectWorld,
        manager: ObjectHandle,
        kinds: &[ManagerKind],
    ) -> bool {
        if manager.is_null() {
            return false;
        }
        let removed = kinds
            .iter()
            .any(|kind| self.remove(world, *kind, |e| e.manager == manager));
        if !removed {
            log::warn!("Manager {:?} was not registered", manager);
        }
        removed
    }

    /// Remove matching entries and stop observing objects nobody watches anymore
    fn remove<F>(&mut self, world: &mut ObjectWorld, kind: ManagerKind, predicate: F) -> bool
    where
        F: Fn(&ManagerEntry) -> bool,
    {
        let collection = self.collection_mut(kind);
        let (removed, kept): (Vec<_>, Vec<_>) = collection.drain(..).partition(|e| predicate(e));
        *collection = kept;

        for entry in &removed {
            if !self.is_watching(entry.watched) {
                world.unobserve_destroyed(entry.watched, self.observer);
            }
        }
        !removed.is_empty()
    }

    fn is_watching(&self, object: ObjectHandle) -> bool {
        self.actor_managers
            .iter()
            .chain(&self.component_managers)
            .any(|e| e.watched == object)
    }

    /// Drop entries whose manager has died
    fn prune(&mut self, world: &mut ObjectWorld, kind: ManagerKind) {
        let stale: Vec<ObjectHandle> = self
            .collection(kind)
            .iter()
            .filter(|e| !world.is_valid(e.manager))
            .map(|e| e.manager)
            .collect();
        if stale.is_empty() {
            return;
        }
        self.remove(world, kind, |e| stale.contains(&e.manager));
        log::debug!("Pruned {} stale {:?} managers", stale.len(), kind);
    }

    /// Apply a destruction reported by the world. Evicts an actor manager
    /// that was destroyed and every component manager whose owner was.
    pub fn handle_destroyed(&mut self, world: &mut ObjectWorld, notice: &DestroyNotice) {
        let object = notice.object;
        let observed = notice.is_observed_by(self.observer);

        let actors = self.remove(world, ManagerKind::Actor, |e| e.manager == object);
        let components = self.remove(world, ManagerKind::Component, |e| {
            e.manager == object || (observed && e.watched == object)
        });
        if actors || components {
            log::debug!("Evicted managers for destroyed object {:?}", object);
        }
    }

    /// First live manager whose class is `class` or a subclass, in
    /// registration order. Stale entries are pruned along the way.
    pub fn resolve(&mut self, world: &mut ObjectWorld, class: ClassId) -> Option<ObjectHandle> {
        if let Some(kind) = ManagerKind::of_class(world.classes(), class) {
            self.prune(world, kind);
        }
        self.find(world, class)
    }

    /// Same lookup as [`ManagerLocator::resolve`] without mutating; stale
    /// entries are skipped
    pub fn find(&self, world: &ObjectWorld, class: ClassId) -> Option<ObjectHandle> {
        let classes = world.classes();
        let found = ManagerKind::of_class(classes, class).and_then(|kind| {
            self.collection(kind)
                .iter()
                .filter(|e| world.is_valid(e.manager))
                .find(|e| classes.is_child_of(e.class, class))
                .map(|e| e.manager)
        });
        if found.is_none() {
            log::error!("Manager of type {} not found!", classes.name(class));
        }
        found
    }

    /// Registered managers of `kind`, in registration order
    pub fn managers(&self, kind: ManagerKind) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.collection(kind).iter().map(|e| e.manager)
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.actor_managers.len() + self.component_managers.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thread-safe manager locator wrapper. Each locator is one
/// mutual-exclusion domain.
pub struct SharedManagerLocator {
    inner: Arc<RwLock<ManagerLocator>>,
}

impl SharedManagerLocator {
    /// Wrap a new locator
    pub fn new(world: &mut ObjectWorld) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ManagerLocator::new(world))),
        }
    }

    /// Get a read lock
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, ManagerLocator> {
        self.inner.read()
    }

    /// Get a write lock
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, ManagerLocator> {
        self.inner.write()
    }
}

impl Clone for SharedManagerLocator {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

//! Explicit owner of every toolbox service for one session
//!
//! Replaces process-wide subsystems: callers hold a [`ToolboxContext`] and
//! reach the asset locator, the manager locator and the initialization
//! sequencer through it.

use jester_assets::{AssetError, AssetLocator, AssetSubsystem, LevelRef, LookupPolicy};
use jester_core::{ClassId, ObjectHandle, ObjectWorld, Tag};
use jester_gamestate::{BindOutcome, PollOutcome, StageGate, StagePhase, StageSequencer};
use jester_managers::{ManagerLocator, Registration};

use crate::error::Result;
use crate::settings::ToolboxSettings;

/// Session-scoped toolbox services
pub struct ToolboxContext {
    world: ObjectWorld,
    assets: AssetSubsystem,
    managers: ManagerLocator,
    initialization: Option<StageSequencer>,
    policy: LookupPolicy,
}

impl ToolboxContext {
    /// Build every service from `settings` against `world`
    pub fn new(mut world: ObjectWorld, settings: &ToolboxSettings) -> Result<Self> {
        let policy = settings.lookup_policy;
        let assets = AssetSubsystem::initialize(settings.assets.as_ref(), &world, policy);
        let managers = ManagerLocator::new(&mut world);
        let initialization = if settings.initialization_steps.is_empty() {
            None
        } else {
            Some(StageSequencer::new(settings.initialization_steps.clone())?)
        };

        log::info!(
            "Toolbox context ready ({} initialization steps, asset locator {})",
            settings.initialization_steps.len(),
            if assets.locator().is_some() { "active" } else { "absent" }
        );

        Ok(Self {
            world,
            assets,
            managers,
            initialization,
            policy,
        })
    }

    pub fn world(&self) -> &ObjectWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ObjectWorld {
        &mut self.world
    }

    /// Active asset locator, if settings produced one
    pub fn asset_locator(&self) -> Option<&AssetLocator> {
        self.assets.locator()
    }

    /// Replace the asset subsystem with one wrapping `locator`
    pub fn set_asset_locator(&mut self, locator: AssetLocator) {
        self.assets = AssetSubsystem::with_locator(locator);
    }

    pub fn managers(&self) -> &ManagerLocator {
        &self.managers
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        self.policy
    }

    // --- Assets ---

    /// Object registered under `tag`; see [`AssetLocator::resolve_object`]
    pub fn resolve_object(
        &self,
        tag: &Tag,
        expected: Option<ClassId>,
    ) -> jester_assets::Result<ObjectHandle> {
        match self.assets.locator() {
            Some(locator) => locator.resolve_object(&self.world, tag, expected),
            None => self.missing_locator(),
        }
    }

    /// Class registered under `tag`; see [`AssetLocator::resolve_class`]
    pub fn resolve_class(&self, tag: &Tag, expected: Option<ClassId>) -> jester_assets::Result<ClassId> {
        match self.assets.locator() {
            Some(locator) => locator.resolve_class(self.world.classes(), tag, expected),
            None => self.missing_locator(),
        }
    }

    /// Level registered under `tag`, null when absent
    pub fn resolve_level(&self, tag: &Tag) -> LevelRef {
        match self.assets.locator() {
            Some(locator) => locator.resolve_level(tag),
            None => {
                log::warn!("No asset locator to resolve level '{}'", tag);
                LevelRef::null()
            }
        }
    }

    fn missing_locator<T>(&self) -> jester_assets::Result<T> {
        let error = AssetError::NotInitialized;
        log::error!("{}", error);
        if self.policy.is_fatal() {
            panic!("{}", error);
        }
        Err(error)
    }

    // --- Managers ---

    /// Register a manager actor or component
    pub fn register_manager(&mut self, manager: ObjectHandle) -> Registration {
        self.managers.register(&mut self.world, manager)
    }

    /// Unregister a manager actor or component
    pub fn unregister_manager(&mut self, manager: ObjectHandle) -> bool {
        self.managers.unregister(&mut self.world, manager)
    }

    /// First live manager of `class` or a subclass
    pub fn resolve_manager(&mut self, class: ClassId) -> Option<ObjectHandle> {
        self.managers.resolve(&mut self.world, class)
    }

    /// Destroy `object` and everything it owns, routing the destruction
    /// notices to the manager locator. Returns how many objects died.
    pub fn destroy_object(&mut self, object: ObjectHandle) -> usize {
        let notices = self.world.destroy(object);
        for notice in &notices {
            self.managers.handle_destroyed(&mut self.world, notice);
        }
        notices.len()
    }

    // --- Initialization ---

    /// Install a sequencer, replacing any current one
    pub fn set_initialization(&mut self, sequencer: StageSequencer) {
        self.initialization = Some(sequencer);
    }

    pub fn initialization(&self) -> Option<&StageSequencer> {
        self.initialization.as_ref()
    }

    pub fn initialization_mut(&mut self) -> Option<&mut StageSequencer> {
        self.initialization.as_mut()
    }

    /// Bind `function` on `receiver` to an initialization stage. `None`
    /// when no sequencer is installed.
    pub fn bind_to_initialization_step(
        &mut self,
        stage: Tag,
        receiver: ObjectHandle,
        function: &str,
        phase: StagePhase,
    ) -> Option<BindOutcome> {
        let Some(sequencer) = self.initialization.as_mut() else {
            log::warn!(
                "Cannot bind '{}' to initialization step '{}': no initialization sequence",
                function,
                stage
            );
            return None;
        };
        Some(sequencer.bind(&self.world, stage, receiver, function, phase))
    }

    /// Drive the sequencer one step. `None` when no sequencer is installed.
    pub fn tick<G: StageGate + ?Sized>(&mut self, gate: &mut G) -> Option<PollOutcome> {
        let sequencer = self.initialization.as_mut()?;
        Some(sequencer.poll(&self.world, gate))
    }
}

impl std::fmt::Debug for ToolboxContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolboxContext")
            .field("objects", &self.world.len())
            .field("assets", &self.assets)
            .field("managers", &self.managers.len())
            .field("initialization", &self.initialization)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jester_core::ClassRegistry;

    fn tag(s: &str) -> Tag {
        Tag::new(s).unwrap()
    }

    fn lenient() -> ToolboxSettings {
        ToolboxSettings::default().with_lookup_policy(LookupPolicy::Lenient)
    }

    #[test]
    fn test_no_sequencer() {
        let mut ctx = ToolboxContext::new(ObjectWorld::new(), &lenient()).unwrap();
        let receiver = ctx.world_mut().spawn(ClassRegistry::ACTOR, "R").unwrap();

        assert!(ctx.initialization().is_none());
        assert!(ctx
            .bind_to_initialization_step(tag("Init"), receiver, "Go", StagePhase::Enter)
            .is_none());
        assert!(ctx.tick(&mut |_: &Tag| true).is_none());
    }

    #[test]
    fn test_duplicate_steps_fail() {
        let settings = lenient().with_initialization_steps([tag("A"), tag("A")]);
        assert!(ToolboxContext::new(ObjectWorld::new(), &settings).is_err());
    }

    #[test]
    fn test_missing_locator_is_lenient() {
        let ctx = ToolboxContext::new(ObjectWorld::new(), &lenient()).unwrap();
        assert_eq!(
            ctx.resolve_object(&tag("Asset.Sword"), None),
            Err(AssetError::NotInitialized)
        );
        assert!(ctx.resolve_level(&tag("Level.Hub")).is_null());
    }

    #[test]
    #[should_panic]
    fn test_missing_locator_is_fatal() {
        let settings = ToolboxSettings::default().with_lookup_policy(LookupPolicy::Fatal);
        let ctx = ToolboxContext::new(ObjectWorld::new(), &settings).unwrap();
        let _ = ctx.resolve_class(&tag("Asset.Class.Sword"), None);
    }

    #[test]
    fn test_destroy_routes_to_managers() {
        let mut ctx = ToolboxContext::new(ObjectWorld::new(), &lenient()).unwrap();
        let class = ctx
            .world_mut()
            .classes_mut()
            .register("AudioManager", ClassRegistry::ACTOR)
            .unwrap();
        let manager = ctx.world_mut().spawn(class, "Audio").unwrap();

        assert_eq!(ctx.register_manager(manager), Registration::Added);
        assert_eq!(ctx.resolve_manager(class), Some(manager));
        assert_eq!(ctx.destroy_object(manager), 1);
        assert!(ctx.managers().is_empty());
    }
}

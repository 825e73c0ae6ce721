//! End-to-end session: settings file, asset lookups, managers and staged
//! initialization through one context

use std::io::Write;
use std::sync::Arc;

use jester_toolbox::prelude::*;
use parking_lot::Mutex;

fn tag(s: &str) -> Tag {
    Tag::new(s).unwrap()
}

struct Session {
    ctx: ToolboxContext,
    calls: Arc<Mutex<Vec<String>>>,
    weapon: ClassId,
    hud: ObjectHandle,
}

const SETTINGS: &str = r#"{
    "lookup_policy": "lenient",
    "initialization_steps": ["Init.Boot", "Init.World", "Init.Players"],
    "assets": {
        "categories": {
            "Weapons": {
                "assets": { "Asset.Data.Sword": "SwordData" },
                "classes": { "Asset.Class.Sword": "Sword" }
            },
            "Ui": {
                "assets": { "Asset.Data.Hud": "Hud" }
            }
        },
        "levels": { "Asset.Level.Hub": "/Game/Maps/Hub" }
    }
}"#;

fn session() -> Session {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SETTINGS.as_bytes()).unwrap();
    let settings = ToolboxSettings::load(file.path()).unwrap();

    let mut world = ObjectWorld::new();
    let classes = world.classes_mut();
    let weapon = classes.register("Weapon", ClassRegistry::ACTOR).unwrap();
    classes.register("Sword", weapon).unwrap();
    let hud_class = classes.register("HudWidget", ClassRegistry::ACTOR).unwrap();

    let calls = Arc::new(Mutex::new(Vec::new()));
    for function in ["Show", "Populate"] {
        let calls = calls.clone();
        world
            .classes_mut()
            .add_function(hud_class, function, move |_| calls.lock().push(function.to_string()))
            .unwrap();
    }

    world.spawn(weapon, "SwordData").unwrap();
    let hud = world.spawn(hud_class, "Hud").unwrap();

    let ctx = ToolboxContext::new(world, &settings).unwrap();
    Session {
        ctx,
        calls,
        weapon,
        hud,
    }
}

#[test]
fn test_asset_lookups() {
    let s = session();
    let locator = s.ctx.asset_locator().expect("locator built from settings");
    assert!(locator.is_initialized());

    let sword = s.ctx.resolve_object(&tag("Asset.Data.Sword"), Some(s.weapon)).unwrap();
    assert_eq!(s.ctx.world().name_of(sword), Some("SwordData"));

    let sword_class = s.ctx.resolve_class(&tag("Asset.Class.Sword"), Some(s.weapon)).unwrap();
    assert_eq!(s.ctx.world().classes().name(sword_class), "Sword");

    assert!(matches!(
        s.ctx.resolve_object(&tag("Asset.Data.Hud"), Some(s.weapon)),
        Err(AssetError::ObjectTypeMismatch { .. })
    ));
    assert_eq!(
        s.ctx.resolve_object(&tag("Asset.Data.Missing"), None),
        Err(AssetError::ObjectNotFound(tag("Asset.Data.Missing")))
    );

    assert_eq!(s.ctx.resolve_level(&tag("Asset.Level.Hub")).path(), Some("/Game/Maps/Hub"));
    assert!(s.ctx.resolve_level(&tag("Asset.Level.Nowhere")).is_null());
}

#[test]
fn test_manager_lifecycle() {
    let mut s = session();
    let world = s.ctx.world_mut();
    let spawner_class = world
        .classes_mut()
        .register("SpawnManager", ClassRegistry::ACTOR)
        .unwrap();
    let inventory_class = world
        .classes_mut()
        .register("InventoryManager", ClassRegistry::COMPONENT)
        .unwrap();
    let spawner = world.spawn(spawner_class, "Spawner").unwrap();
    let game_mode = world.spawn(ClassRegistry::ACTOR, "GameMode").unwrap();
    let inventory = world
        .spawn_owned(inventory_class, "Inventory", game_mode)
        .unwrap();
    let second = world.spawn(spawner_class, "Spawner2").unwrap();

    assert_eq!(s.ctx.register_manager(spawner), Registration::Added);
    assert_eq!(s.ctx.register_manager(inventory), Registration::Added);
    assert_eq!(
        s.ctx.register_manager(second),
        Registration::Conflict { existing: spawner }
    );

    assert_eq!(s.ctx.resolve_manager(spawner_class), Some(spawner));
    assert_eq!(s.ctx.resolve_manager(inventory_class), Some(inventory));

    // Destroying the owning actor takes the component manager with it
    assert_eq!(s.ctx.destroy_object(game_mode), 2);
    assert_eq!(s.ctx.resolve_manager(inventory_class), None);
    assert_eq!(s.ctx.managers().len(), 1);

    assert!(s.ctx.unregister_manager(spawner));
    assert!(!s.ctx.unregister_manager(spawner));
    assert!(s.ctx.managers().is_empty());
}

#[test]
fn test_staged_initialization() {
    let mut s = session();
    let changes = Arc::new(Mutex::new(Vec::new()));
    let finished = Arc::new(Mutex::new(false));
    {
        let init = s.ctx.initialization_mut().expect("sequence configured");
        let changes = changes.clone();
        init.on_stage_changed().subscribe(move |event: &StageChanged| {
            changes.lock().push(event.stage.to_string());
        });
        let finished = finished.clone();
        init.on_fully_initialized()
            .subscribe(move |_: &FullyInitialized| *finished.lock() = true);
    }

    let hud = s.hud;
    assert_eq!(
        s.ctx
            .bind_to_initialization_step(tag("Init.World"), hud, "Show", StagePhase::Enter),
        Some(BindOutcome::Deferred)
    );
    assert_eq!(
        s.ctx
            .bind_to_initialization_step(tag("Init.Players"), hud, "Populate", StagePhase::Post),
        Some(BindOutcome::Deferred)
    );

    // The world stage stays blocked until players have loaded
    let mut players_loaded = false;
    let mut gate = |stage: &Tag| stage.as_str() != "Init.World" || players_loaded;

    assert_eq!(
        s.ctx.tick(&mut gate),
        Some(PollOutcome::Advanced(tag("Init.World")))
    );
    assert_eq!(*s.calls.lock(), vec!["Show"]);
    assert_eq!(
        s.ctx.tick(&mut gate),
        Some(PollOutcome::Waiting(tag("Init.World")))
    );

    players_loaded = true;
    let mut gate = |stage: &Tag| stage.as_str() != "Init.World" || players_loaded;
    assert_eq!(
        s.ctx.tick(&mut gate),
        Some(PollOutcome::Advanced(tag("Init.Players")))
    );
    assert_eq!(s.calls.lock().len(), 1);
    assert_eq!(s.ctx.tick(&mut gate), Some(PollOutcome::FullyInitialized));
    assert_eq!(*s.calls.lock(), vec!["Show", "Populate"]);

    assert_eq!(*changes.lock(), vec!["Init.World", "Init.Players"]);
    assert!(*finished.lock());

    let init = s.ctx.initialization().unwrap();
    assert!(init.is_complete());
    assert_eq!(init.pending_count(), 0);
    assert_eq!(s.ctx.tick(&mut gate), Some(PollOutcome::Complete));

    // Late binders run straight away
    assert_eq!(
        s.ctx
            .bind_to_initialization_step(tag("Init.Boot"), hud, "Show", StagePhase::Post),
        Some(BindOutcome::Executed { invoked: true })
    );
}

#[test]
fn test_destroyed_receiver_never_called() {
    let mut s = session();
    let hud = s.hud;
    s.ctx
        .bind_to_initialization_step(tag("Init.World"), hud, "Show", StagePhase::Enter);
    s.ctx.destroy_object(hud);

    let mut gate = |_: &Tag| true;
    while s.ctx.tick(&mut gate) != Some(PollOutcome::Complete) {}

    assert!(s.calls.lock().is_empty());
}

#[test]
fn test_library_helpers() {
    let tree: TagTree = [tag("Asset.Data.Sword"), tag("Asset.Data.Shield"), tag("Asset.Level.Hub")]
        .iter()
        .collect();
    let leaves = tree.child_tags(&tag("Asset"), 2, true);
    assert_eq!(leaves.len(), 3);
    assert_eq!(tag("Asset.Data.Sword").leaf(), "Sword");

    assert_eq!(time_duration_to_text(125.0), "02:05");
    assert_eq!(unwind_degrees(-190.0), 170.0);

    let mut curve: ScalableCurve = ScalableCurve::default().with_scale(2.0, 100.0);
    curve.add_key_normalized(0.0, 0.0);
    curve.add_key_normalized(1.0, 1.0);
    assert_eq!(curve.evaluate(1.0), 50.0);
}

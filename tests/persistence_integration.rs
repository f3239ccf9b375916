//! Integration tests for saving and loading exploration state
//!
//! A save must reproduce the explored areas, scouts and world seed; any
//! save that cannot be used must fall back to a fresh game instead of
//! failing.

use hamlet::core::error::{ExploreError, Result};
use hamlet::core::types::{ChunkCoord, ScoutId, Vec2};
use hamlet::core::ExplorationConfig;
use hamlet::exploration::ExplorationController;
use hamlet::persistence::{
    load_game, save_game, BlobStore, FileStore, LoadOutcome, MemoryStore, SaveGame, SAVE_KEY, SAVE_VERSION,
};
use hamlet::render::Viewport;

fn config() -> ExplorationConfig {
    ExplorationConfig {
        chunk_size: 64,
        load_radius: 1,
        unload_radius: 2,
        world_seed: Some(99),
        spawn_point: [32.0, 32.0],
        scout_speed: 40.0,
        scout_vision: 16.0,
        ..Default::default()
    }
}

fn home() -> Viewport {
    let mut vp = Viewport::new(64.0, 64.0);
    vp.center_on(Vec2::new(32.0, 32.0));
    vp
}

/// Play a short session: scout walks east, fog animates out
fn explored_controller() -> ExplorationController {
    let mut controller = ExplorationController::new(config()).unwrap();
    let vp = home();
    controller.tick(0.0, &vp);
    controller.tap(Vec2::new(90.0, 40.0)).unwrap();
    for _ in 0..40 {
        controller.tick(0.1, &vp);
    }
    controller
}

/// Store whose every operation fails
struct BrokenStore;

impl BlobStore for BrokenStore {
    fn save_blob(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(ExploreError::Storage("disk full".into()))
    }

    fn load_blob(&self, _key: &str) -> Result<Option<String>> {
        Err(ExploreError::Storage("device unavailable".into()))
    }
}

#[test]
fn test_round_trip_restores_state() {
    let original = explored_controller();
    assert!(original.explored_count() > 0);

    let mut store = MemoryStore::new();
    save_game(&mut store, &original).unwrap();

    // Seed in config differs; the saved seed wins
    let reload_config = ExplorationConfig {
        world_seed: Some(1),
        ..config()
    };
    let (restored, outcome) = load_game(&store, reload_config).unwrap();

    assert_eq!(outcome, LoadOutcome::Restored);
    assert_eq!(restored.world_seed(), 99);
    assert_eq!(restored.explored().to_keys(), original.explored().to_keys());
    assert_eq!(restored.scouts().len(), original.scouts().len());
    for (a, b) in restored.scouts().scouts().iter().zip(original.scouts().scouts()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.exploring, b.exploring);
        assert_eq!(a.target.is_some(), b.target.is_some());
        assert!(a.position.distance(b.position) < 1e-3);
        assert!((a.vision_range - b.vision_range).abs() < 1e-6);
    }
}

#[test]
fn test_restored_fog_rebuilt_from_explored_areas() {
    let original = explored_controller();
    let mut store = MemoryStore::new();
    save_game(&mut store, &original).unwrap();

    let (mut restored, _) = load_game(&store, config()).unwrap();
    restored.tick(0.0, &home());

    let scout_pos = restored.scouts().get(0).unwrap().position;
    assert!(restored.fog().opacity_at(scout_pos).unwrap() < 128);
    assert!(restored.fog().animations().is_empty());
    assert!(restored.masks_match_chunks());

    // Same seed, same terrain
    let mut fresh = ExplorationController::new(config()).unwrap();
    fresh.tick(0.0, &home());
    let coord = ChunkCoord::new(0, 0);
    assert_eq!(
        restored.chunks().get(&coord).unwrap().pixels(),
        fresh.chunks().get(&coord).unwrap().pixels()
    );
}

#[test]
fn test_version_mismatch_resets_to_defaults() {
    let original = explored_controller();
    let mut save = SaveGame::capture(&original);
    save.version = SAVE_VERSION + 1;

    let mut store = MemoryStore::new();
    store.save_blob(SAVE_KEY, &serde_json::to_string(&save).unwrap()).unwrap();

    let (controller, outcome) = load_game(&store, config()).unwrap();
    assert!(matches!(outcome, LoadOutcome::Reset(ref reason) if reason.contains("version")));
    assert_eq!(controller.explored_count(), 0);
    assert_eq!(controller.scouts().len(), 1);
    assert_eq!(controller.scouts().get(0).unwrap().position, Vec2::new(32.0, 32.0));
}

#[test]
fn test_missing_version_field_resets() {
    let mut store = MemoryStore::new();
    store
        .save_blob(SAVE_KEY, r#"{"seed": 5, "explored": ["0,0"], "scouts": []}"#)
        .unwrap();

    let (controller, outcome) = load_game(&store, config()).unwrap();
    assert!(matches!(outcome, LoadOutcome::Reset(_)));
    assert_eq!(controller.world_seed(), 99);
}

#[test]
fn test_wrong_shape_with_current_version_resets() {
    let mut store = MemoryStore::new();
    let blob = format!(r#"{{"version": {}, "seed": "not a number"}}"#, SAVE_VERSION);
    store.save_blob(SAVE_KEY, &blob).unwrap();

    let (_, outcome) = load_game(&store, config()).unwrap();
    assert!(matches!(outcome, LoadOutcome::Reset(_)));
}

#[test]
fn test_failing_store_is_fail_soft() {
    let (controller, outcome) = load_game(&BrokenStore, config()).unwrap();
    assert!(matches!(outcome, LoadOutcome::Reset(ref reason) if reason.contains("device unavailable")));
    assert_eq!(controller.scouts().len(), 1);

    let result = save_game(&mut BrokenStore, &controller);
    assert!(matches!(result, Err(ExploreError::Storage(_))));
}

#[test]
fn test_saved_empty_scout_list_stays_empty() {
    let config_without_scouts = ExplorationConfig {
        starting_scouts: 0,
        ..config()
    };
    let controller = ExplorationController::new(config_without_scouts).unwrap();
    let mut store = MemoryStore::new();
    save_game(&mut store, &controller).unwrap();

    let (restored, outcome) = load_game(&store, config()).unwrap();
    assert_eq!(outcome, LoadOutcome::Restored);
    assert!(restored.scouts().is_empty());
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let original = explored_controller();

    let mut store = FileStore::new(dir.path());
    save_game(&mut store, &original).unwrap();
    assert!(dir.path().join("hamlet.exploration.json").exists());

    let reopened = FileStore::new(dir.path());
    let (restored, outcome) = load_game(&reopened, config()).unwrap();
    assert_eq!(outcome, LoadOutcome::Restored);
    assert_eq!(restored.explored_count(), original.explored_count());
}

#[test]
fn test_file_store_without_save_is_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let (_, outcome) = load_game(&FileStore::new(dir.path()), config()).unwrap();
    assert_eq!(outcome, LoadOutcome::Fresh);
}

#[test]
fn test_save_with_last_scout_id_resets() {
    let original = explored_controller();
    let mut save = SaveGame::capture(&original);
    save.scouts[0].id = ScoutId(u32::MAX);

    let mut store = MemoryStore::new();
    store.save_blob(SAVE_KEY, &serde_json::to_string(&save).unwrap()).unwrap();

    let (mut controller, outcome) = load_game(&store, config()).unwrap();
    assert!(matches!(outcome, LoadOutcome::Reset(ref reason) if reason.contains("Invalid save")));
    assert_eq!(controller.explored_count(), 0);
    assert_eq!(controller.scouts().len(), 1);
    assert!(controller.tap(Vec2::new(40.0, 40.0)).is_ok());
}

#[test]
fn test_save_with_oversized_vision_resets() {
    let original = explored_controller();
    let mut save = SaveGame::capture(&original);
    save.scouts[0].vision_range = 20000.0;

    let mut store = MemoryStore::new();
    store.save_blob(SAVE_KEY, &serde_json::to_string(&save).unwrap()).unwrap();

    let (controller, outcome) = load_game(&store, config()).unwrap();
    assert!(matches!(outcome, LoadOutcome::Reset(ref reason) if reason.contains("vision")));
    assert_eq!(controller.scouts().get(0).unwrap().vision_range, 16.0);
}

#[test]
fn test_save_with_negative_speed_resets() {
    let original = explored_controller();
    let mut save = SaveGame::capture(&original);
    save.scouts[0].speed = -5.0;

    let mut store = MemoryStore::new();
    store.save_blob(SAVE_KEY, &serde_json::to_string(&save).unwrap()).unwrap();

    let (_, outcome) = load_game(&store, config()).unwrap();
    assert!(matches!(outcome, LoadOutcome::Reset(_)));
}

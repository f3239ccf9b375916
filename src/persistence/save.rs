//! Versioned save game
//!
//! Loading never fails the game: a missing, outdated or unreadable save
//! yields a fresh controller and a `LoadOutcome` saying why.

use serde::{Deserialize, Serialize};

use crate::core::config::ExplorationConfig;
use crate::core::error::{ExploreError, Result};
use crate::exploration::controller::ExplorationController;
use crate::exploration::scouts::ScoutAgent;
use crate::persistence::BlobStore;

/// Bumped whenever the save layout changes
pub const SAVE_VERSION: u32 = 1;

/// Store key for the exploration save
pub const SAVE_KEY: &str = "hamlet.exploration";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub seed: u64,
    /// `"tx,ty"` explored tile keys
    pub explored_areas: Vec<String>,
    pub scouts: Vec<ScoutAgent>,
}

impl SaveGame {
    /// Snapshot the persistent part of a controller
    pub fn capture(controller: &ExplorationController) -> Self {
        Self {
            version: SAVE_VERSION,
            seed: controller.world_seed(),
            explored_areas: controller.explored().to_keys(),
            scouts: controller.scouts().scouts().to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a blob, checking the version tag before the typed decode so
    /// an older layout reports a mismatch rather than a parse error.
    pub fn from_json(blob: &str) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_str(blob)?;
        let found = raw.get("version").and_then(|v| v.as_u64());
        match found {
            Some(v) if v == SAVE_VERSION as u64 => Ok(serde_json::from_value(raw)?),
            other => Err(ExploreError::SaveVersionMismatch {
                found: other.map_or(0, |v| v.min(u32::MAX as u64) as u32),
                expected: SAVE_VERSION,
            }),
        }
    }
}

/// How `load_game` produced its controller
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// State came from the save
    Restored,
    /// Nothing was saved
    Fresh,
    /// A save existed but was discarded
    Reset(String),
}

pub fn save_game(store: &mut dyn BlobStore, controller: &ExplorationController) -> Result<()> {
    let save = SaveGame::capture(controller);
    store.save_blob(SAVE_KEY, &save.to_json()?)?;
    tracing::debug!(
        "Saved exploration: {} explored tiles, {} scouts",
        save.explored_areas.len(),
        save.scouts.len()
    );
    Ok(())
}

/// Restore the controller from `store`, falling back to a fresh game.
///
/// Only an invalid `config` is an error; every storage problem becomes
/// `LoadOutcome::Reset`.
pub fn load_game(store: &dyn BlobStore, config: ExplorationConfig) -> Result<(ExplorationController, LoadOutcome)> {
    config.validate()?;

    let blob = match store.load_blob(SAVE_KEY) {
        Ok(Some(blob)) => blob,
        Ok(None) => return Ok((ExplorationController::new(config)?, LoadOutcome::Fresh)),
        Err(e) => return reset(config, e),
    };

    match SaveGame::from_json(&blob) {
        Ok(save) => {
            let (seed, tiles, scouts) = (save.seed, save.explored_areas.len(), save.scouts.len());
            match ExplorationController::from_saved(config.clone(), save.seed, save.scouts, &save.explored_areas) {
                Ok(controller) => {
                    tracing::info!(
                        "Restored exploration: seed {}, {} explored tiles, {} scouts",
                        seed,
                        tiles,
                        scouts
                    );
                    Ok((controller, LoadOutcome::Restored))
                }
                Err(e) => reset(config, e),
            }
        }
        Err(e) => reset(config, e),
    }
}

fn reset(config: ExplorationConfig, reason: ExploreError) -> Result<(ExplorationController, LoadOutcome)> {
    tracing::warn!("Discarding exploration save: {}", reason);
    Ok((ExplorationController::new(config)?, LoadOutcome::Reset(reason.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn config() -> ExplorationConfig {
        ExplorationConfig {
            chunk_size: 64,
            load_radius: 1,
            unload_radius: 2,
            world_seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_store_is_fresh() {
        let store = MemoryStore::new();
        let (controller, outcome) = load_game(&store, config()).unwrap();
        assert_eq!(outcome, LoadOutcome::Fresh);
        assert_eq!(controller.scouts().len(), 1);
        assert_eq!(controller.world_seed(), 7);
    }

    #[test]
    fn test_version_checked_before_decode() {
        let err = SaveGame::from_json(r#"{"version": 0, "layout": "old"}"#).unwrap_err();
        assert!(matches!(err, ExploreError::SaveVersionMismatch { found: 0, expected: SAVE_VERSION }));

        let err = SaveGame::from_json(r#"{"seed": 1}"#).unwrap_err();
        assert!(matches!(err, ExploreError::SaveVersionMismatch { found: 0, .. }));
    }

    #[test]
    fn test_corrupt_blob_resets() {
        let mut store = MemoryStore::new();
        store.save_blob(SAVE_KEY, "{not json").unwrap();
        let (controller, outcome) = load_game(&store, config()).unwrap();
        assert!(matches!(outcome, LoadOutcome::Reset(_)));
        assert_eq!(controller.explored_count(), 0);
    }

    #[test]
    fn test_capture_uses_current_version() {
        let controller = ExplorationController::new(config()).unwrap();
        let save = SaveGame::capture(&controller);
        assert_eq!(save.version, SAVE_VERSION);
        assert_eq!(save.seed, 7);
        assert_eq!(save.scouts.len(), 1);
    }
}

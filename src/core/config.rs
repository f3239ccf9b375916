//! Exploration configuration with documented constants
//!
//! All tunables for chunk streaming, fog reveal and scouting are collected
//! here. Values can be overridden from a TOML file; missing keys keep their
//! defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{ExploreError, Result};
use crate::core::types::Vec2;

/// Largest accepted chunk side; fog and terrain buffers are `size²` bytes
pub const MAX_CHUNK_SIZE: u32 = 4096;

/// Largest vision range a scout may have (world units)
pub const MAX_VISION_RANGE: f32 = 2048.0;

/// Configuration for the exploration core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    // === CHUNK STREAMING ===
    /// Side length of a chunk in world units (= terrain pixels)
    ///
    /// Fog masks share this resolution, so memory per loaded chunk is
    /// roughly `chunk_size² × 2` bytes (terrain + opacity).
    pub chunk_size: u32,

    /// Chebyshev radius (in chunks) kept resident around the view center
    ///
    /// A radius of 2 keeps a 5×5 block of chunks loaded.
    pub load_radius: i32,

    /// Chunks farther than this from the view center are evicted
    ///
    /// Must exceed `load_radius` so a camera wobbling across a chunk
    /// border does not thrash generation.
    pub unload_radius: i32,

    /// Whether distant chunks are evicted at all
    ///
    /// `false` reproduces unbounded growth: every chunk ever approached
    /// stays resident.
    pub evict_distant_chunks: bool,

    /// Maximum chunks generated in a single tick
    ///
    /// `None` generates every missing chunk immediately. A cap spreads a
    /// bloom of new chunks over several frames, nearest first.
    pub max_chunks_per_tick: Option<usize>,

    /// World seed for terrain generation
    ///
    /// `None` picks a random seed for new games. Loaded games always use
    /// the persisted seed.
    pub world_seed: Option<u64>,

    /// Terrain features (tree clusters, rocks, ponds) per 256×256 area
    pub feature_density: f32,

    // === FOG ===
    /// Duration of a reveal animation in milliseconds
    pub reveal_duration_ms: f64,

    /// Side length of an explored-area tile in world units
    ///
    /// Explored tiles are what persists across sessions; the fog raster
    /// is rebuilt from them on load.
    pub explored_tile_size: f32,

    // === SCOUTS ===
    /// Distance at which a scout counts as arrived (world units)
    pub arrival_threshold: f32,

    /// Multiplier applied to vision range for the arrival reveal
    pub arrival_reveal_multiplier: f32,

    /// Scouts created for a fresh game
    pub starting_scouts: usize,

    /// Scout movement speed (world units per second)
    pub scout_speed: f32,

    /// Scout vision range, used as the reveal radius while moving
    pub scout_vision: f32,

    /// Scout starting health
    pub scout_health: f32,

    /// Where fresh scouts are placed
    pub spawn_point: [f32; 2],
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            // Streaming (unload = ceil(1.5 × load))
            chunk_size: 256,
            load_radius: 2,
            unload_radius: 3,
            evict_distant_chunks: true,
            max_chunks_per_tick: None,
            world_seed: None,
            feature_density: 12.0,

            // Fog
            reveal_duration_ms: 800.0,
            explored_tile_size: 32.0,

            // Scouts
            arrival_threshold: 5.0,
            arrival_reveal_multiplier: 1.5,
            starting_scouts: 1,
            scout_speed: 60.0,
            scout_vision: 80.0,
            scout_health: 100.0,
            spawn_point: [128.0, 128.0],
        }
    }
}

impl ExplorationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML, keeping defaults for missing keys
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExplorationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn spawn_point(&self) -> Vec2 {
        Vec2::from(self.spawn_point)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ExploreError::InvalidConfig(format!(
                "chunk_size ({}) must be in 1..={}",
                self.chunk_size, MAX_CHUNK_SIZE
            )));
        }

        if self.load_radius < 0 {
            return Err(ExploreError::InvalidConfig(format!(
                "load_radius ({}) must not be negative",
                self.load_radius
            )));
        }

        if self.evict_distant_chunks && self.unload_radius <= self.load_radius {
            return Err(ExploreError::InvalidConfig(format!(
                "unload_radius ({}) should be > load_radius ({})",
                self.unload_radius, self.load_radius
            )));
        }

        if self.max_chunks_per_tick == Some(0) {
            return Err(ExploreError::InvalidConfig(
                "max_chunks_per_tick must be at least 1 when set".into(),
            ));
        }

        if !(self.reveal_duration_ms.is_finite() && self.reveal_duration_ms > 0.0) {
            return Err(ExploreError::InvalidConfig("reveal_duration_ms must be finite and positive".into()));
        }

        if !(self.explored_tile_size.is_finite() && self.explored_tile_size >= 1.0) {
            return Err(ExploreError::InvalidConfig(format!(
                "explored_tile_size ({}) must be finite and at least 1",
                self.explored_tile_size
            )));
        }

        if !(self.scout_speed.is_finite() && self.scout_speed >= 0.0)
            || !(self.arrival_threshold.is_finite() && self.arrival_threshold >= 0.0)
        {
            return Err(ExploreError::InvalidConfig(
                "scout speed and arrival threshold must be finite and non-negative".into(),
            ));
        }

        if !(self.scout_vision > 0.0 && self.scout_vision <= MAX_VISION_RANGE) {
            return Err(ExploreError::InvalidConfig(format!(
                "scout_vision ({}) must be in (0, {}]",
                self.scout_vision, MAX_VISION_RANGE
            )));
        }

        if !(self.arrival_reveal_multiplier.is_finite() && self.arrival_reveal_multiplier > 0.0) {
            return Err(ExploreError::InvalidConfig(
                "arrival_reveal_multiplier must be finite and positive".into(),
            ));
        }

        if !self.scout_health.is_finite() || !self.spawn_point().is_finite() {
            return Err(ExploreError::InvalidConfig("scout health and spawn point must be finite".into()));
        }

        Ok(())
    }
}

/// Load config from a TOML file
pub fn load_config(path: &Path) -> Result<ExplorationConfig> {
    let contents = fs::read_to_string(path)?;
    ExplorationConfig::from_toml_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExplorationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_oversized_chunk_rejected() {
        let config = ExplorationConfig {
            chunk_size: 65536,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ExploreError::InvalidConfig(_))));

        let largest = ExplorationConfig {
            chunk_size: MAX_CHUNK_SIZE,
            ..Default::default()
        };
        assert!(largest.validate().is_ok());
        assert!(ExplorationConfig::from_toml_str("chunk_size = 8192\n").is_err());
    }

    #[test]
    fn test_infinite_scout_values_rejected() {
        let base = ExplorationConfig::default();
        for config in [
            ExplorationConfig { scout_speed: f32::INFINITY, ..base.clone() },
            ExplorationConfig { scout_vision: f32::INFINITY, ..base.clone() },
            ExplorationConfig { arrival_threshold: f32::INFINITY, ..base.clone() },
            ExplorationConfig { arrival_reveal_multiplier: f32::NAN, ..base.clone() },
            ExplorationConfig { scout_vision: MAX_VISION_RANGE * 2.0, ..base.clone() },
            ExplorationConfig { explored_tile_size: 0.001, ..base.clone() },
            ExplorationConfig { spawn_point: [f32::NAN, 0.0], ..base.clone() },
        ] {
            assert!(config.validate().is_err(), "accepted {:?}", config);
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ExplorationConfig::from_toml_str("chunk_size = 64\nworld_seed = 7\n").unwrap();
        assert_eq!(config.chunk_size, 64);
        assert_eq!(config.world_seed, Some(7));
        assert_eq!(config.load_radius, 2);
        assert_eq!(config.reveal_duration_ms, 800.0);
    }

    #[test]
    fn test_unload_radius_must_exceed_load_radius() {
        let config = ExplorationConfig {
            load_radius: 3,
            unload_radius: 3,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ExploreError::InvalidConfig(_))));

        // Irrelevant when eviction is off
        let config = ExplorationConfig {
            evict_distant_chunks: false,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_generation_cap_rejected() {
        let config = ExplorationConfig {
            max_chunks_per_tick: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml_is_error() {
        let result = ExplorationConfig::from_toml_str("chunk_size = \"big\"");
        assert!(matches!(result, Err(ExploreError::TomlError(_))));
    }

    #[test]
    fn test_load_sample_config() {
        let config = load_config(Path::new("data/exploration.toml")).expect("Should load sample config");
        assert!(config.validate().is_ok());
        assert_eq!(config.spawn_point(), Vec2::new(128.0, 128.0));
    }
}

//! Exploration core: streamed terrain, fog of war and scouts

pub mod chunk;
pub mod controller;
pub mod effects;
pub mod explored;
pub mod fog;
pub mod input;
pub mod scouts;

pub use chunk::{Chunk, ChunkStore, LoadReport, Terrain};
pub use controller::{ExplorationController, ExplorationEvent, InputOutcome};
pub use effects::{EffectLog, EffectsNotifier, NoEffects};
pub use explored::ExploredAreaSet;
pub use fog::{FogLayer, FogMask, RevealAnimation};
pub use input::{AreaInfo, InputEvent};
pub use scouts::{ScoutAgent, ScoutEvent, ScoutSet};

//! Discrete input events fed in by the touch layer
//!
//! Gesture classification happens outside the core; only resolved world
//! points arrive here.

use crate::core::types::{ChunkCoord, Vec2};
use crate::exploration::chunk::Terrain;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Tap(Vec2),
    LongPress(Vec2),
}

/// What the player can learn about a point by long-pressing it
#[derive(Debug, Clone, PartialEq)]
pub struct AreaInfo {
    pub point: Vec2,
    pub chunk: ChunkCoord,
    pub chunk_loaded: bool,
    pub explored: bool,
    /// Only reported for explored points
    pub terrain: Option<Terrain>,
    pub fog_opacity: Option<u8>,
}

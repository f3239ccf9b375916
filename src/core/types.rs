//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// World-space point (one world unit = one terrain pixel)
pub use glam::Vec2;

/// Integer grid coordinate of a terrain chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkCoord {
    pub fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// Chunk containing a world point (floor division by chunk size)
    ///
    /// Non-finite inputs saturate through the float-to-int cast, so NaN
    /// resolves to chunk 0 rather than panicking.
    pub fn containing(point: Vec2, chunk_size: u32) -> Self {
        let size = chunk_size as f32;
        Self {
            cx: (point.x / size).floor() as i32,
            cy: (point.y / size).floor() as i32,
        }
    }

    /// World origin (top-left corner) of this chunk
    pub fn world_origin(&self, chunk_size: u32) -> Vec2 {
        Vec2::new(
            self.cx as f32 * chunk_size as f32,
            self.cy as f32 * chunk_size as f32,
        )
    }

    /// World-space rectangle covered by this chunk
    pub fn world_rect(&self, chunk_size: u32) -> WorldRect {
        let min = self.world_origin(chunk_size);
        WorldRect::new(min, min + Vec2::splat(chunk_size as f32))
    }

    /// Chebyshev distance in chunks, saturating at `i32::MAX`
    pub fn chebyshev(&self, other: &ChunkCoord) -> i32 {
        let d = self.cx.abs_diff(other.cx).max(self.cy.abs_diff(other.cy));
        d.min(i32::MAX as u32) as i32
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.cx, self.cy)
    }
}

/// Axis-aligned world-space rectangle, `min` inclusive, `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// True when the rectangles overlap with non-zero area
    pub fn intersects(&self, other: &WorldRect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Stable identifier for a scout, independent of its index in the set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoutId(pub u32);

/// Time since the game started, in milliseconds
pub type Millis = f64;

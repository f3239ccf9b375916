//! Rendering adapter for the exploration core
//!
//! Exploration state never draws itself. The controller walks the visible
//! chunks and scouts and hands them to a `RenderTarget`, which may record
//! commands (headless) or composite pixels.
//! This module is READ-ONLY - it never modifies exploration state.

pub mod camera;
pub mod colors;
pub mod raster;

pub use camera::Viewport;
pub use raster::RasterTarget;

use crate::core::types::{ChunkCoord, ScoutId, Vec2};
use crate::exploration::chunk::Chunk;
use crate::exploration::fog::FogMask;
use crate::exploration::scouts::ScoutAgent;

/// Sink for one frame of exploration drawing
///
/// Origins are screen-space positions of a chunk's top-left corner; `scale`
/// is screen pixels per world unit.
pub trait RenderTarget {
    fn draw_terrain(&mut self, chunk: &Chunk, screen_origin: Vec2, scale: f32);
    fn draw_fog(&mut self, mask: &FogMask, screen_origin: Vec2, scale: f32);
    fn draw_scout(&mut self, scout: &ScoutAgent, screen_pos: Vec2, scale: f32);
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Terrain { chunk: ChunkCoord, origin: Vec2, scale: f32 },
    Fog { chunk: ChunkCoord, origin: Vec2, scale: f32 },
    Scout { scout: ScoutId, position: Vec2, exploring: bool },
}

/// Records draw calls in order
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl RenderTarget for DrawList {
    fn draw_terrain(&mut self, chunk: &Chunk, screen_origin: Vec2, scale: f32) {
        self.commands.push(DrawCommand::Terrain {
            chunk: chunk.coord,
            origin: screen_origin,
            scale,
        });
    }

    fn draw_fog(&mut self, mask: &FogMask, screen_origin: Vec2, scale: f32) {
        self.commands.push(DrawCommand::Fog {
            chunk: mask.coord,
            origin: screen_origin,
            scale,
        });
    }

    fn draw_scout(&mut self, scout: &ScoutAgent, screen_pos: Vec2, _scale: f32) {
        self.commands.push(DrawCommand::Scout {
            scout: scout.id,
            position: screen_pos,
            exploring: scout.exploring,
        });
    }
}

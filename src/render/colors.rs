//! Color definitions for terrain, fog and scouts

use crate::exploration::chunk::Terrain;

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Alpha-blend `over` on top of `self`, weighting by `alpha`
    pub fn blend(&self, over: Color, alpha: f32) -> Self {
        let a = alpha.clamp(0.0, 1.0);
        Self {
            r: self.r + (over.r - self.r) * a,
            g: self.g + (over.g - self.g) * a,
            b: self.b + (over.b - self.b) * a,
            a: self.a.max(a),
        }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c(self.r), c(self.g), c(self.b), c(self.a)]
    }

    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self::new(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        )
    }
}

/// Canvas background outside any loaded chunk
pub const BACKGROUND: Color = Color::new(0.1, 0.1, 0.12, 1.0);

/// Parchment-grey fog drawn over unexplored terrain
pub const FOG: Color = Color::new(0.78, 0.76, 0.72, 1.0);

pub const SCOUT_IDLE: Color = Color::new(0.95, 0.85, 0.3, 1.0);
pub const SCOUT_EXPLORING: Color = Color::new(1.0, 1.0, 1.0, 1.0);

pub fn terrain_color(terrain: Terrain) -> Color {
    match terrain {
        Terrain::Grass => Color::new(0.45, 0.68, 0.32, 1.0),
        Terrain::Meadow => Color::new(0.62, 0.78, 0.38, 1.0),
        Terrain::Forest => Color::new(0.16, 0.42, 0.2, 1.0),
        Terrain::Rock => Color::new(0.55, 0.53, 0.5, 1.0),
        Terrain::Water => Color::new(0.25, 0.5, 0.8, 1.0),
        Terrain::Sand => Color::new(0.86, 0.8, 0.55, 1.0),
    }
}

/// Modulate color based on health in [0, 100] (lower health = more red tint)
pub fn health_tint(base: Color, health: f32) -> Color {
    let health_clamped = (health / 100.0).clamp(0.0, 1.0);
    Color {
        r: base.r + (1.0 - base.r) * (1.0 - health_clamped) * 0.5,
        g: base.g * health_clamped,
        b: base.b * health_clamped,
        a: base.a,
    }
}

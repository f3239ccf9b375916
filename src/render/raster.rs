//! Software compositor into an RGBA image
//!
//! Nearest-neighbour sampling is enough for a headless preview; the real
//! canvas adapter does its own scaling.

use image::{Rgba, RgbaImage};
use std::path::Path;

use crate::core::error::{ExploreError, Result};
use crate::core::types::Vec2;
use crate::exploration::chunk::Chunk;
use crate::exploration::fog::{FogMask, FULLY_FOGGED};
use crate::exploration::scouts::ScoutAgent;
use crate::render::colors::{self, Color};
use crate::render::RenderTarget;

/// Scout marker radius in canvas pixels
const SCOUT_MARKER_RADIUS: f32 = 4.0;

pub struct RasterTarget {
    image: RgbaImage,
}

impl RasterTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(colors::BACKGROUND.to_rgba8())),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image
            .save(path)
            .map_err(|e| ExploreError::Storage(format!("Failed to write {:?}: {}", path, e)))
    }

    /// Visit every canvas pixel covered by a `size`-pixel square source
    /// drawn at `origin` with `scale`, passing the source pixel index.
    fn for_each_covered(&mut self, size: u32, origin: Vec2, scale: f32, mut f: impl FnMut(&mut Rgba<u8>, usize)) {
        if !origin.is_finite() || !(scale > 0.0) || size == 0 {
            return;
        }
        let (w, h) = self.image.dimensions();
        let extent = size as f32 * scale;

        let x0 = origin.x.max(0.0).floor() as u32;
        let y0 = origin.y.max(0.0).floor() as u32;
        let x1 = (origin.x + extent).ceil().clamp(0.0, w as f32) as u32;
        let y1 = (origin.y + extent).ceil().clamp(0.0, h as f32) as u32;

        for py in y0..y1 {
            let sy = ((py as f32 + 0.5 - origin.y) / scale).floor();
            if sy < 0.0 || sy >= size as f32 {
                continue;
            }
            for px in x0..x1 {
                let sx = ((px as f32 + 0.5 - origin.x) / scale).floor();
                if sx < 0.0 || sx >= size as f32 {
                    continue;
                }
                let index = sy as usize * size as usize + sx as usize;
                f(self.image.get_pixel_mut(px, py), index);
            }
        }
    }
}

impl RenderTarget for RasterTarget {
    fn draw_terrain(&mut self, chunk: &Chunk, screen_origin: Vec2, scale: f32) {
        let pixels = chunk.pixels();
        self.for_each_covered(chunk.size(), screen_origin, scale, |px, i| {
            *px = Rgba(colors::terrain_color(pixels[i]).to_rgba8());
        });
    }

    fn draw_fog(&mut self, mask: &FogMask, screen_origin: Vec2, scale: f32) {
        let opacity = mask.opacity();
        self.for_each_covered(mask.size(), screen_origin, scale, |px, i| {
            let alpha = opacity[i] as f32 / FULLY_FOGGED as f32;
            if alpha > 0.0 {
                *px = Rgba(Color::from_rgba8(px.0).blend(colors::FOG, alpha).to_rgba8());
            }
        });
    }

    fn draw_scout(&mut self, scout: &ScoutAgent, screen_pos: Vec2, _scale: f32) {
        if !screen_pos.is_finite() {
            return;
        }
        let base = if scout.exploring {
            colors::SCOUT_EXPLORING
        } else {
            colors::SCOUT_IDLE
        };
        let color = Rgba(colors::health_tint(base, scout.health).to_rgba8());

        let (w, h) = self.image.dimensions();
        let r = SCOUT_MARKER_RADIUS;
        let x0 = (screen_pos.x - r).floor().max(0.0) as u32;
        let y0 = (screen_pos.y - r).floor().max(0.0) as u32;
        let x1 = ((screen_pos.x + r).ceil().max(0.0) as u32).min(w);
        let y1 = ((screen_pos.y + r).ceil().max(0.0) as u32).min(h);

        for py in y0..y1 {
            for px in x0..x1 {
                let d = Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - screen_pos;
                if d.length_squared() <= r * r {
                    self.image.put_pixel(px, py, color);
                }
            }
        }
    }
}

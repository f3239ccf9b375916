//! Fog of war - per-chunk opacity masks and animated reveals
//!
//! Every resident chunk has exactly one mask, created fully opaque. Reveals
//! are queued as animations that grow a clearing radius with an ease-out
//! curve; each tick the current circle is carved into the masks it touches.
//! Carving only ever lowers opacity, so fog never returns.

use ahash::AHashMap;

use crate::core::error::{ExploreError, Result};
use crate::core::types::{ChunkCoord, Millis, Vec2};
use crate::exploration::explored::ExploredAreaSet;
use crate::render::RenderTarget;

/// Opacity of unexplored fog
pub const FULLY_FOGGED: u8 = 255;

/// Gradient stop (fraction of radius) where a reveal clears half the fog
pub const HALF_REVEAL_STOP: f32 = 0.7;

/// Largest radius a single reveal may clear (world units)
pub const MAX_REVEAL_RADIUS: f32 = 4096.0;

/// Stamp radius, in explored tiles, used when rebuilding fog from the
/// explored set
const RESTORE_RADIUS_TILES: f32 = 1.5;

/// Opacity raster for one chunk, row-major, same resolution as the terrain
#[derive(Debug, Clone)]
pub struct FogMask {
    pub coord: ChunkCoord,
    size: u32,
    opacity: Vec<u8>,
}

impl FogMask {
    pub fn new(coord: ChunkCoord, size: u32) -> Self {
        Self {
            coord,
            size,
            opacity: vec![FULLY_FOGGED; (size * size) as usize],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn opacity(&self) -> &[u8] {
        &self.opacity
    }

    pub fn opacity_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.opacity.get((y * self.size + x) as usize).copied()
    }

    /// Fraction of the mask that is no longer fully fogged
    pub fn revealed_fraction(&self) -> f32 {
        let touched = self.opacity.iter().filter(|&&a| a < FULLY_FOGGED).count();
        touched as f32 / self.opacity.len().max(1) as f32
    }

    /// Erase fog within `radius` of a chunk-local point using the radial
    /// reveal gradient. Returns false (and draws nothing) for non-finite or
    /// non-positive geometry.
    pub fn carve(&mut self, local_center: Vec2, radius: f32) -> bool {
        if !local_center.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return false;
        }

        let size_f = self.size as f32;
        if local_center.x + radius < 0.0
            || local_center.y + radius < 0.0
            || local_center.x - radius >= size_f
            || local_center.y - radius >= size_f
        {
            return false;
        }

        let max = size_f - 1.0;
        let x0 = (local_center.x - radius).floor().clamp(0.0, max) as u32;
        let x1 = (local_center.x + radius).ceil().clamp(0.0, max) as u32;
        let y0 = (local_center.y - radius).floor().clamp(0.0, max) as u32;
        let y1 = (local_center.y + radius).ceil().clamp(0.0, max) as u32;

        for y in y0..=y1 {
            let row = (y * self.size) as usize;
            for x in x0..=x1 {
                let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let strength = reveal_strength(pixel.distance(local_center), radius);
                if strength <= 0.0 {
                    continue;
                }
                let cell = &mut self.opacity[row + x as usize];
                *cell = (*cell as f32 * (1.0 - strength)).floor() as u8;
            }
        }

        true
    }
}

/// Three-stop radial gradient: fully revealed at the center, half at 70%
/// of the radius, no effect at the edge.
pub fn reveal_strength(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let t = distance / radius;
    if t >= 1.0 {
        0.0
    } else if t <= HALF_REVEAL_STOP {
        1.0 - 0.5 * (t / HALF_REVEAL_STOP)
    } else {
        0.5 * (1.0 - t) / (1.0 - HALF_REVEAL_STOP)
    }
}

/// Ease-out cubic: fast start, slow finish
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// A queued fog-clearing animation
#[derive(Debug, Clone, PartialEq)]
pub struct RevealAnimation {
    pub center: Vec2,
    /// Radius carved on the most recent tick
    pub radius: f32,
    pub target_radius: f32,
    pub start: Millis,
    pub duration: Millis,
    /// Chunk containing `center`
    pub owner: ChunkCoord,
}

impl RevealAnimation {
    /// Linear progress in [0, 1]
    pub fn progress(&self, now: Millis) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let t = ((now - self.start) / self.duration) as f32;
        if t.is_nan() {
            return 1.0;
        }
        t.clamp(0.0, 1.0)
    }

    pub fn eased_progress(&self, now: Millis) -> f32 {
        ease_out_cubic(self.progress(now))
    }

    pub fn is_complete(&self, now: Millis) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Owns every fog mask and the pending reveal animations
#[derive(Debug)]
pub struct FogLayer {
    chunk_size: u32,
    reveal_duration: Millis,
    masks: AHashMap<ChunkCoord, FogMask>,
    animations: Vec<RevealAnimation>,
    now: Millis,
}

impl FogLayer {
    pub fn new(chunk_size: u32, reveal_duration: Millis) -> Self {
        Self {
            chunk_size,
            reveal_duration,
            masks: AHashMap::new(),
            animations: Vec::new(),
            now: 0.0,
        }
    }

    /// Allocate a fully opaque mask; no-op if one exists. Returns whether a
    /// mask was created.
    pub fn create_mask_for(&mut self, coord: ChunkCoord) -> bool {
        if self.masks.contains_key(&coord) {
            return false;
        }
        self.masks.insert(coord, FogMask::new(coord, self.chunk_size));
        true
    }

    /// Drop a mask together with its evicted chunk
    pub fn remove_mask(&mut self, coord: ChunkCoord) -> Option<FogMask> {
        self.masks.remove(&coord)
    }

    /// Instantly carve every explored tile overlapping `coord` into its
    /// mask. Used when a chunk is (re)generated after a load or eviction.
    pub fn restore_explored(&mut self, coord: ChunkCoord, explored: &ExploredAreaSet) -> usize {
        let Some(mask) = self.masks.get_mut(&coord) else {
            return 0;
        };
        if explored.is_empty() {
            return 0;
        }

        let radius = explored.tile_size() * RESTORE_RADIUS_TILES;
        let origin = coord.world_origin(self.chunk_size);
        let mut area = coord.world_rect(self.chunk_size);
        area.min -= Vec2::splat(radius);
        area.max += Vec2::splat(radius);

        let tiles = explored.tiles_in(&area);
        for &tile in &tiles {
            mask.carve(explored.tile_center(tile) - origin, radius);
        }
        tiles.len()
    }

    /// Queue a reveal of `radius` around `point`.
    ///
    /// Fails with `ChunkNotLoaded` (and queues nothing) when the chunk
    /// containing `point` has no mask.
    pub fn reveal(&mut self, point: Vec2, radius: f32) -> Result<()> {
        let owner = ChunkCoord::containing(point, self.chunk_size);
        if !self.masks.contains_key(&owner) {
            return Err(ExploreError::ChunkNotLoaded(owner));
        }

        self.animations.push(RevealAnimation {
            center: point,
            radius: 0.0,
            target_radius: radius,
            start: self.now,
            duration: self.reveal_duration,
            owner,
        });
        Ok(())
    }

    /// Advance every animation to `now`, carve the current circles and drop
    /// finished animations. Returns how many finished this tick.
    pub fn tick(&mut self, now: Millis) -> usize {
        if now.is_finite() {
            self.now = now;
        }

        let mut finished = 0;
        let mut i = 0;
        while i < self.animations.len() {
            let anim = &mut self.animations[i];
            let eased = anim.eased_progress(self.now);
            anim.radius = anim.target_radius * eased;

            let (center, radius) = (anim.center, anim.radius);
            let complete = anim.is_complete(self.now);

            if center.is_finite() && radius.is_finite() && radius >= 0.0 {
                carve_world(&mut self.masks, self.chunk_size, center, radius);
            } else {
                tracing::debug!(
                    "{}",
                    ExploreError::InvalidGeometry(format!("reveal at {:?} radius {}", center, radius))
                );
            }

            if complete {
                self.animations.swap_remove(i);
                finished += 1;
            } else {
                i += 1;
            }
        }

        finished
    }

    /// Draw the mask for `coord` at `screen_origin`. Returns false if the
    /// chunk has no mask.
    pub fn composite_into(
        &self,
        target: &mut dyn RenderTarget,
        coord: ChunkCoord,
        screen_origin: Vec2,
        scale: f32,
    ) -> bool {
        match self.masks.get(&coord) {
            Some(mask) => {
                target.draw_fog(mask, screen_origin, scale);
                true
            }
            None => false,
        }
    }

    pub fn mask(&self, coord: &ChunkCoord) -> Option<&FogMask> {
        self.masks.get(coord)
    }

    pub fn has_mask(&self, coord: &ChunkCoord) -> bool {
        self.masks.contains_key(coord)
    }

    pub fn mask_count(&self) -> usize {
        self.masks.len()
    }

    pub fn mask_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.masks.keys().copied()
    }

    pub fn animations(&self) -> &[RevealAnimation] {
        &self.animations
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Current fog opacity under a world point, if its chunk is resident
    pub fn opacity_at(&self, point: Vec2) -> Option<u8> {
        if !point.is_finite() {
            return None;
        }
        let coord = ChunkCoord::containing(point, self.chunk_size);
        let local = point - coord.world_origin(self.chunk_size);
        self.masks.get(&coord)?.opacity_at(local.x as u32, local.y as u32)
    }
}

/// Carve a world-space circle into every resident mask it overlaps, so a
/// reveal near a chunk border leaves no seam.
fn carve_world(masks: &mut AHashMap<ChunkCoord, FogMask>, chunk_size: u32, center: Vec2, radius: f32) {
    if radius <= 0.0 {
        return;
    }
    let min = ChunkCoord::containing(center - Vec2::splat(radius), chunk_size);
    let max = ChunkCoord::containing(center + Vec2::splat(radius), chunk_size);

    for cy in min.cy..=max.cy {
        for cx in min.cx..=max.cx {
            let coord = ChunkCoord::new(cx, cy);
            if let Some(mask) = masks.get_mut(&coord) {
                mask.carve(center - coord.world_origin(chunk_size), radius);
            }
        }
    }
}

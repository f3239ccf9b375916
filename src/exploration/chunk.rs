//! Chunk store - streamed terrain tiles
//!
//! Terrain is generated lazily in square chunks around the view center and
//! (optionally) evicted once it falls outside the unload radius. Every chunk
//! is a pure function of its coordinate and the world seed.

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{ChunkCoord, Vec2};

/// Reference area for `feature_density` (features per 256×256 world units)
const DENSITY_REFERENCE_AREA: f32 = 256.0 * 256.0;

/// Terrain types painted into the chunk raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Grass,
    Meadow,
    Forest,
    Rock,
    Water,
    Sand,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::Grass
    }
}

impl Terrain {
    /// Radius range (world units) of a feature disc of this kind
    fn feature_radius(&self) -> (f32, f32) {
        match self {
            Self::Grass => (0.0, 0.0),
            Self::Meadow => (8.0, 20.0),
            Self::Forest => (6.0, 18.0),
            Self::Rock => (3.0, 8.0),
            Self::Water => (10.0, 24.0),
            Self::Sand => (6.0, 14.0),
        }
    }
}

/// A generated terrain tile
#[derive(Debug, Clone)]
pub struct Chunk {
    pub coord: ChunkCoord,
    /// World position of the top-left pixel
    pub origin: Vec2,
    pub generated: bool,
    size: u32,
    pixels: Vec<Terrain>,
}

impl Chunk {
    /// Generate the chunk at `coord`
    pub fn generate(coord: ChunkCoord, size: u32, world_seed: u64, feature_density: f32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(chunk_seed(world_seed, coord));
        let mut pixels = vec![Terrain::Grass; (size * size) as usize];

        let area_scale = (size * size) as f32 / DENSITY_REFERENCE_AREA;
        let feature_count = (feature_density.max(0.0) * area_scale).round() as usize;

        for _ in 0..feature_count {
            let kind = match rng.gen_range(0..10) {
                0..=3 => Terrain::Forest,
                4 | 5 => Terrain::Meadow,
                6 | 7 => Terrain::Rock,
                8 => Terrain::Water,
                _ => Terrain::Sand,
            };
            let (min_r, max_r) = kind.feature_radius();
            let radius = rng.gen_range(min_r..max_r);
            let center = Vec2::new(rng.gen_range(0..size) as f32, rng.gen_range(0..size) as f32);
            stamp_disc(&mut pixels, size, center, radius, kind);
        }

        Self {
            coord,
            origin: coord.world_origin(size),
            generated: true,
            size,
            pixels,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row-major terrain raster, `size × size` entries
    pub fn pixels(&self) -> &[Terrain] {
        &self.pixels
    }

    /// Terrain at a chunk-local pixel
    pub fn terrain_at(&self, x: u32, y: u32) -> Option<Terrain> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.pixels.get((y * self.size + x) as usize).copied()
    }

    /// Terrain at a world point, if it falls inside this chunk
    pub fn terrain_at_world(&self, point: Vec2) -> Option<Terrain> {
        let local = point - self.origin;
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        self.terrain_at(local.x as u32, local.y as u32)
    }
}

fn stamp_disc(pixels: &mut [Terrain], size: u32, center: Vec2, radius: f32, kind: Terrain) {
    let max = (size - 1) as f32;
    let x0 = (center.x - radius).floor().clamp(0.0, max) as u32;
    let x1 = (center.x + radius).ceil().clamp(0.0, max) as u32;
    let y0 = (center.y - radius).floor().clamp(0.0, max) as u32;
    let y1 = (center.y + radius).ceil().clamp(0.0, max) as u32;
    let radius_sq = radius * radius;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
            if d.length_squared() <= radius_sq {
                pixels[(y * size + x) as usize] = kind;
            }
        }
    }
}

/// Per-chunk RNG seed mixed from the world seed and coordinate
fn chunk_seed(world_seed: u64, coord: ChunkCoord) -> u64 {
    let mut h = world_seed ^ 0x9E37_79B9_7F4A_7C15;
    h = h.wrapping_mul(6364136223846793005).wrapping_add(coord.cx as u32 as u64);
    h = h.wrapping_mul(6364136223846793005).wrapping_add(coord.cy as u32 as u64);
    h ^ (h >> 31)
}

/// Outcome of a single `ensure_loaded` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Chunks generated by this call, nearest to the center first
    pub generated: Vec<ChunkCoord>,
    /// Missing chunks left for a later call because of the generation cap
    pub deferred: usize,
}

/// Owns every resident chunk
#[derive(Debug)]
pub struct ChunkStore {
    chunk_size: u32,
    world_seed: u64,
    feature_density: f32,
    chunks: AHashMap<ChunkCoord, Chunk>,
}

impl ChunkStore {
    pub fn new(chunk_size: u32, world_seed: u64, feature_density: f32) -> Self {
        Self {
            chunk_size,
            world_seed,
            feature_density,
            chunks: AHashMap::new(),
        }
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    /// Chunk coordinate containing a world point
    pub fn chunk_of(&self, point: Vec2) -> ChunkCoord {
        ChunkCoord::containing(point, self.chunk_size)
    }

    /// Generate every missing chunk within `load_radius` of the chunk
    /// containing `center`.
    ///
    /// `on_generated` runs once per new chunk, immediately after it is
    /// inserted; the fog layer hangs its mask creation off this hook.
    pub fn ensure_loaded(
        &mut self,
        center: Vec2,
        load_radius: i32,
        max_per_call: Option<usize>,
        mut on_generated: impl FnMut(&Chunk),
    ) -> LoadReport {
        let center_chunk = self.chunk_of(center);
        let radius = load_radius.max(0);

        let mut missing = Vec::new();
        for cy in center_chunk.cy.saturating_sub(radius)..=center_chunk.cy.saturating_add(radius) {
            for cx in center_chunk.cx.saturating_sub(radius)..=center_chunk.cx.saturating_add(radius) {
                let coord = ChunkCoord::new(cx, cy);
                if !self.chunks.contains_key(&coord) {
                    missing.push(coord);
                }
            }
        }

        if missing.is_empty() {
            return LoadReport::default();
        }

        missing.sort_by_key(|c| (c.chebyshev(&center_chunk), c.cy, c.cx));
        let budget = max_per_call.unwrap_or(missing.len()).min(missing.len());
        let deferred = missing.len() - budget;

        let mut generated = Vec::with_capacity(budget);
        for coord in missing.into_iter().take(budget) {
            let chunk = Chunk::generate(coord, self.chunk_size, self.world_seed, self.feature_density);
            let chunk: &Chunk = self.chunks.entry(coord).or_insert(chunk);
            on_generated(chunk);
            generated.push(coord);
        }

        tracing::debug!(
            "Generated {} chunks around {} ({} deferred, {} resident)",
            generated.len(),
            center_chunk,
            deferred,
            self.chunks.len()
        );

        LoadReport { generated, deferred }
    }

    /// Remove chunks farther than `unload_radius` (Chebyshev) from
    /// `center_chunk`, calling `on_evicted` for each.
    pub fn evict_beyond(
        &mut self,
        center_chunk: ChunkCoord,
        unload_radius: i32,
        mut on_evicted: impl FnMut(ChunkCoord),
    ) -> Vec<ChunkCoord> {
        let mut evicted: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|c| c.chebyshev(&center_chunk) > unload_radius)
            .copied()
            .collect();
        evicted.sort();

        for coord in &evicted {
            self.chunks.remove(coord);
            on_evicted(*coord);
        }

        if !evicted.is_empty() {
            tracing::debug!("Evicted {} chunks beyond radius {} of {}", evicted.len(), unload_radius, center_chunk);
        }

        evicted
    }

    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains_key(coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Terrain under a world point, if its chunk is resident
    pub fn terrain_at(&self, point: Vec2) -> Option<Terrain> {
        self.get(&self.chunk_of(point))?.terrain_at_world(point)
    }
}

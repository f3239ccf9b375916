//! Permanently explored areas
//!
//! The fog raster is a rendering structure that can be evicted with its
//! chunk. What the player has actually seen is kept here, as a set of
//! coarse square tiles, and is what gets persisted.

use ahash::AHashSet;

use crate::core::types::{Vec2, WorldRect};
use crate::exploration::fog::HALF_REVEAL_STOP;

/// Tile grid coordinate
pub type TileKey = (i32, i32);

#[derive(Debug, Clone)]
pub struct ExploredAreaSet {
    tile_size: f32,
    tiles: AHashSet<TileKey>,
}

impl ExploredAreaSet {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size,
            tiles: AHashSet::new(),
        }
    }

    /// Rebuild from persisted `"tx,ty"` keys; malformed keys are skipped
    pub fn from_keys<S: AsRef<str>>(keys: &[S], tile_size: f32) -> Self {
        let mut set = Self::new(tile_size);
        for key in keys {
            match parse_key(key.as_ref()) {
                Some(tile) => {
                    set.tiles.insert(tile);
                }
                None => tracing::warn!("Skipping malformed explored-area key {:?}", key.as_ref()),
            }
        }
        set
    }

    /// Persistable keys, sorted for stable output
    pub fn to_keys(&self) -> Vec<String> {
        let mut tiles: Vec<TileKey> = self.tiles.iter().copied().collect();
        tiles.sort();
        tiles.into_iter().map(|(tx, ty)| format!("{},{}", tx, ty)).collect()
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn tile_of(&self, point: Vec2) -> TileKey {
        (
            (point.x / self.tile_size).floor() as i32,
            (point.y / self.tile_size).floor() as i32,
        )
    }

    pub fn tile_center(&self, tile: TileKey) -> Vec2 {
        Vec2::new(
            (tile.0 as f32 + 0.5) * self.tile_size,
            (tile.1 as f32 + 0.5) * self.tile_size,
        )
    }

    /// Mark tiles seen by a reveal of `radius` around `center`.
    ///
    /// A tile counts once its center lies inside the half-revealed ring;
    /// the tile under `center` always counts. Returns how many tiles were
    /// newly explored.
    pub fn record_reveal(&mut self, center: Vec2, radius: f32) -> usize {
        if !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return 0;
        }

        let center_tile = self.tile_of(center);
        let mut added = usize::from(self.tiles.insert(center_tile));

        let reach = radius * HALF_REVEAL_STOP;
        let reach_sq = reach * reach;
        let (min_tx, min_ty) = self.tile_of(center - Vec2::splat(reach));
        let (max_tx, max_ty) = self.tile_of(center + Vec2::splat(reach));

        for ty in min_ty..=max_ty {
            for tx in min_tx..=max_tx {
                if self.tile_center((tx, ty)).distance_squared(center) <= reach_sq && self.tiles.insert((tx, ty)) {
                    added += 1;
                }
            }
        }

        added
    }

    pub fn contains(&self, tile: TileKey) -> bool {
        self.tiles.contains(&tile)
    }

    pub fn is_explored(&self, point: Vec2) -> bool {
        point.is_finite() && self.contains(self.tile_of(point))
    }

    /// Explored tiles whose area overlaps `rect`
    pub fn tiles_in(&self, rect: &WorldRect) -> Vec<TileKey> {
        let (min_tx, min_ty) = self.tile_of(rect.min);
        let (max_tx, max_ty) = self.tile_of(rect.max - Vec2::splat(f32::EPSILON.max(self.tile_size * 1e-4)));

        let mut found = Vec::new();
        for ty in min_ty..=max_ty {
            for tx in min_tx..=max_tx {
                if self.tiles.contains(&(tx, ty)) {
                    found.push((tx, ty));
                }
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

fn parse_key(key: &str) -> Option<TileKey> {
    let (x, y) = key.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

//! Exploration controller
//!
//! Single owner of the chunk store, fog layer, scout set and explored-area
//! set. The game loop drives it with `tick` once per frame and `render`
//! whenever it draws; touch input arrives through `handle_input`.

use crate::core::config::ExplorationConfig;
use crate::core::error::{ExploreError, Result};
use crate::core::types::{ChunkCoord, Millis, ScoutId, Vec2};
use crate::exploration::chunk::{Chunk, ChunkStore};
use crate::exploration::effects::{EffectsNotifier, NoEffects};
use crate::exploration::explored::ExploredAreaSet;
use crate::exploration::fog::{FogLayer, MAX_REVEAL_RADIUS};
use crate::exploration::input::{AreaInfo, InputEvent};
use crate::exploration::scouts::{ScoutAgent, ScoutEvent, ScoutSet};
use crate::render::{DrawList, RenderTarget, Viewport};

/// Events surfaced to the UI after a tick
#[derive(Debug, Clone, PartialEq)]
pub enum ExplorationEvent {
    ScoutArrived { scout: ScoutId, position: Vec2 },
    ChunkGenerated(ChunkCoord),
    ChunkEvicted(ChunkCoord),
}

/// Result of a handled input event
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    Dispatched(ScoutId),
    Inspected(AreaInfo),
}

pub struct ExplorationController {
    config: ExplorationConfig,
    chunks: ChunkStore,
    fog: FogLayer,
    scouts: ScoutSet,
    explored: ExploredAreaSet,
    /// Milliseconds of game time accumulated from tick deltas
    clock: Millis,
    notifier: Box<dyn EffectsNotifier>,
}

impl ExplorationController {
    /// Fresh game: random seed unless the config pins one, default scouts
    /// at the spawn point.
    pub fn new(config: ExplorationConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.world_seed.unwrap_or_else(rand::random);

        let mut scouts = ScoutSet::new(config.arrival_threshold, config.arrival_reveal_multiplier);
        for _ in 0..config.starting_scouts {
            scouts.spawn(
                config.spawn_point(),
                config.scout_speed,
                config.scout_vision,
                config.scout_health,
            )?;
        }

        let explored = ExploredAreaSet::new(config.explored_tile_size);
        Ok(Self::assemble(config, seed, scouts, explored))
    }

    /// Rebuild a controller from persisted state. Out-of-range scouts fail
    /// with `InvalidSave`.
    pub fn from_saved(
        config: ExplorationConfig,
        seed: u64,
        scouts: Vec<ScoutAgent>,
        explored_keys: &[String],
    ) -> Result<Self> {
        config.validate()?;
        let scouts = ScoutSet::from_agents(scouts, config.arrival_threshold, config.arrival_reveal_multiplier)?;
        let explored = ExploredAreaSet::from_keys(explored_keys, config.explored_tile_size);
        Ok(Self::assemble(config, seed, scouts, explored))
    }

    fn assemble(config: ExplorationConfig, seed: u64, scouts: ScoutSet, explored: ExploredAreaSet) -> Self {
        tracing::debug!(
            "Exploration core ready: seed {}, {} scouts, {} explored tiles",
            seed,
            scouts.len(),
            explored.len()
        );
        Self {
            chunks: ChunkStore::new(config.chunk_size, seed, config.feature_density),
            fog: FogLayer::new(config.chunk_size, config.reveal_duration_ms),
            scouts,
            explored,
            clock: 0.0,
            notifier: Box::new(NoEffects),
            config,
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn EffectsNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Load chunks (and their fog masks) around `center`, then evict
    /// distant ones if eviction is enabled.
    pub fn ensure_loaded(&mut self, center: Vec2) -> Vec<ExplorationEvent> {
        if !center.is_finite() {
            tracing::debug!("Skipping chunk streaming for non-finite center {:?}", center);
            return Vec::new();
        }

        let fog = &mut self.fog;
        let explored = &self.explored;
        let report = self.chunks.ensure_loaded(
            center,
            self.config.load_radius,
            self.config.max_chunks_per_tick,
            |chunk: &Chunk| {
                fog.create_mask_for(chunk.coord);
                fog.restore_explored(chunk.coord, explored);
            },
        );

        let mut events: Vec<ExplorationEvent> =
            report.generated.into_iter().map(ExplorationEvent::ChunkGenerated).collect();

        if self.config.evict_distant_chunks {
            let center_chunk = self.chunks.chunk_of(center);
            let fog = &mut self.fog;
            let evicted = self.chunks.evict_beyond(center_chunk, self.config.unload_radius, |coord| {
                fog.remove_mask(coord);
            });
            events.extend(evicted.into_iter().map(ExplorationEvent::ChunkEvicted));
        }

        events
    }

    /// Advance one frame: stream chunks for the viewport, move scouts,
    /// then animate fog. `delta_time` is in seconds.
    pub fn tick(&mut self, delta_time: f32, viewport: &Viewport) -> Vec<ExplorationEvent> {
        let dt = if delta_time.is_finite() && delta_time >= 0.0 {
            delta_time
        } else {
            tracing::debug!("Ignoring invalid frame delta {}", delta_time);
            0.0
        };
        self.clock += dt as f64 * 1000.0;

        let mut events = self.ensure_loaded(viewport.center());

        for event in self.scouts.tick(dt) {
            let (position, radius) = event.reveal();
            self.reveal(position, radius);

            if let ScoutEvent::Arrived { scout, position, .. } = event {
                tracing::debug!("Scout {:?} arrived at {:?}", scout, position);
                self.notifier.scout_arrived(position);
                events.push(ExplorationEvent::ScoutArrived { scout, position });
            }
        }

        self.fog.tick(self.clock);
        events
    }

    /// Queue a fog reveal. Reveals on chunks that are not resident, or with
    /// non-finite geometry, are dropped; radii are capped at
    /// `MAX_REVEAL_RADIUS`. Returns whether the reveal was accepted.
    pub fn reveal(&mut self, point: Vec2, radius: f32) -> bool {
        if !point.is_finite() || !radius.is_finite() || radius <= 0.0 {
            tracing::debug!(
                "Dropped reveal: {}",
                ExploreError::InvalidGeometry(format!("reveal at {:?} radius {}", point, radius))
            );
            return false;
        }
        let radius = radius.min(MAX_REVEAL_RADIUS);

        match self.fog.reveal(point, radius) {
            Ok(()) => {
                self.explored.record_reveal(point, radius);
                self.notifier.area_revealed(point, radius);
                true
            }
            Err(e) => {
                tracing::debug!("Dropped reveal: {}", e);
                false
            }
        }
    }

    /// Send scout `index` toward `target`
    pub fn dispatch(&mut self, index: usize, target: Vec2) -> Result<ScoutId> {
        let result = self.scouts.dispatch(index, target);
        if let Err(ExploreError::NoScoutsAvailable) = &result {
            tracing::warn!("Dispatch to {:?} ignored: no scouts available", target);
        }
        result
    }

    /// Tap dispatches the first scout
    pub fn tap(&mut self, point: Vec2) -> Result<ScoutId> {
        self.dispatch(0, point)
    }

    /// Long press inspects a point without changing anything
    pub fn long_press(&self, point: Vec2) -> AreaInfo {
        let chunk = self.chunks.chunk_of(point);
        let explored = self.explored.is_explored(point);
        AreaInfo {
            point,
            chunk,
            chunk_loaded: self.chunks.contains(&chunk),
            explored,
            terrain: if explored { self.chunks.terrain_at(point) } else { None },
            fog_opacity: self.fog.opacity_at(point),
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Result<InputOutcome> {
        match event {
            InputEvent::Tap(point) => self.tap(point).map(InputOutcome::Dispatched),
            InputEvent::LongPress(point) => Ok(InputOutcome::Inspected(self.long_press(point))),
        }
    }

    /// Draw visible chunks (terrain, then fog) in row-major order, then
    /// every scout on top. Returns the number of chunks drawn.
    pub fn render(&self, viewport: &Viewport, target: &mut dyn RenderTarget) -> usize {
        let bounds = viewport.world_bounds();
        let scale = viewport.pixel_scale();
        let chunk_size = self.chunks.chunk_size();

        let mut visible: Vec<&Chunk> = self
            .chunks
            .iter()
            .filter(|c| c.coord.world_rect(chunk_size).intersects(&bounds))
            .collect();
        visible.sort_by_key(|c| (c.coord.cy, c.coord.cx));

        for chunk in &visible {
            let origin = viewport.world_to_screen(chunk.origin);
            target.draw_terrain(chunk, origin, scale);
            self.fog.composite_into(target, chunk.coord, origin, scale);
        }

        // Scouts stay visible regardless of fog
        for scout in self.scouts.scouts() {
            target.draw_scout(scout, viewport.world_to_screen(scout.position), scale);
        }

        visible.len()
    }

    /// Render into a fresh command list
    pub fn draw_commands(&self, viewport: &Viewport) -> DrawList {
        let mut list = DrawList::new();
        self.render(viewport, &mut list);
        list
    }

    pub fn config(&self) -> &ExplorationConfig {
        &self.config
    }

    pub fn world_seed(&self) -> u64 {
        self.chunks.world_seed()
    }

    pub fn chunks(&self) -> &ChunkStore {
        &self.chunks
    }

    pub fn fog(&self) -> &FogLayer {
        &self.fog
    }

    pub fn scouts(&self) -> &ScoutSet {
        &self.scouts
    }

    pub fn explored(&self) -> &ExploredAreaSet {
        &self.explored
    }

    pub fn explored_count(&self) -> usize {
        self.explored.len()
    }

    pub fn clock(&self) -> Millis {
        self.clock
    }

    /// Every chunk has exactly one mask and every mask a chunk
    pub fn masks_match_chunks(&self) -> bool {
        self.chunks.len() == self.fog.mask_count() && self.chunks.coords().all(|c| self.fog.has_mask(&c))
    }
}

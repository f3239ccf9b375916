//! Headless exploration run
//!
//! Streams terrain around a fixed view, sends the first scout to a target,
//! and reports what was explored. Optionally saves the game and writes a
//! PNG of the final view.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use hamlet::core::config::load_config;
use hamlet::core::error::{ExploreError, Result};
use hamlet::core::types::Vec2;
use hamlet::core::ExplorationConfig;
use hamlet::exploration::{ExplorationEvent, InputEvent};
use hamlet::persistence::{load_game, save_game, FileStore, LoadOutcome, MemoryStore};
use hamlet::render::{RasterTarget, Viewport};

#[derive(Parser, Debug)]
#[command(name = "hamlet")]
#[command(about = "Run a headless exploration simulation")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// World seed for a new game
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Frame time in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Where to send the first scout, as `x,y`
    #[arg(long, value_parser = parse_point)]
    target: Option<Vec2>,

    /// Directory for save files; the game is loaded from and saved to it
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Write the final view to this PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Canvas size in pixels
    #[arg(long, default_value_t = 512)]
    canvas: u32,
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u32,
    outcome: String,
    chunks_resident: usize,
    chunks_generated: usize,
    chunks_evicted: usize,
    arrivals: usize,
    explored_tiles: usize,
    scouts: Vec<[f32; 2]>,
}

fn parse_point(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected x,y but got {:?}", s))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x {:?}: {}", x, e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y {:?}: {}", y, e))?;
    Ok(Vec2::new(x, y))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hamlet=info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ExplorationConfig::default(),
    };
    if args.seed.is_some() {
        config.world_seed = args.seed;
    }

    let (mut controller, outcome) = match &args.save_dir {
        Some(dir) => load_game(&FileStore::new(dir), config)?,
        None => load_game(&MemoryStore::new(), config)?,
    };
    tracing::info!("Starting exploration ({:?}), seed {}", outcome, controller.world_seed());

    let canvas = args.canvas as f32;
    let mut viewport = Viewport::new(canvas, canvas);
    let start = controller
        .scouts()
        .get(0)
        .map_or_else(|| controller.config().spawn_point(), |s| s.position);
    viewport.center_on(start);

    // First tick streams the view in so the target chunk can accept reveals
    let mut events = controller.tick(0.0, &viewport);

    if let Some(target) = args.target {
        match controller.handle_input(InputEvent::Tap(target)) {
            Ok(outcome) => tracing::info!("Tap at {:?}: {:?}", target, outcome),
            Err(ExploreError::NoScoutsAvailable) => {}
            Err(e) => return Err(e),
        }
    }

    for _ in 0..args.ticks {
        // Follow the first scout
        if let Some(scout) = controller.scouts().get(0) {
            viewport.center_on(scout.position);
        }
        events.extend(controller.tick(args.dt, &viewport));
    }

    let count = |f: fn(&ExplorationEvent) -> bool| events.iter().filter(|e| f(e)).count();
    let summary = RunSummary {
        seed: controller.world_seed(),
        ticks: args.ticks,
        outcome: match &outcome {
            LoadOutcome::Restored => "restored".to_string(),
            LoadOutcome::Fresh => "fresh".to_string(),
            LoadOutcome::Reset(reason) => format!("reset: {}", reason),
        },
        chunks_resident: controller.chunks().len(),
        chunks_generated: count(|e| matches!(e, ExplorationEvent::ChunkGenerated(_))),
        chunks_evicted: count(|e| matches!(e, ExplorationEvent::ChunkEvicted(_))),
        arrivals: count(|e| matches!(e, ExplorationEvent::ScoutArrived { .. })),
        explored_tiles: controller.explored_count(),
        scouts: controller.scouts().scouts().iter().map(|s| s.position.to_array()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(dir) = &args.save_dir {
        save_game(&mut FileStore::new(dir), &controller)?;
        tracing::info!("Saved exploration to {:?}", dir);
    }

    if let Some(path) = &args.png {
        let mut target = RasterTarget::new(args.canvas, args.canvas);
        let drawn = controller.render(&viewport, &mut target);
        target.save_png(path)?;
        tracing::info!("Wrote {} chunks to {:?}", drawn, path);
    }

    Ok(())
}

//! Hamlet - exploration core for a casual settlement-building game
//!
//! Chunked terrain streaming around the camera, per-chunk fog of war with
//! animated reveals, and scouts that clear fog as they walk.

pub mod core;
pub mod exploration;
pub mod persistence;
pub mod render;

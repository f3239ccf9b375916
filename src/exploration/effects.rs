//! Hooks for the cosmetic effects layer
//!
//! The core calls these after its own state is updated. Implementations get
//! plain copies of coordinates and cannot reach back into exploration state.

use crate::core::types::Vec2;

pub trait EffectsNotifier {
    /// A scout reached its target
    fn scout_arrived(&mut self, _position: Vec2) {}

    /// A reveal was accepted and queued
    fn area_revealed(&mut self, _position: Vec2, _radius: f32) {}
}

/// Notifier that ignores every call
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEffects;

impl EffectsNotifier for NoEffects {}

/// Notifier that records calls, for headless runs and tests
#[derive(Debug, Default, Clone)]
pub struct EffectLog {
    pub arrivals: Vec<Vec2>,
    pub reveals: Vec<(Vec2, f32)>,
}

impl EffectsNotifier for EffectLog {
    fn scout_arrived(&mut self, position: Vec2) {
        self.arrivals.push(position);
    }

    fn area_revealed(&mut self, position: Vec2, radius: f32) {
        self.reveals.push((position, radius));
    }
}

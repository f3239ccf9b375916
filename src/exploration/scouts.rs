//! Scout agents
//!
//! Scouts walk in a straight line toward a single target and clear fog
//! around themselves as they go. Reaching the target grants a larger
//! arrival reveal. The set only produces events; the controller turns them
//! into fog reveals.

use serde::{Deserialize, Serialize};

use crate::core::config::MAX_VISION_RANGE;
use crate::core::error::{ExploreError, Result};
use crate::core::types::{ScoutId, Vec2};

/// A mobile explorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutAgent {
    pub id: ScoutId,
    pub position: Vec2,
    /// World units per second
    pub speed: f32,
    pub target: Option<Vec2>,
    pub exploring: bool,
    pub health: f32,
    /// Reveal radius while moving
    pub vision_range: f32,
}

impl ScoutAgent {
    pub fn new(id: ScoutId, position: Vec2, speed: f32, vision_range: f32, health: f32) -> Self {
        Self {
            id,
            position,
            speed,
            target: None,
            exploring: false,
            health,
            vision_range,
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.exploring || self.target.is_none()
    }

    pub fn distance_to_target(&self) -> Option<f32> {
        self.target.map(|t| self.position.distance(t))
    }

    /// Check a scout that came from outside the game, e.g. a save
    pub fn validate(&self) -> Result<()> {
        let invalid = |what: &str| Err(ExploreError::InvalidSave(format!("scout {:?}: {}", self.id, what)));

        if !self.position.is_finite() {
            return invalid("non-finite position");
        }
        if self.target.map_or(false, |t| !t.is_finite()) {
            return invalid("non-finite target");
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return invalid("speed must be finite and non-negative");
        }
        if !(self.vision_range > 0.0 && self.vision_range <= MAX_VISION_RANGE) {
            return invalid("vision range out of bounds");
        }
        if !self.health.is_finite() {
            return invalid("non-finite health");
        }
        Ok(())
    }
}

/// Scout events produced by a tick
#[derive(Debug, Clone, PartialEq)]
pub enum ScoutEvent {
    /// Scout stepped toward its target; reveal around the new position
    Moved { scout: ScoutId, position: Vec2, reveal_radius: f32 },
    /// Scout reached its target; one-off enlarged reveal
    Arrived { scout: ScoutId, position: Vec2, reveal_radius: f32 },
}

impl ScoutEvent {
    pub fn reveal(&self) -> (Vec2, f32) {
        match *self {
            Self::Moved { position, reveal_radius, .. } | Self::Arrived { position, reveal_radius, .. } => {
                (position, reveal_radius)
            }
        }
    }
}

/// All scouts in the game
#[derive(Debug, Clone)]
pub struct ScoutSet {
    scouts: Vec<ScoutAgent>,
    next_scout_id: u32,
    arrival_threshold: f32,
    arrival_reveal_multiplier: f32,
}

impl ScoutSet {
    pub fn new(arrival_threshold: f32, arrival_reveal_multiplier: f32) -> Self {
        Self {
            scouts: Vec::new(),
            next_scout_id: 1,
            arrival_threshold,
            arrival_reveal_multiplier,
        }
    }

    /// Rebuild from persisted agents, continuing the id sequence.
    ///
    /// Fails with `InvalidSave` on an out-of-range agent, a duplicate id or
    /// an id that leaves no room for the sequence to continue.
    pub fn from_agents(
        agents: Vec<ScoutAgent>,
        arrival_threshold: f32,
        arrival_reveal_multiplier: f32,
    ) -> Result<Self> {
        let mut seen = ahash::AHashSet::with_capacity(agents.len());
        for agent in &agents {
            agent.validate()?;
            if !seen.insert(agent.id) {
                return Err(ExploreError::InvalidSave(format!("duplicate scout id {:?}", agent.id)));
            }
        }

        let next_scout_id = match agents.iter().map(|s| s.id.0).max() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| ExploreError::InvalidSave(format!("scout id {} leaves no successor", max)))?,
        };

        Ok(Self {
            scouts: agents,
            next_scout_id,
            arrival_threshold,
            arrival_reveal_multiplier,
        })
    }

    pub fn spawn(&mut self, position: Vec2, speed: f32, vision_range: f32, health: f32) -> Result<ScoutId> {
        let id = ScoutId(self.next_scout_id);
        self.next_scout_id = self.next_scout_id.checked_add(1).ok_or(ExploreError::ScoutIdsExhausted)?;
        self.scouts.push(ScoutAgent::new(id, position, speed, vision_range, health));
        Ok(id)
    }

    /// Send scout `index` toward `target`, replacing any previous target
    pub fn dispatch(&mut self, index: usize, target: Vec2) -> Result<ScoutId> {
        if self.scouts.is_empty() {
            return Err(ExploreError::NoScoutsAvailable);
        }
        if !target.is_finite() {
            return Err(ExploreError::InvalidGeometry(format!("dispatch target {:?}", target)));
        }
        let scout = self.scouts.get_mut(index).ok_or(ExploreError::ScoutNotFound(index))?;

        scout.target = Some(target);
        scout.exploring = true;
        Ok(scout.id)
    }

    /// Advance every exploring scout by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> Vec<ScoutEvent> {
        let mut events = Vec::new();

        for scout in &mut self.scouts {
            if !scout.exploring {
                continue;
            }
            let Some(target) = scout.target else {
                scout.exploring = false;
                continue;
            };

            let to_target = target - scout.position;
            let distance = to_target.length();

            if distance > self.arrival_threshold {
                // Never overshoot: the step is capped at the remaining distance
                let step = (scout.speed * dt).min(distance);
                if step > 0.0 {
                    scout.position += to_target / distance * step;
                    events.push(ScoutEvent::Moved {
                        scout: scout.id,
                        position: scout.position,
                        reveal_radius: scout.vision_range,
                    });
                }
            }

            if scout.position.distance(target) <= self.arrival_threshold {
                scout.target = None;
                scout.exploring = false;
                events.push(ScoutEvent::Arrived {
                    scout: scout.id,
                    position: scout.position,
                    reveal_radius: scout.vision_range * self.arrival_reveal_multiplier,
                });
            }
        }

        events
    }

    pub fn get(&self, index: usize) -> Option<&ScoutAgent> {
        self.scouts.get(index)
    }

    pub fn get_by_id(&self, id: ScoutId) -> Option<&ScoutAgent> {
        self.scouts.iter().find(|s| s.id == id)
    }

    pub fn scouts(&self) -> &[ScoutAgent] {
        &self.scouts
    }

    pub fn len(&self) -> usize {
        self.scouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with_scout(speed: f32) -> ScoutSet {
        let mut set = ScoutSet::new(5.0, 1.5);
        set.spawn(Vec2::ZERO, speed, 40.0, 100.0).unwrap();
        set
    }

    #[test]
    fn test_dispatch_empty_set() {
        let mut set = ScoutSet::new(5.0, 1.5);
        assert!(matches!(set.dispatch(0, Vec2::new(10.0, 0.0)), Err(ExploreError::NoScoutsAvailable)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_dispatch_out_of_range() {
        let mut set = set_with_scout(20.0);
        assert!(matches!(set.dispatch(3, Vec2::ONE), Err(ExploreError::ScoutNotFound(3))));
        assert!(set.get(0).unwrap().is_idle());
    }

    #[test]
    fn test_dispatch_rejects_non_finite_target() {
        let mut set = set_with_scout(20.0);
        assert!(set.dispatch(0, Vec2::new(f32::NAN, 1.0)).is_err());
        assert_eq!(set.get(0).unwrap().target, None);
    }

    #[test]
    fn test_idle_scout_not_advanced() {
        let mut set = set_with_scout(20.0);
        assert!(set.tick(1.0).is_empty());
        assert_eq!(set.get(0).unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn test_scout_walks_and_arrives_once() {
        let mut set = set_with_scout(20.0);
        set.dispatch(0, Vec2::new(100.0, 0.0)).unwrap();

        let mut last = set.get(0).unwrap().distance_to_target().unwrap();
        let mut arrivals = Vec::new();
        for _ in 0..20 {
            let events = set.tick(0.5);
            for event in &events {
                if let ScoutEvent::Arrived { reveal_radius, .. } = event {
                    arrivals.push(*reveal_radius);
                }
            }
            match set.get(0).unwrap().distance_to_target() {
                Some(d) => {
                    assert!(d < last);
                    last = d;
                }
                None => break,
            }
        }

        assert_eq!(arrivals, vec![60.0]);
        let scout = set.get(0).unwrap();
        assert!(!scout.exploring);
        assert!(scout.target.is_none());
        assert!(scout.position.distance(Vec2::new(100.0, 0.0)) <= 5.0);

        // Nothing further happens once idle
        assert!(set.tick(0.5).is_empty());
    }

    #[test]
    fn test_step_never_overshoots() {
        let mut set = set_with_scout(1000.0);
        set.dispatch(0, Vec2::new(30.0, 40.0)).unwrap();
        let events = set.tick(1.0);

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ScoutEvent::Moved { .. }));
        assert!(matches!(events[1], ScoutEvent::Arrived { .. }));
        assert!(set.get(0).unwrap().position.distance(Vec2::new(30.0, 40.0)) < 1e-3);
    }

    #[test]
    fn test_target_within_threshold_arrives_immediately() {
        let mut set = set_with_scout(20.0);
        set.dispatch(0, Vec2::new(3.0, 0.0)).unwrap();
        let events = set.tick(0.1);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ScoutEvent::Arrived { .. }));
        assert_eq!(set.get(0).unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn test_retarget_overwrites() {
        let mut set = set_with_scout(10.0);
        set.dispatch(0, Vec2::new(100.0, 0.0)).unwrap();
        set.tick(1.0);
        set.dispatch(0, Vec2::new(10.0, 100.0)).unwrap();
        assert_eq!(set.get(0).unwrap().target, Some(Vec2::new(10.0, 100.0)));
        set.tick(1.0);
        let pos = set.get(0).unwrap().position;
        assert!((pos.x - 10.0).abs() < 1e-4);
        assert!((pos.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_from_agents_continues_ids() {
        let agents = vec![
            ScoutAgent::new(ScoutId(4), Vec2::ZERO, 1.0, 1.0, 1.0),
            ScoutAgent::new(ScoutId(9), Vec2::ONE, 1.0, 1.0, 1.0),
        ];
        let mut set = ScoutSet::from_agents(agents, 5.0, 1.5).unwrap();
        assert_eq!(set.spawn(Vec2::ZERO, 1.0, 1.0, 1.0).unwrap(), ScoutId(10));
        assert_eq!(set.len(), 3);
        assert!(set.get_by_id(ScoutId(9)).is_some());
    }

    #[test]
    fn test_from_agents_rejects_last_id() {
        let agents = vec![ScoutAgent::new(ScoutId(u32::MAX), Vec2::ZERO, 1.0, 1.0, 1.0)];
        let result = ScoutSet::from_agents(agents, 5.0, 1.5);
        assert!(matches!(result, Err(ExploreError::InvalidSave(_))));
    }

    #[test]
    fn test_spawn_reports_exhausted_ids() {
        let agents = vec![ScoutAgent::new(ScoutId(u32::MAX - 1), Vec2::ZERO, 1.0, 1.0, 1.0)];
        let mut set = ScoutSet::from_agents(agents, 5.0, 1.5).unwrap();
        assert!(matches!(set.spawn(Vec2::ZERO, 1.0, 1.0, 1.0), Err(ExploreError::ScoutIdsExhausted)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_from_agents_rejects_bad_agents() {
        let base = ScoutAgent::new(ScoutId(1), Vec2::ZERO, 10.0, 40.0, 100.0);
        let bad = [
            ScoutAgent { vision_range: MAX_VISION_RANGE * 10.0, ..base.clone() },
            ScoutAgent { vision_range: 0.0, ..base.clone() },
            ScoutAgent { speed: f32::INFINITY, ..base.clone() },
            ScoutAgent { speed: -1.0, ..base.clone() },
            ScoutAgent { position: Vec2::new(f32::NAN, 0.0), ..base.clone() },
            ScoutAgent { target: Some(Vec2::new(0.0, f32::INFINITY)), ..base.clone() },
        ];
        for agent in bad {
            assert!(ScoutSet::from_agents(vec![agent], 5.0, 1.5).is_err());
        }

        let duplicate = vec![base.clone(), base.clone()];
        assert!(ScoutSet::from_agents(duplicate, 5.0, 1.5).is_err());
        assert!(ScoutSet::from_agents(vec![base], 5.0, 1.5).is_ok());
    }
}

//! Pick-ups placed inside structures

use glam::Vec3;
use horde_core::NodeId;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Slows every agent down
    ZombieSlowdown,
    /// Speeds the player up
    PlayerSpeedup,
    /// Restores some player life
    HealthBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [Self::ZombieSlowdown, Self::PlayerSpeedup, Self::HealthBoost];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Marker colour
    pub fn color(&self) -> [f32; 3] {
        match self {
            Self::ZombieSlowdown => [0.2, 0.4, 1.0],
            Self::PlayerSpeedup => [1.0, 0.9, 0.1],
            Self::HealthBoost => [0.1, 1.0, 0.3],
        }
    }
}

/// Strength of each pick-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Player distance at which a pick-up is collected
    pub pickup_radius: f32,
    /// Multiplier on agent speed
    pub slowdown_factor: f32,
    /// Multiplier on player move speed
    pub speedup_factor: f32,
    /// Life restored
    pub health_boost: f32,
    /// Height of the marker as a fraction of the structure height
    pub height_fraction: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            pickup_radius: 10.0,
            slowdown_factor: 0.5,
            speedup_factor: 1.5,
            health_boost: 2.5,
            height_fraction: 0.1,
        }
    }
}

/// A pick-up lying in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub position: Vec3,
    pub node: NodeId,
    pub active: bool,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, position: Vec3, node: NodeId) -> Self {
        Self {
            kind,
            position,
            node,
            active: true,
        }
    }

    /// Collect if the player is within `radius`. Returns true exactly once
    pub fn try_collect(&mut self, player: Vec3, radius: f32) -> bool {
        if !self.active || self.position.distance(player) >= radius {
            return false;
        }
        self.active = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_collected_once() {
        let mut power_up = PowerUp::new(PowerUpKind::HealthBoost, Vec3::new(0.0, 4.0, 0.0), NodeId(1));
        assert!(!power_up.try_collect(Vec3::new(20.0, 3.0, 0.0), 10.0));
        assert!(power_up.try_collect(Vec3::new(5.0, 3.0, 0.0), 10.0));
        assert!(!power_up.try_collect(Vec3::new(5.0, 3.0, 0.0), 10.0));
    }

    #[test]
    fn test_random_covers_every_kind() {
        let mut rng = SmallRng::seed_from_u64(1);
        let kinds: std::collections::HashSet<PowerUpKind> =
            (0..100).map(|_| PowerUpKind::random(&mut rng)).collect();
        assert_eq!(kinds.len(), 3);
    }
}

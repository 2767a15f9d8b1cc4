//! Agent health and the player's life pool

use crate::damage::DamageInfo;
use serde::{Deserialize, Serialize};

/// Integer hit points of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Create a new health pool at full
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Apply damage to this health pool.
    ///
    /// Returns the damage actually dealt and whether this hit took the pool
    /// from positive to zero. Hits on an empty pool deal nothing.
    pub fn apply_damage(&mut self, damage: &DamageInfo) -> (u32, bool) {
        if self.current == 0 {
            return (0, false);
        }
        let dealt = damage.final_amount().min(self.current);
        self.current -= dealt;
        (dealt, self.current == 0)
    }

    /// Heal, capped at max. Returns the amount healed
    pub fn heal(&mut self, amount: u32) -> u32 {
        let old = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current - old
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Get health as a fraction (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Health-bar colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeBand {
    /// Above half
    Healthy,
    /// Above a fifth, up to half
    Wounded,
    /// A fifth or less
    Critical,
}

impl LifeBand {
    pub fn from_fraction(fraction: f32) -> Self {
        if fraction > 0.5 {
            Self::Healthy
        } else if fraction > 0.2 {
            Self::Wounded
        } else {
            Self::Critical
        }
    }

    /// Fill colour as RGB
    pub fn color(&self) -> [f32; 3] {
        match self {
            Self::Healthy => [0.0, 1.0, 0.0],
            Self::Wounded => [1.0, 1.0, 0.0],
            Self::Critical => [1.0, 0.0, 0.0],
        }
    }
}

/// The player's continuously drained life
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifePool {
    current: f32,
    max: f32,
}

impl LifePool {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Drain life. Returns the amount removed and whether this drain emptied the pool
    pub fn drain(&mut self, amount: f32) -> (f32, bool) {
        if self.is_empty() || !(amount > 0.0) {
            return (0.0, false);
        }
        let old = self.current;
        self.current = (self.current - amount).max(0.0);
        (old - self.current, self.is_empty())
    }

    /// Heal, capped at max. Returns the amount healed
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !(amount > 0.0) {
            return 0.0;
        }
        let old = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - old
    }

    /// Refill to max
    pub fn reset(&mut self) {
        self.current = self.max;
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    pub fn band(&self) -> LifeBand {
        LifeBand::from_fraction(self.fraction())
    }
}

impl Default for LifePool {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_health_never_negative() {
        let mut health = Health::new(3);
        let (dealt, died) = health.apply_damage(&DamageInfo::new(2).with_critical(2));
        assert_eq!(dealt, 3);
        assert!(died);
        assert_eq!(health.current(), 0);

        let (dealt, died) = health.apply_damage(&DamageInfo::new(5));
        assert_eq!(dealt, 0);
        assert!(!died);
        assert_eq!(health.current(), 0);
    }

    #[test]
    fn test_death_reported_once() {
        let mut health = Health::new(10);
        let mut deaths = 0;
        for _ in 0..15 {
            if health.apply_damage(&DamageInfo::new(1)).1 {
                deaths += 1;
            }
        }
        assert_eq!(deaths, 1);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_healing_caps() {
        let mut health = Health::new(10);
        health.apply_damage(&DamageInfo::new(4));
        assert_eq!(health.heal(10), 4);
        assert_eq!(health.current(), 10);
    }

    #[test]
    fn test_life_pool_drain() {
        let mut life = LifePool::new(10.0);
        let (dealt, died) = life.drain(0.25);
        assert_relative_eq!(dealt, 0.25);
        assert!(!died);
        assert_relative_eq!(life.current(), 9.75);

        let (dealt, died) = life.drain(100.0);
        assert_relative_eq!(dealt, 9.75);
        assert!(died);
        assert_eq!(life.drain(1.0), (0.0, false));
    }

    #[test]
    fn test_life_bands() {
        let mut life = LifePool::new(10.0);
        assert_eq!(life.band(), LifeBand::Healthy);
        life.drain(5.0);
        assert_eq!(life.band(), LifeBand::Wounded);
        life.drain(3.0);
        assert_eq!(life.band(), LifeBand::Critical);
        life.heal(2.5);
        assert_relative_eq!(life.current(), 4.5);
        assert_eq!(life.band(), LifeBand::Wounded);
    }
}

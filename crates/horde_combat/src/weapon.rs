//! Weapon system

use serde::{Deserialize, Serialize};

/// Weapon statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    /// Magazine size on level 1
    pub base_magazine: u32,
    /// Magazine shrink per level above 1
    pub magazine_step: u32,
    /// Smallest magazine on any level
    pub min_magazine: u32,
    /// Reload time in seconds
    pub reload_time: f32,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            base_magazine: 30,
            magazine_step: 10,
            min_magazine: 10,
            reload_time: 2.0,
        }
    }
}

impl WeaponStats {
    /// Magazine size on a given level
    pub fn magazine_for_level(&self, level: u32) -> u32 {
        let shrink = level.saturating_sub(1).saturating_mul(self.magazine_step);
        self.base_magazine
            .saturating_sub(shrink)
            .max(self.min_magazine)
    }
}

/// Outcome of pulling the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireDecision {
    /// A round was used; spawn a projectile
    Fired,
    /// Magazine empty; play the dry click
    Empty,
    /// Reload in progress; nothing happens
    Reloading,
}

/// Magazine-fed weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub stats: WeaponStats,
    magazine_size: u32,
    ammo: u32,
    /// Seconds left on the current reload
    reload_remaining: Option<f32>,
}

impl Weapon {
    /// Create a weapon loaded for a level
    pub fn new(stats: WeaponStats, level: u32) -> Self {
        let magazine_size = stats.magazine_for_level(level);
        Self {
            stats,
            magazine_size,
            ammo: magazine_size,
            reload_remaining: None,
        }
    }

    /// Resize the magazine for a new level and refill it
    pub fn set_level(&mut self, level: u32) {
        self.magazine_size = self.stats.magazine_for_level(level);
        self.ammo = self.magazine_size;
        self.reload_remaining = None;
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn magazine_size(&self) -> u32 {
        self.magazine_size
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_remaining.is_some()
    }

    /// Attempt to fire the weapon
    pub fn try_fire(&mut self) -> FireDecision {
        if self.ammo == 0 {
            return FireDecision::Empty;
        }
        if self.is_reloading() {
            return FireDecision::Reloading;
        }
        self.ammo -= 1;
        FireDecision::Fired
    }

    /// Start reloading. Returns false when full or already reloading
    pub fn reload(&mut self) -> bool {
        if self.is_reloading() || self.ammo >= self.magazine_size {
            return false;
        }
        self.reload_remaining = Some(self.stats.reload_time);
        true
    }

    /// Advance the reload timer. Returns true when a reload completed
    pub fn update(&mut self, delta_time: f32) -> bool {
        let Some(remaining) = self.reload_remaining else {
            return false;
        };
        let remaining = remaining - delta_time;
        if remaining <= 0.0 {
            self.ammo = self.magazine_size;
            self.reload_remaining = None;
            true
        } else {
            self.reload_remaining = Some(remaining);
            false
        }
    }

    /// Ammo display string
    pub fn ammo_display(&self) -> String {
        format!("{}/{}", self.ammo, self.magazine_size)
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new(WeaponStats::default(), 1)
    }
}

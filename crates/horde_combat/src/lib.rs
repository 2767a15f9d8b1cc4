//! Horde Combat - Health, Damage, Weapons and Projectiles
//!
//! # Features
//!
//! - Integer agent health that never goes below zero
//! - Fractional player life pool with display bands
//! - Headshot damage rule keyed to a fixed head height
//! - Magazine weapon with timed reload
//! - Bounded projectile ring with evict-oldest insertion
//! - Per-frame impact pass producing an ordered result list
//!
//! # Example
//!
//! ```ignore
//! use horde_combat::prelude::*;
//!
//! let mut ring = ProjectileRing::new(50);
//! let (serial, evicted) = ring.push(body, node, now);
//! if let Some(old) = evicted {
//!     physics.remove_body(old.body);
//! }
//!
//! let impacts = detect_impacts(&ring, &physics.probes(), &rules, &flight_bounds, classify);
//! ```

pub mod damage;
pub mod health;
pub mod impact;
pub mod projectile;
pub mod weapon;

pub mod prelude {
    pub use crate::damage::{DamageInfo, DamageRules};
    pub use crate::health::{Health, LifeBand, LifePool};
    pub use crate::impact::{detect_impacts, Impact, ImpactTarget, TargetClass};
    pub use crate::projectile::{Projectile, ProjectileConfig, ProjectileRing};
    pub use crate::weapon::{FireDecision, Weapon, WeaponStats};
}

pub use prelude::*;

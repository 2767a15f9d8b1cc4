//! Damage instances and the headshot rule

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Information about a damage instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    /// Base damage amount
    pub amount: u32,
    /// World position where damage was applied
    pub hit_point: Option<Vec3>,
    /// Whether this is a critical hit
    pub is_critical: bool,
    /// Critical damage multiplier (if critical)
    pub critical_multiplier: u32,
}

impl DamageInfo {
    /// Create new damage info
    pub fn new(amount: u32) -> Self {
        Self {
            amount,
            hit_point: None,
            is_critical: false,
            critical_multiplier: 2,
        }
    }

    /// Set the hit point
    pub fn with_hit_point(mut self, point: Vec3) -> Self {
        self.hit_point = Some(point);
        self
    }

    /// Mark as critical hit
    pub fn with_critical(mut self, multiplier: u32) -> Self {
        self.is_critical = true;
        self.critical_multiplier = multiplier;
        self
    }

    /// Get the final damage amount (including critical)
    pub fn final_amount(&self) -> u32 {
        if self.is_critical {
            self.amount.saturating_mul(self.critical_multiplier)
        } else {
            self.amount
        }
    }
}

/// How projectile hits turn into damage.
///
/// The head is a fixed height above the agent's feet, not a skeletal bone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageRules {
    /// Damage of a body hit
    pub base_damage: u32,
    /// Head height above the agent's base
    pub head_height: f32,
    /// Maximum vertical distance from the head height for a headshot
    pub head_threshold: f32,
    /// Damage multiplier for headshots
    pub headshot_multiplier: u32,
}

impl Default for DamageRules {
    fn default() -> Self {
        Self {
            base_damage: 1,
            head_height: 2.7,
            head_threshold: 0.5,
            headshot_multiplier: 2,
        }
    }
}

impl DamageRules {
    pub fn with_head(mut self, head_height: f32, head_threshold: f32) -> Self {
        self.head_height = head_height;
        self.head_threshold = head_threshold;
        self
    }

    /// Check if a hit at `hit_y` on an agent standing at `base_y` is a headshot
    pub fn is_headshot(&self, hit_y: f32, base_y: f32) -> bool {
        (hit_y - (base_y + self.head_height)).abs() < self.head_threshold
    }

    /// Damage for a projectile hit at `hit_point` on an agent standing at `base_y`
    pub fn damage_for_hit(&self, hit_point: Vec3, base_y: f32) -> DamageInfo {
        let damage = DamageInfo::new(self.base_damage).with_hit_point(hit_point);
        if self.is_headshot(hit_point.y, base_y) {
            damage.with_critical(self.headshot_multiplier)
        } else {
            damage
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_info() {
        let damage = DamageInfo::new(3).with_critical(2);
        assert!(damage.is_critical);
        assert_eq!(damage.final_amount(), 6);
        assert_eq!(DamageInfo::new(3).final_amount(), 3);
    }

    #[test]
    fn test_headshot_doubles() {
        let rules = DamageRules::default();
        let head = rules.damage_for_hit(Vec3::new(0.0, 2.9, 0.0), 0.0);
        assert!(head.is_critical);
        assert_eq!(head.final_amount(), 2);

        let body = rules.damage_for_hit(Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert!(!body.is_critical);
        assert_eq!(body.final_amount(), 1);
    }

    #[test]
    fn test_headshot_threshold_is_strict() {
        let rules = DamageRules::default();
        assert!(!rules.is_headshot(3.2, 0.0));
        assert!(!rules.is_headshot(2.2, 0.0));
        assert!(rules.is_headshot(2.21, 0.0));
        // Relative to the agent's base, not the world origin
        assert!(rules.is_headshot(12.7, 10.0));
        assert!(!rules.is_headshot(2.7, 10.0));
    }

    #[test]
    fn test_taller_head() {
        let rules = DamageRules::default().with_head(4.0, 0.3);
        assert!(!rules.damage_for_hit(Vec3::new(0.0, 2.7, 0.0), 0.0).is_critical);
        assert_eq!(rules.damage_for_hit(Vec3::new(0.0, 4.1, 0.0), 0.0).final_amount(), 2);
    }
}

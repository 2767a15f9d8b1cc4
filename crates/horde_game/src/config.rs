//! Game configuration
//!
//! Everything tunable lives in one [`GameConfig`] that can be loaded from a
//! JSON file. Missing fields fall back to their defaults.

use crate::error::{GameError, Result};
use crate::level::LevelConfig;
use crate::placement::FieldConfig;
use crate::powerup::PowerUpConfig;
use crate::zombie::AgentConfig;
use horde_ai::SteeringConfig;
use horde_combat::{DamageRules, ProjectileConfig, WeaponStats};
use horde_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weapon, projectile and player tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub damage: DamageRules,
    pub projectiles: ProjectileConfig,
    pub weapon: WeaponStats,
    pub projectile_color: [f32; 3],
    /// Colour of the splat left where a pellet hits the world
    pub decal_color: [f32; 3],
    pub player_max_life: f32,
    pub player_move_speed: f32,
    pub gunshot_sound: Option<String>,
    pub reload_sound: Option<String>,
    pub empty_sound: Option<String>,
    /// Plays while the player's life is critical
    pub scream_sound: Option<String>,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            damage: DamageRules::default(),
            projectiles: ProjectileConfig::default(),
            weapon: WeaponStats::default(),
            projectile_color: [1.0, 0.2, 0.6],
            decal_color: [1.0, 0.2, 0.6],
            player_max_life: 10.0,
            player_move_speed: 10.0,
            gunshot_sound: Some("./assets/audio/gunshot.mp3".to_string()),
            reload_sound: Some("./assets/audio/reload.mp3".to_string()),
            empty_sound: Some("./assets/audio/emptymag.mp3".to_string()),
            scream_sound: Some("./assets/audio/scream.mp3".to_string()),
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for every random choice the simulation makes
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub steering: SteeringConfig,
    pub agents: AgentConfig,
    pub combat: CombatConfig,
    pub field: FieldConfig,
    pub level: LevelConfig,
    pub power_ups: PowerUpConfig,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("loading config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.physics.validate()?;

        let agents = &self.agents;
        if agents.max_health == 0 {
            return Err(invalid("agents.max_health must be positive"));
        }
        if !(agents.speed >= 0.0) {
            return Err(invalid("agents.speed must not be negative"));
        }
        if !(agents.dying_time_scale > 0.0) {
            return Err(invalid("agents.dying_time_scale must be positive"));
        }
        if !(agents.fallback_teardown > 0.0) {
            return Err(invalid("agents.fallback_teardown must be positive"));
        }
        if agents.thresholds.attack_distance > agents.thresholds.idle_distance {
            return Err(invalid("agents.thresholds.attack_distance exceeds idle_distance"));
        }
        if agents.body_half_extents.iter().any(|h| !(*h > 0.0)) {
            return Err(invalid("agents.body_half_extents must be positive"));
        }

        let combat = &self.combat;
        if combat.projectiles.capacity == 0 {
            return Err(invalid("combat.projectiles.capacity must be positive"));
        }
        if !(combat.projectiles.radius > 0.0) || !(combat.projectiles.launch_speed > 0.0) {
            return Err(invalid("combat.projectiles radius and launch_speed must be positive"));
        }
        if !(combat.player_max_life > 0.0) {
            return Err(invalid("combat.player_max_life must be positive"));
        }

        let field = &self.field;
        if !(field.width > 0.0) || !(field.length > 0.0) {
            return Err(invalid("field width and length must be positive"));
        }
        if field.attempts_per_target == 0 {
            return Err(invalid("field.attempts_per_target must be positive"));
        }
        if self.level.max_level == 0 {
            return Err(invalid("level.max_level must be positive"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> GameError {
    GameError::InvalidConfig(message.to_string())
}

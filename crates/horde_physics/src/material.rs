//! Surface properties for colliders

use serde::{Deserialize, Serialize};

/// Physics material defining friction, restitution and density
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0 = frictionless, 1 = high friction)
    pub friction: f32,
    /// Restitution/bounciness (0 = no bounce, 1 = perfect bounce)
    pub restitution: f32,
    /// Density for mass calculation
    pub density: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
        }
    }
}

impl PhysicsMaterial {
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
            ..Default::default()
        }
    }

    /// Static arena geometry: ground, walls, trunks
    pub fn terrain() -> Self {
        Self {
            friction: 0.8,
            restitution: 0.0,
            density: 1.0,
        }
    }

    /// Light, slightly bouncy paint pellet
    pub fn pellet() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.1,
            density: 1.0,
        }
    }

    /// Set density
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }
}

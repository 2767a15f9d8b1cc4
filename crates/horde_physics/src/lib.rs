//! Horde Physics - Rapier 3D Integration
//!
//! Owns every rigid body in the arena: ground, perimeter walls, trees,
//! structure walls, agent bodies and projectiles.
//!
//! # Features
//!
//! - Rigid bodies (fixed, dynamic, kinematic) with one collider each
//! - Fixed-timestep stepping with an accumulator
//! - Body probes: a per-tick snapshot of every body's pose, bounding sphere
//!   and world-space box, used for impact tests and steering obstacles
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 PhysicsWorld                  │
//! │  ┌─────────────┐ ┌─────────────┐ ┌──────────┐ │
//! │  │ RigidBodySet│ │ ColliderSet │ │ BodyMeta │ │
//! │  └─────────────┘ └─────────────┘ └──────────┘ │
//! │  ┌───────────────────────────────────────────┐│
//! │  │             PhysicsPipeline               ││
//! │  └───────────────────────────────────────────┘│
//! └───────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!                 ┌────────────┐
//!                 │ BodyProbe  │  (kind, pose, bounds, user data)
//!                 └────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use horde_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//!
//! let ball = physics.create_body(
//!     RigidBodyDesc::dynamic(BodyKind::Projectile).with_position(Vec3::new(0.0, 10.0, 0.0)),
//!     ColliderDesc::new(ColliderShape::sphere(0.02)),
//! )?;
//!
//! physics.step(1.0 / 60.0);
//! let probe = physics.probe(ball);
//! ```

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
pub mod material;
pub mod probe;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyKind, RigidBodyDesc, RigidBodyHandle, RigidBodyType};
    pub use crate::collider::{ColliderDesc, ColliderShape};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::material::PhysicsMaterial;
    pub use crate::probe::BodyProbe;
    pub use crate::world::PhysicsWorld;
    pub use glam::{Quat, Vec3};
}

pub use prelude::*;

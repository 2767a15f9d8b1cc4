//! # horde_core - Shared Primitives
//!
//! Small, dependency-light building blocks used by every other Horde crate:
//! - Axis-aligned bounding boxes for obstacle volumes and placement probes
//! - Generational identifiers for agents and deferred tasks
//! - Opaque handles for render nodes and sounds owned by external collaborators

pub mod bounds;
pub mod id;

pub use bounds::*;
pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bounds::Aabb;
    pub use crate::id::{Id, IdGenerator, NodeId, SoundHandle};
    pub use glam::{Quat, Vec3};
}

/// Squared length below which a vector is treated as zero.
pub const EPSILON_SQ: f32 = 1e-10;

/// Project a vector onto the ground plane (drop the Y component).
#[inline]
pub fn flatten(v: glam::Vec3) -> glam::Vec3 {
    glam::Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal distance between two points, ignoring height.
#[inline]
pub fn ground_distance(a: glam::Vec3, b: glam::Vec3) -> f32 {
    flatten(a - b).length()
}

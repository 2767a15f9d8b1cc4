//! Rigid body types and descriptions

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub(crate) rapier::RigidBodyHandle);

impl RigidBodyHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::RigidBodyHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::RigidBodyHandle {
        self.0
    }
}

/// Type of rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RigidBodyType {
    /// Never moves, infinite mass
    Fixed,
    /// Fully simulated
    #[default]
    Dynamic,
    /// Pose written by the owner every frame
    Kinematic,
}

impl From<RigidBodyType> for rapier::RigidBodyType {
    fn from(t: RigidBodyType) -> Self {
        match t {
            RigidBodyType::Fixed => rapier::RigidBodyType::Fixed,
            RigidBodyType::Dynamic => rapier::RigidBodyType::Dynamic,
            RigidBodyType::Kinematic => rapier::RigidBodyType::KinematicPositionBased,
        }
    }
}

/// What a body stands for in the arena.
///
/// Impact resolution and body-visual sync branch on this tag instead of
/// inspecting shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// The infinite ground plane at y = 0
    Ground,
    /// Perimeter or structure wall
    Wall,
    /// Tree trunk
    Tree,
    /// Loose structure geometry other than walls
    Structure,
    /// Zombie body, driven by its visual
    Agent,
    /// Paint pellet
    Projectile,
    /// Any other physics-driven prop
    Prop,
}

impl BodyKind {
    /// Static arena geometry that steering treats as an obstacle
    pub fn is_obstacle(&self) -> bool {
        matches!(self, Self::Wall | Self::Tree | Self::Structure)
    }
}

/// Description for creating a rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBodyDesc {
    /// Arena role of the body
    pub kind: BodyKind,
    /// Type of rigid body
    pub body_type: RigidBodyType,
    /// Initial position
    pub position: Vec3,
    /// Initial rotation
    pub rotation: Quat,
    /// Initial linear velocity
    pub linear_velocity: Vec3,
    /// Gravity scale (0 = no gravity, 1 = normal)
    pub gravity_scale: f32,
    /// Linear damping (air resistance)
    pub linear_damping: f32,
    /// Enable continuous collision detection
    pub ccd_enabled: bool,
    /// Can this body sleep when inactive
    pub can_sleep: bool,
}

impl RigidBodyDesc {
    pub fn new(kind: BodyKind, body_type: RigidBodyType) -> Self {
        Self {
            kind,
            body_type,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            gravity_scale: 1.0,
            linear_damping: 0.0,
            ccd_enabled: false,
            can_sleep: true,
        }
    }

    /// Create a fixed body description
    pub fn fixed(kind: BodyKind) -> Self {
        Self::new(kind, RigidBodyType::Fixed)
    }

    /// Create a dynamic body description
    pub fn dynamic(kind: BodyKind) -> Self {
        Self::new(kind, RigidBodyType::Dynamic)
    }

    /// Create a kinematic body description
    pub fn kinematic(kind: BodyKind) -> Self {
        Self::new(kind, RigidBodyType::Kinematic)
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set gravity scale
    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Set linear damping
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Enable CCD
    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd_enabled = enabled;
        self
    }

    /// Build a Rapier rigid body builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::RigidBodyBuilder {
        rapier::RigidBodyBuilder::new(self.body_type.into())
            .position(to_isometry(self.position, self.rotation))
            .linvel(to_vector(self.linear_velocity))
            .gravity_scale(self.gravity_scale)
            .linear_damping(self.linear_damping)
            .ccd_enabled(self.ccd_enabled)
            .can_sleep(self.can_sleep)
    }
}

pub(crate) fn to_vector(v: Vec3) -> rapier::Vector<f32> {
    rapier::Vector::new(v.x, v.y, v.z)
}

pub(crate) fn from_vector(v: &rapier::Vector<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn to_isometry(position: Vec3, rotation: Quat) -> rapier::Isometry<f32> {
    rapier::Isometry::from_parts(
        rapier::Translation::new(position.x, position.y, position.z),
        UnitQuaternion::from_quaternion(Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        )),
    )
}

pub(crate) fn from_rotation(rot: &UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_isometry_round_trip_keeps_heading() {
        let rotation = Quat::from_rotation_y(0.7);
        let iso = to_isometry(Vec3::new(1.0, 2.0, 3.0), rotation);
        let back = from_rotation(&iso.rotation);
        assert_relative_eq!(back.dot(rotation).abs(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(iso.translation.vector.y, 2.0);
    }

    #[test]
    fn test_obstacle_kinds() {
        assert!(BodyKind::Wall.is_obstacle());
        assert!(BodyKind::Tree.is_obstacle());
        assert!(!BodyKind::Ground.is_obstacle());
        assert!(!BodyKind::Agent.is_obstacle());
    }
}

//! Collision shapes and collider descriptions

use crate::error::{PhysicsError, Result};
use crate::material::PhysicsMaterial;
use glam::Vec3;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Half-extent used for the box of an unbounded half-space
pub const HALF_SPACE_EXTENT: f32 = 1.0e6;

/// Collision shape type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Sphere with radius
    Sphere { radius: f32 },
    /// Box with half-extents
    Box { half_extents: [f32; 3] },
    /// Capsule aligned along Y axis
    CapsuleY { half_height: f32, radius: f32 },
    /// Cylinder aligned along Y axis
    CylinderY { half_height: f32, radius: f32 },
    /// Solid half-space below the body origin, normal +Y
    HalfSpace,
}

impl ColliderShape {
    /// Create a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy, hz],
        }
    }

    /// Create a box shape from full size
    pub fn from_size(width: f32, height: f32, depth: f32) -> Self {
        Self::cuboid(width * 0.5, height * 0.5, depth * 0.5)
    }

    /// Create a capsule shape (Y-aligned)
    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::CapsuleY {
            half_height,
            radius,
        }
    }

    /// Create a cylinder shape (Y-aligned)
    pub fn cylinder(half_height: f32, radius: f32) -> Self {
        Self::CylinderY {
            half_height,
            radius,
        }
    }

    /// Local-space half-extents of the shape's box
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Self::Sphere { radius } => Vec3::splat(radius),
            Self::Box { half_extents } => Vec3::from_array(half_extents),
            Self::CapsuleY {
                half_height,
                radius,
            } => Vec3::new(radius, half_height + radius, radius),
            Self::CylinderY {
                half_height,
                radius,
            } => Vec3::new(radius, half_height, radius),
            Self::HalfSpace => Vec3::splat(HALF_SPACE_EXTENT),
        }
    }

    /// Radius of the smallest origin-centred sphere enclosing the shape
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Box { half_extents } => Vec3::from_array(half_extents).length(),
            Self::CapsuleY {
                half_height,
                radius,
            } => half_height + radius,
            Self::CylinderY {
                half_height,
                radius,
            } => (half_height * half_height + radius * radius).sqrt(),
            Self::HalfSpace => f32::INFINITY,
        }
    }

    /// Check dimensions are positive and finite
    pub fn validate(&self) -> Result<()> {
        let dims: &[f32] = match self {
            Self::Sphere { radius } => &[*radius][..],
            Self::Box { half_extents } => &half_extents[..],
            Self::CapsuleY {
                half_height,
                radius,
            }
            | Self::CylinderY {
                half_height,
                radius,
            } => &[*half_height, *radius][..],
            Self::HalfSpace => &[],
        };
        if dims.iter().all(|d| d.is_finite() && *d > 0.0) {
            Ok(())
        } else {
            Err(PhysicsError::ShapeCreationFailed(format!(
                "non-positive dimension in {self:?}"
            )))
        }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(&self) -> rapier::SharedShape {
        match *self {
            Self::Sphere { radius } => rapier::SharedShape::ball(radius),
            Self::Box { half_extents } => {
                rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
            Self::CapsuleY {
                half_height,
                radius,
            } => rapier::SharedShape::capsule_y(half_height, radius),
            Self::CylinderY {
                half_height,
                radius,
            } => rapier::SharedShape::cylinder(half_height, radius),
            Self::HalfSpace => rapier::SharedShape::halfspace(rapier::Vector::y_axis()),
        }
    }
}

/// Description for creating a collider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderDesc {
    /// Collision shape
    pub shape: ColliderShape,
    /// Physics material
    pub material: PhysicsMaterial,
    /// Explicit mass, overriding the material density
    pub mass: Option<f32>,
    /// User data (agent id bits, etc.)
    pub user_data: u128,
}

impl ColliderDesc {
    /// Create a new collider description with a shape
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            material: PhysicsMaterial::default(),
            mass: None,
            user_data: 0,
        }
    }

    /// Set material
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    /// Set an explicit mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Set user data
    pub fn with_user_data(mut self, data: u128) -> Self {
        self.user_data = data;
        self
    }

    /// Build a Rapier collider builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::ColliderBuilder {
        let builder = rapier::ColliderBuilder::new(self.shape.to_rapier())
            .friction(self.material.friction)
            .restitution(self.material.restitution)
            .user_data(self.user_data);

        match self.mass {
            Some(mass) => builder.mass(mass),
            None => builder.density(self.material.density),
        }
    }
}

//! Read-only snapshots of body state for overlap tests

use crate::body::{BodyKind, RigidBodyHandle, RigidBodyType};
use crate::collider::{ColliderShape, HALF_SPACE_EXTENT};
use glam::{Quat, Vec3};
use horde_core::Aabb;

/// Pose and extent of one body, captured after a physics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProbe {
    pub handle: RigidBodyHandle,
    pub kind: BodyKind,
    pub body_type: RigidBodyType,
    pub shape: ColliderShape,
    pub position: Vec3,
    pub rotation: Quat,
    /// Radius of the bounding sphere around `position`
    pub bounding_radius: f32,
    /// World-space axis-aligned box
    pub bounds: Aabb,
    pub user_data: u128,
}

impl BodyProbe {
    pub(crate) fn capture(
        handle: RigidBodyHandle,
        kind: BodyKind,
        body_type: RigidBodyType,
        shape: ColliderShape,
        position: Vec3,
        rotation: Quat,
        user_data: u128,
    ) -> Self {
        let bounds = match shape {
            ColliderShape::HalfSpace => Aabb::new(
                Vec3::splat(-HALF_SPACE_EXTENT),
                Vec3::new(HALF_SPACE_EXTENT, position.y, HALF_SPACE_EXTENT),
            ),
            _ => Aabb::from_oriented(position, shape.half_extents(), rotation),
        };
        Self {
            handle,
            kind,
            body_type,
            shape,
            position,
            rotation,
            bounding_radius: shape.bounding_radius(),
            bounds,
            user_data,
        }
    }

    /// Check whether a sphere touches this body.
    ///
    /// Half-spaces use a height test and fixed boxes a sphere-vs-box test;
    /// every other body is treated as its bounding sphere.
    pub fn touches_sphere(&self, center: Vec3, radius: f32) -> bool {
        match (self.shape, self.body_type) {
            (ColliderShape::HalfSpace, _) => center.y - radius <= self.position.y,
            (ColliderShape::Box { .. } | ColliderShape::CylinderY { .. }, RigidBodyType::Fixed) => {
                self.bounds.intersects_sphere(center, radius)
            }
            _ => {
                let reach = self.bounding_radius + radius;
                center.distance_squared(self.position) <= reach * reach
            }
        }
    }

    /// Outward surface normal for a contact at `point`
    pub fn contact_normal(&self, point: Vec3) -> Vec3 {
        match self.shape {
            ColliderShape::HalfSpace => Vec3::Y,
            ColliderShape::Box { .. } | ColliderShape::CylinderY { .. }
                if self.body_type == RigidBodyType::Fixed =>
            {
                let closest = self.bounds.closest_point(point);
                (point - closest)
                    .try_normalize()
                    .or_else(|| (point - self.bounds.center()).try_normalize())
                    .unwrap_or(Vec3::Y)
            }
            _ => (point - self.position).try_normalize().unwrap_or(Vec3::Y),
        }
    }
}

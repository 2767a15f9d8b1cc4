//! Axis-aligned bounding boxes for obstacle volumes and spatial probes

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create from min and max points
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Cube of the given side length centred on a point
    #[inline]
    pub fn cube(center: Vec3, side: f32) -> Self {
        Self::from_center_half_extents(center, Vec3::splat(side * 0.5))
    }

    /// Bounds of a box with `half_extents` rotated by `rotation` around `center`.
    ///
    /// The result is the tightest axis-aligned box enclosing the rotated box.
    pub fn from_oriented(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        let m = Mat3::from_quat(rotation);
        let extent = Vec3::new(
            m.x_axis.x.abs() * half_extents.x
                + m.y_axis.x.abs() * half_extents.y
                + m.z_axis.x.abs() * half_extents.z,
            m.x_axis.y.abs() * half_extents.x
                + m.y_axis.y.abs() * half_extents.y
                + m.z_axis.y.abs() * half_extents.z,
            m.x_axis.z.abs() * half_extents.x
                + m.y_axis.z.abs() * half_extents.y
                + m.z_axis.z.abs() * half_extents.z,
        );
        Self::from_center_half_extents(center, extent)
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the size (full extents)
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Expand by a uniform margin in every direction
    #[inline]
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Expand horizontally only (X and Z), leaving the vertical span untouched
    #[inline]
    pub fn expand_horizontal(&self, margin: f32) -> Self {
        let m = Vec3::new(margin, 0.0, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Check if a point is inside (boundary inclusive)
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if two boxes intersect (touching counts)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Get the closest point on (or in) the box to a given point
    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Squared distance from a point to the box (zero when inside)
    #[inline]
    pub fn distance_squared_to_point(&self, point: Vec3) -> f32 {
        (point - self.closest_point(point)).length_squared()
    }

    /// Check if a sphere touches the box
    #[inline]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.distance_squared_to_point(center) <= radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_intersects() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(0.5), Vec3::splat(2.0));
        let c = Aabb::new(Vec3::splat(3.0), Vec3::splat(4.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_touching_faces_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_closest_point() {
        let aabb = Aabb::new(Vec3::new(1.0, 0.0, -1.0), Vec3::new(3.0, 5.0, 1.0));
        assert_eq!(aabb.closest_point(Vec3::ZERO), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(aabb.closest_point(Vec3::new(2.0, 1.0, 0.0)), Vec3::new(2.0, 1.0, 0.0));
        assert_relative_eq!(aabb.distance_squared_to_point(Vec3::ZERO), 1.0);
    }

    #[test]
    fn test_expand_horizontal_keeps_height() {
        let aabb = Aabb::cube(Vec3::ZERO, 2.0).expand_horizontal(1.0);
        assert_relative_eq!(aabb.min.x, -2.0);
        assert_relative_eq!(aabb.max.z, 2.0);
        assert_relative_eq!(aabb.min.y, -1.0);
        assert_relative_eq!(aabb.max.y, 1.0);
    }

    #[test]
    fn test_from_oriented_quarter_turn_swaps_extents() {
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let aabb = Aabb::from_oriented(Vec3::ZERO, Vec3::new(10.0, 1.0, 0.5), rotation);
        assert_relative_eq!(aabb.half_extents().x, 0.5, epsilon = 1e-4);
        assert_relative_eq!(aabb.half_extents().z, 10.0, epsilon = 1e-4);
        assert_relative_eq!(aabb.half_extents().y, 1.0, epsilon = 1e-4);
        assert_relative_eq!(aabb.size().z, 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_overlap() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.intersects_sphere(Vec3::new(1.5, 0.5, 0.5), 0.6));
        assert!(!aabb.intersects_sphere(Vec3::new(1.5, 0.5, 0.5), 0.4));
    }
}

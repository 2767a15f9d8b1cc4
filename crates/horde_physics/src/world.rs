//! Physics world - main simulation container

use crate::body::{
    from_rotation, from_vector, to_isometry, BodyKind, RigidBodyDesc, RigidBodyHandle,
    RigidBodyType,
};
use crate::collider::{ColliderDesc, ColliderShape};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::probe::BodyProbe;
use glam::{Quat, Vec3};
use rapier3d::prelude as rapier;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Bookkeeping the rapier sets do not carry for us
#[derive(Debug, Clone, Copy)]
struct BodyMeta {
    kind: BodyKind,
    body_type: RigidBodyType,
    shape: ColliderShape,
    user_data: u128,
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    config: PhysicsConfig,

    pipeline: rapier::PhysicsPipeline,
    gravity: rapier::Vector<f32>,
    integration_params: rapier::IntegrationParameters,
    islands: rapier::IslandManager,
    broad_phase: rapier::DefaultBroadPhase,
    narrow_phase: rapier::NarrowPhase,
    impulse_joints: rapier::ImpulseJointSet,
    multibody_joints: rapier::MultibodyJointSet,
    ccd_solver: rapier::CCDSolver,
    bodies: rapier::RigidBodySet,
    colliders: rapier::ColliderSet,

    meta: HashMap<RigidBodyHandle, BodyMeta>,

    /// Live bodies in creation order, so probes are deterministic
    order: Vec<RigidBodyHandle>,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: PhysicsConfig) -> Self {
        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1], config.gravity[2]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            meta: HashMap::new(),
            order: Vec::new(),
            accumulated_time: 0.0,
        }
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // ==================== Rigid Bodies ====================

    /// Create a rigid body with a single attached collider
    pub fn create_body(&mut self, desc: RigidBodyDesc, collider: ColliderDesc) -> Result<RigidBodyHandle> {
        collider.shape.validate()?;

        let handle = RigidBodyHandle(self.bodies.insert(desc.to_rapier_builder()));
        self.colliders
            .insert_with_parent(collider.to_rapier_builder(), handle.0, &mut self.bodies);

        self.meta.insert(
            handle,
            BodyMeta {
                kind: desc.kind,
                body_type: desc.body_type,
                shape: collider.shape,
                user_data: collider.user_data,
            },
        );
        self.order.push(handle);

        log::trace!("created {:?} body {:?}", desc.kind, handle);
        Ok(handle)
    }

    /// Remove a rigid body and its collider.
    ///
    /// Returns `false` when the body was already gone.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        let removed = self
            .bodies
            .remove(
                handle.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some();

        if removed {
            self.meta.remove(&handle);
            self.order.retain(|h| *h != handle);
        }
        removed
    }

    /// Check whether a body is still in the world
    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Get rigid body position
    pub fn body_position(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.bodies
            .get(handle.0)
            .map(|b| from_vector(b.translation()))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Get rigid body rotation
    pub fn body_rotation(&self, handle: RigidBodyHandle) -> Result<Quat> {
        self.bodies
            .get(handle.0)
            .map(|b| from_rotation(b.rotation()))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Teleport a body to a pose, waking it
    pub fn set_body_transform(&mut self, handle: RigidBodyHandle, position: Vec3, rotation: Quat) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| b.set_position(to_isometry(position, rotation), true))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Get rigid body linear velocity
    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.bodies
            .get(handle.0)
            .map(|b| from_vector(b.linvel()))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Arena role of a body
    pub fn body_kind(&self, handle: RigidBodyHandle) -> Option<BodyKind> {
        self.meta.get(&handle).map(|m| m.kind)
    }

    // ==================== Simulation ====================

    /// Step the physics simulation with fixed timestep.
    ///
    /// Returns the number of substeps taken. Time beyond `max_substeps`
    /// steps is dropped rather than carried into the next frame.
    pub fn step(&mut self, delta_time: f32) -> u32 {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return 0;
        }
        self.accumulated_time += delta_time;

        let mut steps = 0;
        while self.accumulated_time >= self.config.timestep && steps < self.config.max_substeps {
            self.step_internal();
            self.accumulated_time -= self.config.timestep;
            steps += 1;
        }

        if steps == self.config.max_substeps && self.accumulated_time >= self.config.timestep {
            log::debug!(
                "physics fell behind, dropping {:.3}s",
                self.accumulated_time
            );
            self.accumulated_time = 0.0;
        }
        steps
    }

    fn step_internal(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    // ==================== Probes ====================

    /// Snapshot one body
    pub fn probe(&self, handle: RigidBodyHandle) -> Option<BodyProbe> {
        let meta = self.meta.get(&handle)?;
        let body = self.bodies.get(handle.0)?;
        Some(BodyProbe::capture(
            handle,
            meta.kind,
            meta.body_type,
            meta.shape,
            from_vector(body.translation()),
            from_rotation(body.rotation()),
            meta.user_data,
        ))
    }

    /// Snapshot every live body, in creation order
    pub fn probes(&self) -> Vec<BodyProbe> {
        self.order.iter().filter_map(|h| self.probe(*h)).collect()
    }

    /// Get number of rigid bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_create_world() {
        let world = PhysicsWorld::new(PhysicsConfig::default());
        assert_eq!(world.body_count(), 0);
        assert!(world.probes().is_empty());
    }

    #[test]
    fn test_gravity_fall() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());

        let body = world
            .create_body(
                RigidBodyDesc::dynamic(BodyKind::Prop).with_position(Vec3::new(0.0, 10.0, 0.0)),
                ColliderDesc::new(ColliderShape::sphere(1.0)),
            )
            .unwrap();

        let initial_y = world.body_position(body).unwrap().y;
        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }
        let final_y = world.body_position(body).unwrap().y;
        assert!(final_y < initial_y, "Body should fall due to gravity");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut world = PhysicsWorld::default();
        let body = world
            .create_body(
                RigidBodyDesc::kinematic(BodyKind::Agent),
                ColliderDesc::new(ColliderShape::capsule(0.5, 0.5)),
            )
            .unwrap();

        assert!(world.remove_body(body));
        assert!(!world.remove_body(body));
        assert!(!world.contains(body));
        assert!(matches!(world.body_position(body), Err(PhysicsError::BodyNotFound(_))));
    }

    #[test]
    fn test_probes_follow_creation_order() {
        let mut world = PhysicsWorld::default();
        let ground = world
            .create_body(RigidBodyDesc::fixed(BodyKind::Ground), ColliderDesc::new(ColliderShape::HalfSpace))
            .unwrap();
        let tree = world
            .create_body(
                RigidBodyDesc::fixed(BodyKind::Tree).with_position(Vec3::new(5.0, 10.0, 5.0)),
                ColliderDesc::new(ColliderShape::cylinder(10.0, 3.0)).with_user_data(7),
            )
            .unwrap();

        let probes = world.probes();
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].handle, ground);
        assert_eq!(probes[1].handle, tree);
        assert_eq!(probes[1].user_data, 7);
        assert_relative_eq!(probes[1].bounds.min.x, 2.0);
        assert_relative_eq!(probes[1].bounds.max.y, 20.0);
    }

    #[test]
    fn test_set_transform_moves_kinematic_body() {
        let mut world = PhysicsWorld::default();
        let body = world
            .create_body(
                RigidBodyDesc::kinematic(BodyKind::Agent),
                ColliderDesc::new(ColliderShape::capsule(0.5, 0.5)),
            )
            .unwrap();

        world
            .set_body_transform(body, Vec3::new(3.0, 1.0, -2.0), Quat::from_rotation_y(1.0))
            .unwrap();
        let probe = world.probe(body).unwrap();
        assert_relative_eq!(probe.position.x, 3.0);
        assert_relative_eq!(probe.position.z, -2.0);
    }

    #[test]
    fn test_launch_velocity_and_kind() {
        let mut world = PhysicsWorld::default();
        let pellet = world
            .create_body(
                RigidBodyDesc::dynamic(BodyKind::Projectile).with_linear_velocity(Vec3::new(0.0, 0.0, -350.0)),
                ColliderDesc::new(ColliderShape::sphere(0.2)),
            )
            .unwrap();

        assert_eq!(world.body_kind(pellet), Some(BodyKind::Projectile));
        assert_relative_eq!(world.linear_velocity(pellet).unwrap().z, -350.0);

        world.remove_body(pellet);
        assert_eq!(world.body_kind(pellet), None);
        assert!(world.linear_velocity(pellet).is_err());
    }

    #[test]
    fn test_invalid_shape_is_rejected() {
        let mut world = PhysicsWorld::default();
        let result = world.create_body(
            RigidBodyDesc::fixed(BodyKind::Wall),
            ColliderDesc::new(ColliderShape::cuboid(0.0, 1.0, 1.0)),
        );
        assert!(matches!(result, Err(PhysicsError::ShapeCreationFailed(_))));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_step_counts_substeps() {
        let mut world = PhysicsWorld::default();
        assert_eq!(world.step(1.0 / 60.0 + 1e-4), 1);
        assert_eq!(world.step(0.0), 0);
        assert_eq!(world.step(1.0), 4);
    }
}

//! Paint pellets in flight

use glam::Vec3;
use horde_core::{Aabb, NodeId};
use horde_physics::RigidBodyHandle;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Launch and flight parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Sphere radius
    pub radius: f32,
    /// Mass of one pellet
    pub mass: f32,
    /// Launch speed along the firing direction
    pub launch_speed: f32,
    /// Spawn distance ahead of the muzzle
    pub muzzle_offset: f32,
    /// Linear damping of the pellet body
    pub linear_damping: f32,
    /// Most pellets alive at once
    pub capacity: usize,
    /// Horizontal half-extent of the volume pellets may fly in
    pub flight_half_extent: f32,
    /// Height ceiling of that volume
    pub flight_ceiling: f32,
    /// Depth below ground at which a pellet is gone
    pub flight_floor: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            radius: 0.02,
            mass: 0.01,
            launch_speed: 350.0,
            muzzle_offset: 0.75,
            linear_damping: 0.01,
            capacity: 50,
            flight_half_extent: 400.0,
            flight_ceiling: 400.0,
            flight_floor: -10.0,
        }
    }
}

impl ProjectileConfig {
    /// Volume outside which a pellet is discarded
    pub fn flight_bounds(&self) -> Aabb {
        Aabb::new(
            Vec3::new(-self.flight_half_extent, self.flight_floor, -self.flight_half_extent),
            Vec3::new(self.flight_half_extent, self.flight_ceiling, self.flight_half_extent),
        )
    }

    /// Spawn point and velocity for a shot from `origin` along `direction`.
    ///
    /// Returns `None` for a zero or non-finite direction.
    pub fn launch(&self, origin: Vec3, direction: Vec3) -> Option<(Vec3, Vec3)> {
        let dir = direction.try_normalize()?;
        let spawn = origin + dir * self.muzzle_offset;
        spawn
            .is_finite()
            .then_some((spawn, dir * self.launch_speed))
    }
}

/// One pellet: its physics body and render node, created and released together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Insertion order, unique per ring
    pub serial: u64,
    pub body: RigidBodyHandle,
    pub node: NodeId,
    /// Simulation time of the shot
    pub spawned_at: f64,
}

/// Bounded FIFO of live projectiles
#[derive(Debug, Clone)]
pub struct ProjectileRing {
    capacity: usize,
    entries: VecDeque<Projectile>,
    next_serial: u64,
}

impl ProjectileRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            next_serial: 0,
        }
    }

    /// Insert a projectile, evicting the oldest first if full.
    ///
    /// The caller owns releasing the evicted projectile's body and node.
    pub fn push(&mut self, body: RigidBodyHandle, node: NodeId, now: f64) -> (u64, Option<Projectile>) {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };

        let serial = self.next_serial;
        self.next_serial += 1;
        self.entries.push_back(Projectile {
            serial,
            body,
            node,
            spawned_at: now,
        });

        if let Some(old) = &evicted {
            log::trace!("projectile {} evicted by {}", old.serial, serial);
        }
        (serial, evicted)
    }

    /// Take a projectile out of the ring
    pub fn remove(&mut self, serial: u64) -> Option<Projectile> {
        let index = self.entries.iter().position(|p| p.serial == serial)?;
        self.entries.remove(index)
    }

    pub fn get(&self, serial: u64) -> Option<&Projectile> {
        self.entries.iter().find(|p| p.serial == serial)
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.entries.iter()
    }

    /// Empty the ring, returning every projectile for release
    pub fn drain(&mut self) -> Vec<Projectile> {
        self.entries.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ProjectileRing {
    fn default() -> Self {
        Self::new(ProjectileConfig::default().capacity)
    }
}

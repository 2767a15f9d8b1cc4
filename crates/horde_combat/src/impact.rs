//! Projectile impact detection
//!
//! One pass per frame over the ring, oldest first. Each projectile produces at
//! most one [`Impact`]; the caller applies the list after the pass so nothing
//! is mutated while probes are being read.

use crate::damage::{DamageInfo, DamageRules};
use crate::projectile::ProjectileRing;
use glam::Vec3;
use horde_core::{Aabb, Id};
use horde_physics::{BodyKind, BodyProbe, RigidBodyHandle};
use std::collections::HashMap;

/// How the caller sees a body a projectile may hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetClass {
    /// A live agent standing at `base_y`
    Agent { id: Id, base_y: f32 },
    /// Anything that stops a projectile without taking damage
    World,
    /// Not hittable this frame (dying agents, other projectiles)
    Pass,
}

/// What a projectile hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactTarget {
    Agent(Id),
    World(BodyKind),
    /// Left the flight volume without hitting anything
    OutOfBounds,
}

/// One resolved projectile outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub serial: u64,
    pub body: RigidBodyHandle,
    pub target: ImpactTarget,
    pub point: Vec3,
    pub normal: Vec3,
    /// Present for agent hits only
    pub damage: Option<DamageInfo>,
}

impl Impact {
    pub fn is_headshot(&self) -> bool {
        self.damage.is_some_and(|d| d.is_critical)
    }
}

/// Find the first thing each projectile touches.
///
/// Probes are scanned in the order given; the first overlap wins.
pub fn detect_impacts<F>(
    ring: &ProjectileRing,
    probes: &[BodyProbe],
    rules: &DamageRules,
    flight_bounds: &Aabb,
    mut classify: F,
) -> Vec<Impact>
where
    F: FnMut(&BodyProbe) -> TargetClass,
{
    let by_handle: HashMap<RigidBodyHandle, &BodyProbe> =
        probes.iter().map(|p| (p.handle, p)).collect();
    let mut impacts = Vec::new();

    for projectile in ring.iter() {
        let Some(own) = by_handle.get(&projectile.body) else {
            continue;
        };
        let point = own.position;

        if !point.is_finite() || !flight_bounds.contains_point(point) {
            impacts.push(Impact {
                serial: projectile.serial,
                body: projectile.body,
                target: ImpactTarget::OutOfBounds,
                point,
                normal: Vec3::ZERO,
                damage: None,
            });
            continue;
        }

        let hit = probes
            .iter()
            .filter(|other| other.handle != projectile.body && other.kind != BodyKind::Projectile)
            .find_map(|other| {
                let class = classify(other);
                if class == TargetClass::Pass || !other.touches_sphere(point, own.bounding_radius) {
                    return None;
                }
                Some((other, class))
            });

        let Some((other, class)) = hit else {
            continue;
        };

        let normal = other.contact_normal(point);
        let (target, damage) = match class {
            TargetClass::Agent { id, base_y } => {
                (ImpactTarget::Agent(id), Some(rules.damage_for_hit(point, base_y)))
            }
            TargetClass::World => (ImpactTarget::World(other.kind), None),
            TargetClass::Pass => continue,
        };

        impacts.push(Impact {
            serial: projectile.serial,
            body: projectile.body,
            target,
            point,
            normal,
            damage,
        });
    }

    impacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::ProjectileConfig;
    use horde_core::NodeId;
    use horde_physics::prelude::*;

    struct Arena {
        world: PhysicsWorld,
        ring: ProjectileRing,
    }

    const AGENT: Id = Id::new(7, 1);

    fn arena() -> Arena {
        let mut world = PhysicsWorld::default();
        world
            .create_body(RigidBodyDesc::fixed(BodyKind::Ground), ColliderDesc::new(ColliderShape::HalfSpace))
            .unwrap();
        world
            .create_body(
                RigidBodyDesc::kinematic(BodyKind::Agent).with_position(Vec3::new(0.0, 2.0, -10.0)),
                ColliderDesc::new(ColliderShape::cuboid(1.0, 2.0, 1.0)).with_user_data(AGENT.to_bits() as u128),
            )
            .unwrap();
        Arena {
            world,
            ring: ProjectileRing::new(50),
        }
    }

    fn shoot(arena: &mut Arena, at: Vec3) -> u64 {
        let body = arena
            .world
            .create_body(
                RigidBodyDesc::dynamic(BodyKind::Projectile).with_position(at),
                ColliderDesc::new(ColliderShape::sphere(0.02)),
            )
            .unwrap();
        arena.ring.push(body, NodeId(0), 0.0).0
    }

    fn classify(dying: bool) -> impl FnMut(&BodyProbe) -> TargetClass {
        move |probe| match probe.kind {
            BodyKind::Agent if dying => TargetClass::Pass,
            BodyKind::Agent => TargetClass::Agent {
                id: Id::from_bits(probe.user_data as u64),
                base_y: probe.position.y - 2.0,
            },
            _ => TargetClass::World,
        }
    }

    fn run(arena: &Arena, dying: bool) -> Vec<Impact> {
        let bounds = ProjectileConfig::default().flight_bounds();
        detect_impacts(&arena.ring, &arena.world.probes(), &DamageRules::default(), &bounds, classify(dying))
    }

    #[test]
    fn test_body_hit_on_agent() {
        let mut arena = arena();
        let serial = shoot(&mut arena, Vec3::new(0.0, 1.0, -9.5));
        let impacts = run(&arena, false);

        assert_eq!(impacts.len(), 1);
        assert_eq!(impacts[0].serial, serial);
        assert_eq!(impacts[0].target, ImpactTarget::Agent(AGENT));
        assert_eq!(impacts[0].damage.map(|d| d.final_amount()), Some(1));
        assert!(!impacts[0].is_headshot());
    }

    #[test]
    fn test_headshot_on_agent() {
        let mut arena = arena();
        shoot(&mut arena, Vec3::new(0.0, 2.8, -9.8));
        let impacts = run(&arena, false);

        assert_eq!(impacts.len(), 1);
        assert!(impacts[0].is_headshot());
        assert_eq!(impacts[0].damage.map(|d| d.final_amount()), Some(2));
    }

    #[test]
    fn test_dying_agent_is_skipped() {
        let mut arena = arena();
        shoot(&mut arena, Vec3::new(0.0, 1.0, -9.5));
        assert!(run(&arena, true).is_empty());
    }

    #[test]
    fn test_ground_hit() {
        let mut arena = arena();
        shoot(&mut arena, Vec3::new(50.0, 0.01, 50.0));
        let impacts = run(&arena, false);

        assert_eq!(impacts.len(), 1);
        assert_eq!(impacts[0].target, ImpactTarget::World(BodyKind::Ground));
        assert_eq!(impacts[0].normal, Vec3::Y);
        assert!(impacts[0].damage.is_none());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut arena = arena();
        shoot(&mut arena, Vec3::new(0.0, 5.0, 900.0));
        let impacts = run(&arena, false);
        assert_eq!(impacts[0].target, ImpactTarget::OutOfBounds);
    }

    #[test]
    fn test_projectiles_ignore_each_other_and_keep_order() {
        let mut arena = arena();
        let first = shoot(&mut arena, Vec3::new(20.0, 5.0, 20.0));
        shoot(&mut arena, Vec3::new(20.0, 5.0, 20.0));
        let third = shoot(&mut arena, Vec3::new(0.0, 1.0, -9.5));
        let fourth = shoot(&mut arena, Vec3::new(30.0, 0.0, 0.0));

        let impacts = run(&arena, false);
        let serials: Vec<u64> = impacts.iter().map(|i| i.serial).collect();
        assert_eq!(serials, vec![third, fourth]);
        assert!(!serials.contains(&first));
    }
}

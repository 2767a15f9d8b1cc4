//! Steering behaviors

use glam::Vec3;
use horde_core::{flatten, Aabb};
use serde::{Deserialize, Serialize};

/// Tunables for obstacle avoidance and peer separation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Side of the cube around the agent used to find nearby obstacles
    pub probe_side: f32,
    /// Distance to an obstacle's surface below which it pushes back
    pub minimum_separation: f32,
    /// Push strength per unit of penetration into the separation zone
    pub avoidance_strength: f32,
    /// Half-extent of the agent's own box for the candidate-move test
    pub body_half_extent: f32,
    /// Weight of the sideways slide around obstacles ahead
    pub slide_weight: f32,
    /// Peers closer than this get pushed apart
    pub peer_radius: f32,
    /// Peer push distance per second, per close peer
    pub peer_push: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            probe_side: 3.0,
            minimum_separation: 2.0,
            avoidance_strength: 10.0,
            body_half_extent: 0.5,
            slide_weight: 1.0,
            peer_radius: 10.0,
            peer_push: 6.0,
        }
    }
}

impl SteeringConfig {
    pub fn with_avoidance(mut self, minimum_separation: f32, strength: f32) -> Self {
        self.minimum_separation = minimum_separation;
        self.avoidance_strength = strength;
        self
    }

    pub fn with_peer_separation(mut self, radius: f32, push: f32) -> Self {
        self.peer_radius = radius;
        self.peer_push = push;
        self
    }
}

/// Result of one avoidance step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SteeringOutcome {
    /// Displacement to apply this frame
    Move(Vec3),
    /// The candidate position overlaps an obstacle; hold position
    Blocked,
    /// No usable direction (zero or non-finite); hold position
    Degenerate,
}

impl SteeringOutcome {
    /// Displacement to apply, zero unless moving
    pub fn displacement(&self) -> Vec3 {
        match self {
            Self::Move(step) => *step,
            Self::Blocked | Self::Degenerate => Vec3::ZERO,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Self::Move(_))
    }
}

/// Compute an obstacle-avoiding displacement.
///
/// Obstacles touching a probe cube around `position` push the agent away
/// from their closest point, scaled by how deep it sits inside the
/// separation zone. Obstacles ahead also add a sideways slide so a head-on
/// block is walked around instead of pushed straight back. The blended
/// direction is re-normalized and the candidate position is rejected if the
/// agent's box would overlap any obstacle there.
pub fn compute_avoidance(
    position: Vec3,
    desired_direction: Vec3,
    obstacles: &[Aabb],
    speed: f32,
    dt: f32,
    config: &SteeringConfig,
) -> SteeringOutcome {
    let Some(desired) = desired_direction.try_normalize() else {
        return SteeringOutcome::Degenerate;
    };

    let probe = Aabb::cube(position, config.probe_side);
    let mut force = Vec3::ZERO;
    let mut pushed = false;

    for obstacle in obstacles.iter().filter(|o| probe.intersects(o)) {
        let closest = obstacle.closest_point(position);
        let offset = flatten(position - closest);
        let distance = offset.length();

        let Some(away) = offset
            .try_normalize()
            .or_else(|| flatten(position - obstacle.center()).try_normalize())
        else {
            continue;
        };

        let magnitude = (config.minimum_separation - distance).max(0.0) * config.avoidance_strength;
        if magnitude <= 0.0 {
            continue;
        }

        force += away * magnitude;
        pushed = true;

        let facing = away.dot(desired);
        if facing < 0.0 {
            force += slide_direction(desired, obstacle.center() - position)
                * magnitude
                * config.slide_weight
                * -facing;
        }
    }

    let direction = if pushed {
        (desired + force).try_normalize()
    } else {
        Some(desired)
    };
    let Some(direction) = direction else {
        return SteeringOutcome::Degenerate;
    };

    let step = direction * speed * dt;
    if !step.is_finite() {
        return SteeringOutcome::Degenerate;
    }

    if is_clear(position + step, obstacles, config.body_half_extent) {
        SteeringOutcome::Move(step)
    } else {
        SteeringOutcome::Blocked
    }
}

/// Ground-plane perpendicular to `desired` on the side away from `to_center`.
///
/// Ties go to the right-hand side.
fn slide_direction(desired: Vec3, to_center: Vec3) -> Vec3 {
    let right = flatten(Vec3::new(-desired.z, 0.0, desired.x))
        .try_normalize()
        .unwrap_or(Vec3::X);
    if right.dot(flatten(to_center)) > 0.0 {
        -right
    } else {
        right
    }
}

/// Check that a box of `half_extent` at `position` overlaps no obstacle
pub fn is_clear(position: Vec3, obstacles: &[Aabb], half_extent: f32) -> bool {
    let body = Aabb::from_center_half_extents(position, Vec3::splat(half_extent));
    !obstacles.iter().any(|o| body.intersects(o))
}

/// Sum of pushes away from every peer within `radius`.
///
/// Each close peer contributes `push` along the ground-plane separating
/// axis. Coincident peers have no axis and are skipped.
pub fn separation_offset<I>(position: Vec3, peers: I, radius: f32, push: f32) -> Vec3
where
    I: IntoIterator<Item = Vec3>,
{
    peers
        .into_iter()
        .filter(|peer| peer.distance(position) < radius)
        .filter_map(|peer| flatten(position - peer).try_normalize())
        .map(|away| away * push)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_open_field_goes_straight() {
        let config = SteeringConfig::default();
        let outcome = compute_avoidance(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), &[], 3.0, DT, &config);
        let step = outcome.displacement();
        assert_relative_eq!(step.x, 3.0 * DT, epsilon = 1e-6);
        assert_relative_eq!(step.z, 0.0);
    }

    #[test]
    fn test_head_on_obstacle_deflects_sideways() {
        let config = SteeringConfig::default();
        // Box directly ahead on +X, surface 1 unit away
        let wall = Aabb::new(Vec3::new(1.0, 0.0, -1.0), Vec3::new(3.0, 4.0, 1.0));
        let outcome = compute_avoidance(Vec3::ZERO, Vec3::X, &[wall], 3.0, DT, &config);

        assert!(outcome.is_move());
        let step = outcome.displacement();
        assert!(step.z.abs() > 1e-4, "expected a sideways component, got {step:?}");
        assert!(step.is_finite());
    }

    #[test]
    fn test_slide_prefers_side_away_from_center() {
        let config = SteeringConfig::default();
        // Obstacle ahead but centred to the left (+Z is right-hand of +X)
        let wall = Aabb::new(Vec3::new(1.0, 0.0, -0.5), Vec3::new(3.0, 4.0, 4.0));
        let step = compute_avoidance(Vec3::ZERO, Vec3::X, &[wall], 3.0, DT, &config).displacement();
        assert!(step.z < 0.0);
    }

    #[test]
    fn test_weak_avoidance_only_nudges() {
        let wall = Aabb::new(Vec3::new(1.0, 0.0, -1.0), Vec3::new(3.0, 4.0, 1.0));
        let strong = SteeringConfig::default();
        let weak = SteeringConfig::default().with_avoidance(2.0, 0.1);

        let push = |config: &SteeringConfig| {
            compute_avoidance(Vec3::ZERO, Vec3::X, &[wall], 3.0, DT, config)
                .displacement()
                .z
                .abs()
        };
        assert!(push(&weak) < push(&strong));
    }

    #[test]
    fn test_far_obstacle_is_ignored() {
        let config = SteeringConfig::default();
        let wall = Aabb::new(Vec3::new(10.0, 0.0, -1.0), Vec3::new(12.0, 4.0, 1.0));
        let step = compute_avoidance(Vec3::ZERO, Vec3::X, &[wall], 3.0, DT, &config).displacement();
        assert_relative_eq!(step.z, 0.0);
        assert!(step.x > 0.0);
    }

    #[test]
    fn test_move_into_obstacle_is_blocked() {
        let config = SteeringConfig::default();
        // Just outside the probe, but inside the reach of one large step
        let wall = Aabb::new(Vec3::new(1.6, 0.0, -5.0), Vec3::new(3.0, 4.0, 5.0));
        let outcome = compute_avoidance(Vec3::ZERO, Vec3::X, &[wall], 90.0, DT, &config);
        assert_eq!(outcome, SteeringOutcome::Blocked);
        assert_eq!(outcome.displacement(), Vec3::ZERO);
    }

    #[test]
    fn test_zero_direction_is_degenerate() {
        let config = SteeringConfig::default();
        assert_eq!(
            compute_avoidance(Vec3::ZERO, Vec3::ZERO, &[], 3.0, DT, &config),
            SteeringOutcome::Degenerate
        );
        assert_eq!(
            compute_avoidance(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 1.0), &[], 3.0, DT, &config),
            SteeringOutcome::Degenerate
        );
    }

    #[test]
    fn test_never_produces_nan() {
        let config = SteeringConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..500 {
            let center = Vec3::new(rng.gen_range(-3.0..3.0), 0.0, rng.gen_range(-3.0..3.0));
            let half = Vec3::new(rng.gen_range(0.1..2.0), 2.0, rng.gen_range(0.1..2.0));
            let obstacle = Aabb::from_center_half_extents(center, half);
            let desired = Vec3::new(rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(-1.0..1.0));
            let outcome = compute_avoidance(Vec3::ZERO, desired, &[obstacle], 3.0, DT, &config);
            assert!(outcome.displacement().is_finite());
        }
    }

    #[test]
    fn test_separation_pushes_apart() {
        let peers = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(50.0, 0.0, 0.0)];
        let offset = separation_offset(Vec3::ZERO, peers, 10.0, 2.0);
        assert_relative_eq!(offset.x, -2.0);
        assert_relative_eq!(offset.z, 0.0);
    }

    #[test]
    fn test_peer_separation_settings() {
        let config = SteeringConfig::default().with_peer_separation(4.0, 1.5);
        let peers = [Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 5.0)];
        let offset = separation_offset(Vec3::ZERO, peers, config.peer_radius, config.peer_push);
        assert_relative_eq!(offset.x, -1.5);
        assert_relative_eq!(offset.z, 0.0);
    }

    #[test]
    fn test_separation_skips_coincident_peer() {
        let offset = separation_offset(Vec3::ZERO, [Vec3::ZERO], 10.0, 1.0);
        assert_eq!(offset, Vec3::ZERO);
    }

    #[test]
    fn test_is_clear() {
        let wall = Aabb::new(Vec3::new(1.0, 0.0, -1.0), Vec3::new(2.0, 4.0, 1.0));
        assert!(is_clear(Vec3::ZERO, &[wall], 0.5));
        assert!(!is_clear(Vec3::new(0.6, 0.0, 0.0), &[wall], 0.5));
    }
}

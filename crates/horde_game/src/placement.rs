//! Rejection-sampling placement
//!
//! Candidates are drawn uniformly over the play field and rejected when they
//! sit inside an exclusion radius or when a margin-expanded box around them
//! touches an obstacle. Attempts are bounded; running out is logged and the
//! partial result returned.

use glam::Vec3;
use horde_core::{ground_distance, Aabb};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Size of the arena and the density of what gets put in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Extent along x; the field is centred on the origin
    pub width: f32,
    /// Extent along z
    pub length: f32,
    pub ground_y: f32,
    /// Agents per unit of width per level
    pub agent_density: f32,
    /// Trees per unit of width
    pub tree_density: f32,
    /// Structures per unit of width
    pub structure_density: f32,
    /// Candidate attempts allowed per requested item
    pub attempts_per_target: usize,
    /// No agent spawns closer than this to the player
    pub agent_exclusion_radius: f32,
    /// Half-size of the box kept clear around a spawned agent or player
    pub spawn_clearance: f32,
    /// Fraction of the field around the centre the player may spawn in
    pub player_spawn_fraction: f32,
    pub player_spawn_attempts: usize,
    /// Eye height of the player above the ground
    pub player_height: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
    pub tree_height: [f32; 2],
    pub tree_radius: [f32; 2],
    pub structures: StructureSpec,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            length: 600.0,
            ground_y: 0.0,
            agent_density: 0.02,
            tree_density: 0.05,
            structure_density: 0.01,
            attempts_per_target: 10,
            agent_exclusion_radius: 50.0,
            spawn_clearance: 2.0,
            player_spawn_fraction: 0.2,
            player_spawn_attempts: 100,
            player_height: 3.0,
            wall_height: 30.0,
            wall_thickness: 1.0,
            tree_height: [25.0, 45.0],
            tree_radius: [2.5, 6.0],
            structures: StructureSpec::default(),
        }
    }
}

impl FieldConfig {
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    pub fn half_length(&self) -> f32 {
        self.length * 0.5
    }

    /// Number of agents for a level
    pub fn agent_count(&self, level: u32) -> usize {
        (self.width * self.agent_density * level as f32).round().max(0.0) as usize
    }

    pub fn tree_count(&self) -> usize {
        (self.width * self.tree_density).round().max(0.0) as usize
    }

    pub fn structure_count(&self) -> usize {
        (self.width * self.structure_density).round().max(0.0) as usize
    }

    /// Uniform point on the ground inside the field
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            sample(rng, -self.half_width(), self.half_width()),
            self.ground_y,
            sample(rng, -self.half_length(), self.half_length()),
        )
    }
}

/// Structure dimensions and door opening
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureSpec {
    pub width: [f32; 2],
    pub depth: [f32; 2],
    pub height: [f32; 2],
    /// Clearance kept around each structure
    pub margin: f32,
    /// Height of the candidate test box
    pub clearance_height: f32,
    pub wall_thickness: f32,
    pub door_width: f32,
    pub door_height: f32,
}

impl Default for StructureSpec {
    fn default() -> Self {
        Self {
            width: [25.0, 40.0],
            depth: [20.0, 35.0],
            height: [35.0, 50.0],
            margin: 5.0,
            clearance_height: 100.0,
            wall_thickness: 1.0,
            door_width: 15.0,
            door_height: 25.0,
        }
    }
}

/// Outcome of an agent or structure placement run
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport {
    pub positions: Vec<Vec3>,
    pub requested: usize,
    pub attempts: usize,
}

impl PlacementReport {
    pub fn placed(&self) -> usize {
        self.positions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.positions.len() >= self.requested
    }
}

/// An accepted structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureFootprint {
    /// Centre of the floor
    pub center: Vec3,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl StructureFootprint {
    /// Box covering the whole structure
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.center - Vec3::new(self.width * 0.5, 0.0, self.depth * 0.5),
            self.center + Vec3::new(self.width * 0.5, self.height, self.depth * 0.5),
        )
    }

    /// Centre and half-extents of each wall and the roof.
    ///
    /// Side walls, a back wall, a front wall split around a door opening,
    /// and a roof slab.
    pub fn wall_boxes(&self, spec: &StructureSpec) -> Vec<(Vec3, Vec3)> {
        let (w, d, h) = (self.width, self.depth, self.height);
        let t = spec.wall_thickness;
        let door_w = spec.door_width.min(w - 2.0 * t).max(0.0);
        let door_h = spec.door_height.min(h).max(0.0);
        let c = self.center;
        let front_z = d * 0.5 - t * 0.5;
        let side_w = (w - door_w) * 0.25;

        let mut walls = vec![
            (c + Vec3::new(-w * 0.5, h * 0.5, 0.0), Vec3::new(t * 0.5, h * 0.5, d * 0.5)),
            (c + Vec3::new(w * 0.5, h * 0.5, 0.0), Vec3::new(t * 0.5, h * 0.5, d * 0.5)),
            (c + Vec3::new(0.0, h * 0.5, -front_z), Vec3::new(w * 0.5, h * 0.5, t * 0.5)),
            (
                c + Vec3::new(-(w * 0.25 + door_w * 0.25), door_h * 0.5, front_z),
                Vec3::new(side_w, door_h * 0.5, t * 0.5),
            ),
            (
                c + Vec3::new(w * 0.25 + door_w * 0.25, door_h * 0.5, front_z),
                Vec3::new(side_w, door_h * 0.5, t * 0.5),
            ),
            (c + Vec3::new(0.0, h - 0.5, 0.0), Vec3::new(w * 0.5, 0.5, d * 0.5)),
        ];
        if h > door_h {
            walls.push((
                c + Vec3::new(0.0, (h + door_h) * 0.5, front_z),
                Vec3::new(w * 0.5, (h - door_h) * 0.5, t * 0.5),
            ));
        }
        walls
    }
}

/// Outcome of a structure placement run
#[derive(Debug, Clone, PartialEq)]
pub struct StructurePlacement {
    pub structures: Vec<StructureFootprint>,
    pub requested: usize,
    pub attempts: usize,
}

/// Where the player starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec3,
    /// False when every attempt was blocked and the last candidate was kept
    pub clear: bool,
}

/// Box kept clear around a ground point
pub fn clearance_box(position: Vec3, clearance: f32) -> Aabb {
    Aabb::cube(position, clearance * 2.0)
}

fn is_free(candidate: &Aabb, obstacles: &[Aabb]) -> bool {
    !obstacles.iter().any(|o| candidate.intersects(o))
}

fn sample<R: Rng>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Place up to `count` agents.
///
/// A candidate is rejected within `exclude_radius` (ground distance) of
/// `exclude_center`, or when its clearance box touches an obstacle. Agents
/// do not block each other.
pub fn place_agents<R: Rng>(
    rng: &mut R,
    field: &FieldConfig,
    count: usize,
    exclude_center: Vec3,
    exclude_radius: f32,
    clearance: f32,
    obstacles: &[Aabb],
) -> PlacementReport {
    let max_attempts = count.saturating_mul(field.attempts_per_target);
    let mut positions = Vec::with_capacity(count);
    let mut attempts = 0;

    while positions.len() < count && attempts < max_attempts {
        attempts += 1;
        let candidate = field.random_point(rng);
        if ground_distance(candidate, exclude_center) < exclude_radius {
            continue;
        }
        if !is_free(&clearance_box(candidate, clearance), obstacles) {
            continue;
        }
        positions.push(candidate);
    }

    if positions.len() < count {
        log::warn!(
            "placed {} of {} agents after {} attempts",
            positions.len(),
            count,
            attempts
        );
    }

    PlacementReport {
        positions,
        requested: count,
        attempts,
    }
}

/// Place up to `count` structures.
///
/// Each accepted footprint blocks later candidates.
pub fn place_structures<R: Rng>(
    rng: &mut R,
    field: &FieldConfig,
    count: usize,
    obstacles: &[Aabb],
    spec: &StructureSpec,
) -> StructurePlacement {
    let max_attempts = count.saturating_mul(field.attempts_per_target);
    let mut blocked = obstacles.to_vec();
    let mut structures = Vec::with_capacity(count);
    let mut attempts = 0;

    while structures.len() < count && attempts < max_attempts {
        attempts += 1;
        let center = field.random_point(rng);
        let footprint = StructureFootprint {
            center,
            width: sample(rng, spec.width[0], spec.width[1]),
            depth: sample(rng, spec.depth[0], spec.depth[1]),
            height: sample(rng, spec.height[0], spec.height[1]),
        };

        let half = Vec3::new(footprint.width * 0.5 + spec.margin, 0.0, footprint.depth * 0.5 + spec.margin);
        let candidate = Aabb::new(
            center - half,
            center + half + Vec3::Y * spec.clearance_height,
        );
        if !is_free(&candidate, &blocked) {
            continue;
        }

        blocked.push(footprint.bounds());
        structures.push(footprint);
    }

    if structures.len() < count {
        log::warn!(
            "placed {} of {} structures after {} attempts",
            structures.len(),
            count,
            attempts
        );
    }

    StructurePlacement {
        structures,
        requested: count,
        attempts,
    }
}

/// Find a clear spawn point near the centre of the field.
///
/// Falls back to the last candidate when every attempt is blocked.
pub fn place_player<R: Rng>(
    rng: &mut R,
    field: &FieldConfig,
    clearance: f32,
    obstacles: &[Aabb],
) -> SpawnPoint {
    let reach_x = field.half_width() * field.player_spawn_fraction;
    let reach_z = field.half_length() * field.player_spawn_fraction;
    let mut position = Vec3::new(0.0, field.ground_y, 0.0);

    for _ in 0..field.player_spawn_attempts.max(1) {
        position = Vec3::new(sample(rng, -reach_x, reach_x), field.ground_y, sample(rng, -reach_z, reach_z));
        if is_free(&clearance_box(position, clearance), obstacles) {
            return SpawnPoint {
                position: position + Vec3::Y * field.player_height,
                clear: true,
            };
        }
    }

    log::warn!("no clear spawn point near the centre, using {:?}", position);
    SpawnPoint {
        position: position + Vec3::Y * field.player_height,
        clear: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn random_obstacles(rng: &mut SmallRng, count: usize) -> Vec<Aabb> {
        (0..count)
            .map(|_| {
                let center = Vec3::new(rng.gen_range(-280.0..280.0), 10.0, rng.gen_range(-280.0..280.0));
                let half = Vec3::new(rng.gen_range(1.0..20.0), 10.0, rng.gen_range(1.0..20.0));
                Aabb::from_center_half_extents(center, half)
            })
            .collect()
    }

    #[test]
    fn test_agents_never_overlap_obstacles() {
        let field = FieldConfig::default();
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let obstacles = random_obstacles(&mut rng, 40);
            let report = place_agents(&mut rng, &field, 30, Vec3::ZERO, 50.0, 2.0, &obstacles);

            for p in &report.positions {
                let footprint = clearance_box(*p, 2.0);
                assert!(obstacles.iter().all(|o| !footprint.intersects(o)), "seed {seed}: {p:?}");
                assert!(ground_distance(*p, Vec3::ZERO) >= 50.0);
                assert!(p.x.abs() <= 300.0 && p.z.abs() <= 300.0);
            }
        }
    }

    #[test]
    fn test_exhaustion_returns_partial() {
        let field = FieldConfig::default();
        let everything = vec![Aabb::new(Vec3::splat(-1000.0), Vec3::splat(1000.0))];
        let mut rng = SmallRng::seed_from_u64(7);

        let report = place_agents(&mut rng, &field, 5, Vec3::ZERO, 0.0, 2.0, &everything);
        assert_eq!(report.placed(), 0);
        assert_eq!(report.attempts, 50);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_structures_do_not_overlap_each_other() {
        let field = FieldConfig::default();
        let spec = StructureSpec::default();
        let mut rng = SmallRng::seed_from_u64(3);

        let placement = place_structures(&mut rng, &field, 6, &[], &spec);
        assert!(placement.attempts <= 60);
        for (i, a) in placement.structures.iter().enumerate() {
            for b in placement.structures.iter().skip(i + 1) {
                assert!(!a.bounds().intersects(&b.bounds()));
            }
        }
    }

    #[test]
    fn test_wall_boxes_leave_a_door() {
        let spec = StructureSpec::default();
        let footprint = StructureFootprint {
            center: Vec3::new(100.0, 0.0, 100.0),
            width: 30.0,
            depth: 20.0,
            height: 40.0,
        };
        let walls: Vec<Aabb> = footprint
            .wall_boxes(&spec)
            .into_iter()
            .map(|(c, h)| Aabb::from_center_half_extents(c, h))
            .collect();
        assert_eq!(walls.len(), 7);

        let doorway = Vec3::new(100.0, 1.0, 110.0 - 0.5);
        assert!(walls.iter().all(|w| !w.contains_point(doorway)));
        let beside_door = Vec3::new(90.0, 1.0, 110.0 - 0.5);
        assert!(walls.iter().any(|w| w.contains_point(beside_door)));
        assert!(walls.iter().all(|w| footprint.bounds().expand(0.6).contains_point(w.center())));
    }

    #[test]
    fn test_player_spawn_near_centre() {
        let field = FieldConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let spawn = place_player(&mut rng, &field, 1.0, &[]);
        assert!(spawn.clear);
        assert!(spawn.position.x.abs() <= 60.0 && spawn.position.z.abs() <= 60.0);
        assert_eq!(spawn.position.y, 3.0);
    }

    #[test]
    fn test_counts_scale_with_width() {
        let field = FieldConfig::default();
        assert_eq!(field.agent_count(1), 12);
        assert_eq!(field.agent_count(3), 36);
        assert_eq!(field.tree_count(), 30);
        assert_eq!(field.structure_count(), 6);
    }
}

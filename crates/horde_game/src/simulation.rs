//! The simulation context
//!
//! [`Simulation`] owns the physics world, every agent and projectile, the
//! deferred-task scheduler and the level state, and drives them one frame at
//! a time from [`Simulation::tick`]. It is single-threaded; a frame runs in
//! this order:
//!
//! 1. physics step
//! 2. body-to-node sync for physics-driven bodies
//! 3. due deferred tasks (fades, removals)
//! 4. agents, against a snapshot of their peers taken before the loop
//! 5. projectile impacts, collected first and applied after
//! 6. power-ups, weapon reload, level timer
//! 7. hook dispatch

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::hooks::{GameEvent, GameHooks, SubscriberId};
use crate::level::LevelProgress;
use crate::placement::{place_agents, place_player, place_structures, PlacementReport, SpawnPoint};
use crate::powerup::{PowerUp, PowerUpKind};
use crate::scene::{AssetProvider, AudioSink, Primitive, RenderScene};
use crate::scheduler::{DeferredTask, Scheduler};
use crate::sync::{BodyVisualMap, SyncMode};
use crate::zombie::{AgentEnv, AgentFrame, ShotOutcome, Zombie};
use glam::{Quat, Vec3};
use horde_combat::{
    detect_impacts, DamageInfo, FireDecision, Impact, ImpactTarget, LifeBand, LifePool, Projectile,
    ProjectileRing, TargetClass, Weapon,
};
use horde_core::{ground_distance, Aabb, Id, IdGenerator, NodeId, SoundHandle};
use horde_physics::{
    BodyKind, BodyProbe, ColliderDesc, ColliderShape, PhysicsMaterial, PhysicsWorld, RigidBodyDesc,
    RigidBodyHandle,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Borrow the pieces of the simulation an agent touches, leaving the agent
/// list itself free to iterate.
macro_rules! agent_env {
    ($sim:ident) => {
        AgentEnv {
            physics: &mut $sim.physics,
            scene: &mut $sim.scene,
            audio: &mut $sim.audio,
            scheduler: &mut $sim.scheduler,
            links: &mut $sim.links,
        }
    };
}

/// What one call to [`Simulation::tick`] did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Simulation clock after the tick
    pub time: f64,
    pub substeps: u32,
    pub impacts: Vec<Impact>,
    /// Agents that started dying this tick
    pub killed: Vec<Id>,
    /// Agents removed from the world this tick
    pub removed: Vec<Id>,
    pub player_damage: f32,
    /// Events delivered to subscribers
    pub events: Vec<GameEvent>,
}

/// Result of pulling the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotReport {
    pub decision: FireDecision,
    /// Serial of the projectile created, if one was
    pub serial: Option<u64>,
    /// Serial of the projectile evicted to make room
    pub evicted: Option<u64>,
}

/// What [`Simulation::build_level`] put in the world
#[derive(Debug, Clone, PartialEq)]
pub struct LevelReport {
    pub level: u32,
    pub player: SpawnPoint,
    pub agents: PlacementReport,
    pub trees: usize,
    pub structures: usize,
    pub power_ups: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct PlayerSounds {
    gunshot: Option<SoundHandle>,
    reload: Option<SoundHandle>,
    empty: Option<SoundHandle>,
    scream: Option<SoundHandle>,
}

/// One static piece of arena geometry
#[derive(Debug, Clone, Copy)]
struct StaticBody {
    body: RigidBodyHandle,
    node: NodeId,
}

/// The world and everything in it
pub struct Simulation<S: RenderScene, A: AudioSink> {
    config: GameConfig,
    physics: PhysicsWorld,
    scene: S,
    audio: A,
    links: BodyVisualMap,
    scheduler: Scheduler,
    hooks: GameHooks,
    rng: SmallRng,
    ids: IdGenerator,

    zombies: Vec<Zombie>,
    obstacles: Vec<Aabb>,
    statics: Vec<StaticBody>,
    projectiles: ProjectileRing,
    power_ups: Vec<PowerUp>,

    weapon: Weapon,
    life: LifePool,
    progress: LevelProgress,
    player_position: Vec3,
    player_move_speed: f32,
    agent_speed: f32,
    sounds: PlayerSounds,
    scream_playing: bool,
    clock: f64,
}

impl<S: RenderScene, A: AudioSink> Simulation<S, A> {
    /// Create an empty world. Call [`build_level`](Self::build_level) to populate it
    pub fn new(config: GameConfig, scene: S, mut audio: A) -> Result<Self> {
        config.validate()?;

        let mut load = |path: &Option<String>| {
            let path = path.as_deref()?;
            let sound = audio.load(path);
            if sound.is_none() {
                log::warn!("sound {} failed to load", path);
            }
            sound
        };
        let sounds = PlayerSounds {
            gunshot: load(&config.combat.gunshot_sound),
            reload: load(&config.combat.reload_sound),
            empty: load(&config.combat.empty_sound),
            scream: load(&config.combat.scream_sound),
        };

        let progress = LevelProgress::new(1, &config.level);
        log::info!("simulation created, seed {}", config.seed);
        Ok(Self {
            physics: PhysicsWorld::new(config.physics.clone()),
            scene,
            audio,
            links: BodyVisualMap::new(),
            scheduler: Scheduler::new(),
            hooks: GameHooks::new(),
            rng: SmallRng::seed_from_u64(config.seed),
            ids: IdGenerator::new(),
            zombies: Vec::new(),
            obstacles: Vec::new(),
            statics: Vec::new(),
            projectiles: ProjectileRing::new(config.combat.projectiles.capacity),
            power_ups: Vec::new(),
            weapon: Weapon::new(config.combat.weapon.clone(), progress.level),
            life: LifePool::new(config.combat.player_max_life),
            progress,
            player_position: Vec3::new(0.0, config.field.ground_y + config.field.player_height, 0.0),
            player_move_speed: config.combat.player_move_speed,
            agent_speed: config.agents.speed,
            sounds,
            scream_playing: false,
            clock: 0.0,
            config,
        })
    }

    // ==================== Level construction ====================

    /// Tear down whatever is in the world and build the current level
    pub fn build_level(&mut self, assets: &mut dyn AssetProvider) -> Result<LevelReport> {
        self.clear_level();
        let field = self.config.field.clone();
        let level = self.progress.level;

        self.add_static(
            BodyKind::Ground,
            Vec3::Y * field.ground_y,
            ColliderShape::HalfSpace,
            Primitive::Plane,
            [0.3, 0.45, 0.25],
            None,
        )?;

        let (hw, hl) = (field.half_width(), field.half_length());
        let (wall_h, wall_t) = (field.wall_height * 0.5, field.wall_thickness * 0.5);
        let walls = [
            (Vec3::new(0.0, wall_h, -hl), Vec3::new(hw, wall_h, wall_t)),
            (Vec3::new(0.0, wall_h, hl), Vec3::new(hw, wall_h, wall_t)),
            (Vec3::new(-hw, wall_h, 0.0), Vec3::new(wall_t, wall_h, hl)),
            (Vec3::new(hw, wall_h, 0.0), Vec3::new(wall_t, wall_h, hl)),
        ];
        for (center, half) in walls {
            self.add_box(BodyKind::Wall, center + Vec3::Y * field.ground_y, half, [0.5, 0.5, 0.55])?;
        }

        let trees = field.tree_count();
        for _ in 0..trees {
            let base = field.random_point(&mut self.rng);
            let height = sample(&mut self.rng, field.tree_height);
            let radius = sample(&mut self.rng, field.tree_radius);
            let half = Vec3::new(radius, height * 0.5, radius);
            let center = base + Vec3::Y * half.y;
            self.add_static(
                BodyKind::Tree,
                center,
                ColliderShape::cylinder(half.y, radius),
                Primitive::Cylinder {
                    half_height: half.y,
                    radius,
                },
                [0.35, 0.25, 0.15],
                Some(Aabb::from_center_half_extents(center, half)),
            )?;
        }

        let placement = place_structures(
            &mut self.rng,
            &field,
            field.structure_count(),
            &self.obstacles,
            &field.structures,
        );
        for footprint in &placement.structures {
            for (center, half) in footprint.wall_boxes(&field.structures) {
                self.add_box(BodyKind::Structure, center, half, [0.6, 0.55, 0.5])?;
            }
            let kind = PowerUpKind::random(&mut self.rng);
            let position = Vec3::new(
                footprint.center.x,
                field.ground_y + footprint.height * self.config.power_ups.height_fraction,
                footprint.center.z,
            );
            let node = self.scene.create_primitive(Primitive::PowerUp, kind.color());
            self.scene.attach(node);
            self.scene.set_transform(node, position, Quat::IDENTITY);
            self.power_ups.push(PowerUp::new(kind, position, node));
        }

        let player = place_player(&mut self.rng, &field, field.spawn_clearance, &self.obstacles);
        self.player_position = player.position;

        let agents = place_agents(
            &mut self.rng,
            &field,
            field.agent_count(level),
            player.position,
            field.agent_exclusion_radius,
            field.spawn_clearance,
            &self.obstacles,
        );
        for position in &agents.positions {
            self.spawn_agent(*position, assets)?;
        }

        log::info!(
            "level {} built: {} agents, {} trees, {} structures",
            level,
            agents.placed(),
            trees,
            placement.structures.len()
        );
        Ok(LevelReport {
            level,
            player,
            agents,
            trees,
            structures: placement.structures.len(),
            power_ups: self.power_ups.len(),
        })
    }

    /// Release every body and node the world holds
    pub fn clear_level(&mut self) {
        {
            let mut env = agent_env!(self);
            for zombie in &mut self.zombies {
                zombie.remove(&mut env);
            }
        }
        self.zombies.clear();

        for projectile in self.projectiles.drain() {
            self.release(projectile);
        }
        for piece in self.statics.drain(..) {
            self.links.remove(piece.body);
            self.physics.remove_body(piece.body);
            self.scene.detach(piece.node);
        }
        for power_up in self.power_ups.drain(..) {
            self.scene.detach(power_up.node);
        }
        self.obstacles.clear();
        self.scheduler.clear();
    }

    fn add_box(&mut self, kind: BodyKind, center: Vec3, half: Vec3, color: [f32; 3]) -> Result<()> {
        self.add_static(
            kind,
            center,
            ColliderShape::cuboid(half.x, half.y, half.z),
            Primitive::Box { half_extents: half },
            color,
            Some(Aabb::from_center_half_extents(center, half)),
        )
    }

    fn add_static(
        &mut self,
        kind: BodyKind,
        position: Vec3,
        shape: ColliderShape,
        primitive: Primitive,
        color: [f32; 3],
        obstacle: Option<Aabb>,
    ) -> Result<()> {
        let body = self.physics.create_body(
            RigidBodyDesc::fixed(kind).with_position(position),
            ColliderDesc::new(shape).with_material(PhysicsMaterial::terrain()),
        )?;
        let node = self.scene.create_primitive(primitive, color);
        self.scene.attach(node);
        self.scene.set_transform(node, position, Quat::IDENTITY);
        self.links.insert(body, node, SyncMode::PhysicsDriven);
        self.statics.push(StaticBody { body, node });
        if let Some(bounds) = obstacle {
            self.obstacles.push(bounds);
        }
        Ok(())
    }

    /// Spawn one agent at a ground position
    pub fn spawn_agent(&mut self, position: Vec3, assets: &mut dyn AssetProvider) -> Result<Id> {
        let id = self.ids.next();
        let mut env = agent_env!(self);
        let zombie = Zombie::spawn(
            id,
            position,
            self.agent_speed,
            &self.config.agents,
            assets,
            &mut self.rng,
            &mut env,
        )?;
        self.zombies.push(zombie);
        Ok(id)
    }

    // ==================== Player input ====================

    /// Pull the trigger.
    ///
    /// A zero or non-finite direction is rejected before any ammunition is
    /// used. A fired shot alerts nearby agents.
    pub fn fire(&mut self, origin: Vec3, direction: Vec3) -> Result<ShotReport> {
        let (spawn, velocity) = self
            .config
            .combat
            .projectiles
            .launch(origin, direction)
            .ok_or(GameError::DegenerateAim)?;

        let decision = self.weapon.try_fire();
        let idle = ShotReport {
            decision,
            serial: None,
            evicted: None,
        };
        match decision {
            FireDecision::Fired => {}
            FireDecision::Empty => {
                play(&mut self.audio, self.sounds.empty);
                return Ok(idle);
            }
            FireDecision::Reloading => return Ok(idle),
        }
        play(&mut self.audio, self.sounds.gunshot);
        self.publish_ammo();

        let projectiles = &self.config.combat.projectiles;
        let body = self.physics.create_body(
            RigidBodyDesc::dynamic(BodyKind::Projectile)
                .with_position(spawn)
                .with_linear_velocity(velocity)
                .with_linear_damping(projectiles.linear_damping)
                .with_ccd(true),
            ColliderDesc::new(ColliderShape::sphere(projectiles.radius))
                .with_material(PhysicsMaterial::pellet())
                .with_mass(projectiles.mass),
        )?;
        let node = self.scene.create_primitive(
            Primitive::Sphere {
                radius: projectiles.radius,
            },
            self.config.combat.projectile_color,
        );
        self.scene.attach(node);
        self.scene.set_transform(node, spawn, Quat::IDENTITY);
        self.links.insert(body, node, SyncMode::PhysicsDriven);

        let (serial, evicted) = self.projectiles.push(body, node, self.clock);
        let evicted = evicted.map(|old| {
            let serial = old.serial;
            self.release(old);
            serial
        });

        self.alert_noise(origin);
        Ok(ShotReport {
            decision,
            serial: Some(serial),
            evicted,
        })
    }

    /// Start a reload. Returns false when full or already reloading
    pub fn reload(&mut self) -> bool {
        if !self.weapon.reload() {
            return false;
        }
        play(&mut self.audio, self.sounds.reload);
        true
    }

    /// Alert every live agent within the noise radius of `origin`
    pub fn alert_noise(&mut self, origin: Vec3) -> usize {
        let radius = self.config.agents.noise_radius;
        let duration = self.config.agents.alert_duration;
        let mut alerted = 0;
        for zombie in &mut self.zombies {
            if ground_distance(zombie.position(), origin) <= radius && zombie.raise_alert(self.clock, duration) {
                alerted += 1;
            }
        }
        alerted
    }

    pub fn set_player_position(&mut self, position: Vec3) {
        if position.is_finite() {
            self.player_position = position;
        }
    }

    // ==================== Direct agent control ====================

    /// Apply damage to an agent as if it had been hit
    pub fn damage_agent(&mut self, id: Id, damage: &DamageInfo) -> Result<ShotOutcome> {
        let index = self.index_of(id).ok_or(GameError::AgentNotFound(id))?;
        Ok(self.shoot(index, damage))
    }

    /// Start an agent's dying sequence. Returns false if it was already dying
    pub fn kill_agent(&mut self, id: Id) -> Result<bool> {
        let index = self.index_of(id).ok_or(GameError::AgentNotFound(id))?;
        let now = self.clock;
        let mut env = agent_env!(self);
        Ok(self.zombies[index].die(now, &self.config.agents, &mut env))
    }

    /// Remove an agent from the world now, skipping any pending teardown
    pub fn remove_agent(&mut self, id: Id) -> Result<()> {
        let index = self.index_of(id).ok_or(GameError::AgentNotFound(id))?;
        {
            let mut env = agent_env!(self);
            self.zombies[index].remove(&mut env);
        }
        self.zombies.remove(index);
        self.hooks.publish(GameEvent::AgentRemoved { agent: id });
        Ok(())
    }

    // ==================== Frame ====================

    /// Advance the world by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock += f64::from(dt);
        let now = self.clock;

        let substeps = self.physics.step(dt);
        self.links.sync(&self.physics, &mut self.scene);
        let removed = self.run_deferred(now);
        let player_damage = self.update_agents(now, dt);
        let (impacts, killed) = self.resolve_projectiles();
        self.collect_power_ups();
        if self.weapon.update(dt) {
            self.publish_ammo();
        }
        self.update_level(dt);

        TickReport {
            time: now,
            substeps,
            impacts,
            killed,
            removed,
            player_damage,
            events: self.hooks.dispatch(),
        }
    }

    fn run_deferred(&mut self, now: f64) -> Vec<Id> {
        let mut removed = Vec::new();
        for (task, deferred) in self.scheduler.take_due(now) {
            let Some(index) = self.index_of(deferred.agent()) else {
                log::trace!("{} skipped, agent {} is gone", task, deferred.agent());
                continue;
            };
            match deferred {
                DeferredTask::FadeOut { duration, .. } => {
                    self.zombies[index].fade_out(duration, &mut self.scene);
                }
                DeferredTask::RemoveAgent { agent } => {
                    let mut env = agent_env!(self);
                    if self.zombies[index].remove(&mut env) {
                        removed.push(agent);
                    }
                }
            }
        }

        self.zombies.retain(|z| !z.is_removed());
        for agent in &removed {
            self.hooks.publish(GameEvent::AgentRemoved { agent: *agent });
        }
        removed
    }

    fn update_agents(&mut self, now: f64, dt: f32) -> f32 {
        let peers: Vec<(Id, Vec3)> = self
            .zombies
            .iter()
            .filter(|z| z.is_alive())
            .map(|z| (z.id(), z.position()))
            .collect();
        let frame = AgentFrame {
            now,
            dt,
            target: self.player_position,
            obstacles: &self.obstacles,
            peers: &peers,
            steering: &self.config.steering,
            config: &self.config.agents,
        };

        let mut env = agent_env!(self);
        let mut attack = 0.0;
        for zombie in &mut self.zombies {
            attack += zombie.update(&frame, &mut env).attack_damage;
        }

        let (drained, died) = self.life.drain(attack);
        if drained > 0.0 {
            self.hooks.publish(GameEvent::PlayerDamaged {
                amount: drained,
                remaining: self.life.current(),
            });
            self.update_scream();
        }
        if died {
            log::info!("player died on level {}", self.progress.level);
            self.hooks.publish(GameEvent::PlayerDied);
        }
        drained
    }

    fn resolve_projectiles(&mut self) -> (Vec<Impact>, Vec<Id>) {
        let probes = self.physics.probes();
        let zombies = &self.zombies;
        let half_height = self.config.agents.body_half_extents[1];
        let impacts = detect_impacts(
            &self.projectiles,
            &probes,
            &self.config.combat.damage,
            &self.config.combat.projectiles.flight_bounds(),
            |probe| classify(probe, zombies, half_height),
        );

        let mut applied = Vec::with_capacity(impacts.len());
        let mut killed = Vec::new();
        for impact in impacts {
            match impact.target {
                ImpactTarget::Agent(id) => {
                    // An earlier impact this frame may have killed it
                    let Some(index) = self.index_of(id).filter(|i| self.zombies[*i].is_alive()) else {
                        continue;
                    };
                    let Some(damage) = impact.damage else {
                        continue;
                    };
                    self.release_serial(impact.serial);
                    if self.shoot(index, &damage).killed {
                        killed.push(id);
                    }
                }
                ImpactTarget::World(kind) => {
                    self.release_serial(impact.serial);
                    log::trace!("projectile {} hit {:?}", impact.serial, kind);
                    self.scene
                        .add_decal(impact.point, impact.normal, self.config.combat.decal_color);
                }
                ImpactTarget::OutOfBounds => self.release_serial(impact.serial),
            }
            applied.push(impact);
        }
        (applied, killed)
    }

    /// Damage one agent, counting and announcing the kill
    fn shoot(&mut self, index: usize, damage: &DamageInfo) -> ShotOutcome {
        let now = self.clock;
        let outcome = {
            let mut env = agent_env!(self);
            self.zombies[index].get_shot(damage, now, &self.config.agents, &mut env)
        };
        if outcome.killed {
            let zombie = &self.zombies[index];
            let kills = self.progress.record_kill();
            self.hooks.publish(GameEvent::AgentKilled {
                agent: zombie.id(),
                position: zombie.position(),
                headshot: damage.is_critical,
                kills,
            });
        }
        outcome
    }

    fn collect_power_ups(&mut self) {
        let radius = self.config.power_ups.pickup_radius;
        let player = self.player_position;
        let collected: Vec<PowerUp> = self
            .power_ups
            .iter_mut()
            .filter_map(|p| p.try_collect(player, radius).then_some(*p))
            .collect();
        self.power_ups.retain(|p| p.active);

        for power_up in collected {
            self.scene.detach(power_up.node);
            self.apply_power_up(power_up.kind);
            self.hooks.publish(GameEvent::PowerUpCollected {
                kind: power_up.kind,
            });
        }
    }

    fn apply_power_up(&mut self, kind: PowerUpKind) {
        let tuning = &self.config.power_ups;
        match kind {
            PowerUpKind::ZombieSlowdown => {
                self.agent_speed *= tuning.slowdown_factor;
                for zombie in &mut self.zombies {
                    zombie.set_speed(zombie.speed() * tuning.slowdown_factor);
                }
            }
            PowerUpKind::PlayerSpeedup => self.player_move_speed *= tuning.speedup_factor,
            PowerUpKind::HealthBoost => {
                self.life.heal(tuning.health_boost);
                self.update_scream();
            }
        }
        log::debug!("power-up {:?} collected", kind);
    }

    fn update_level(&mut self, dt: f32) {
        if self.progress.tick(dt) {
            log::info!("level {} out of time", self.progress.level);
            self.hooks.publish(GameEvent::LevelTimeExpired {
                level: self.progress.level,
            });
        }
        if !self.progress.is_complete(&self.config.level) {
            return;
        }

        self.progress = self.progress.next(&self.config.level);
        self.weapon.set_level(self.progress.level);
        log::info!("advancing to level {}", self.progress.level);
        self.hooks.publish(GameEvent::LevelAdvanced {
            level: self.progress.level,
            kills_to_win: self.progress.kills_to_win,
        });
        self.publish_ammo();
    }

    /// Start over from level 1 with full life
    pub fn restart(&mut self, assets: &mut dyn AssetProvider) -> Result<LevelReport> {
        self.progress = LevelProgress::new(1, &self.config.level);
        self.life.reset();
        self.weapon = Weapon::new(self.config.combat.weapon.clone(), 1);
        self.agent_speed = self.config.agents.speed;
        self.player_move_speed = self.config.combat.player_move_speed;
        self.update_scream();
        self.build_level(assets)
    }

    // ==================== Helpers ====================

    fn index_of(&self, id: Id) -> Option<usize> {
        self.zombies.iter().position(|z| z.id() == id)
    }

    fn release_serial(&mut self, serial: u64) {
        if let Some(projectile) = self.projectiles.remove(serial) {
            self.release(projectile);
        }
    }

    /// Free a projectile's body and node together
    fn release(&mut self, projectile: Projectile) {
        self.links.remove(projectile.body);
        self.physics.remove_body(projectile.body);
        self.scene.detach(projectile.node);
    }

    fn publish_ammo(&mut self) {
        self.hooks.publish(GameEvent::AmmoChanged {
            ammo: self.weapon.ammo(),
            magazine: self.weapon.magazine_size(),
        });
    }

    fn update_scream(&mut self) {
        let Some(scream) = self.sounds.scream else {
            return;
        };
        let critical = !self.life.is_empty() && self.life.band() == LifeBand::Critical;
        if critical && !self.scream_playing {
            self.audio.play(scream);
            self.scream_playing = true;
        } else if !critical && self.scream_playing {
            self.audio.pause(scream);
            self.scream_playing = false;
        }
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn agents(&self) -> &[Zombie] {
        &self.zombies
    }

    pub fn agent(&self, id: Id) -> Option<&Zombie> {
        self.zombies.iter().find(|z| z.id() == id)
    }

    pub fn agent_count(&self) -> usize {
        self.zombies.len()
    }

    pub fn live_agent_count(&self) -> usize {
        self.zombies.iter().filter(|z| z.is_alive()).count()
    }

    pub fn projectiles(&self) -> &ProjectileRing {
        &self.projectiles
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn links(&self) -> &BodyVisualMap {
        &self.links
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn life(&self) -> &LifePool {
        &self.life
    }

    pub fn is_game_over(&self) -> bool {
        self.life.is_empty()
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    pub fn progress(&self) -> &LevelProgress {
        &self.progress
    }

    pub fn player_position(&self) -> Vec3 {
        self.player_position
    }

    pub fn player_move_speed(&self) -> f32 {
        self.player_move_speed
    }

    /// Speed given to agents spawned from now on
    pub fn agent_speed(&self) -> f32 {
        self.agent_speed
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.hooks.subscribe(handler)
    }

    pub fn on_agent_killed<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(Id, Vec3) + 'static,
    {
        self.hooks.on_agent_killed(handler)
    }

    pub fn on_player_damaged<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(f32, f32) + 'static,
    {
        self.hooks.on_player_damaged(handler)
    }
}

/// How a projectile sees a body
fn classify(probe: &BodyProbe, zombies: &[Zombie], half_height: f32) -> TargetClass {
    match probe.kind {
        BodyKind::Agent => {
            let id = Id::from_bits(probe.user_data as u64);
            match zombies.iter().find(|z| z.id() == id) {
                Some(zombie) if zombie.is_alive() => TargetClass::Agent {
                    id,
                    base_y: probe.position.y - half_height,
                },
                _ => TargetClass::Pass,
            }
        }
        BodyKind::Projectile => TargetClass::Pass,
        _ => TargetClass::World,
    }
}

fn play<A: AudioSink>(audio: &mut A, sound: Option<SoundHandle>) {
    if let Some(sound) = sound {
        audio.play(sound);
    }
}

fn sample<R: Rng>(rng: &mut R, range: [f32; 2]) -> f32 {
    if range[1] > range[0] {
        rng.gen_range(range[0]..range[1])
    } else {
        range[0]
    }
}

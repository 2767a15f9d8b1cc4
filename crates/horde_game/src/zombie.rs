//! Zombie agents
//!
//! An agent's visual node is the authority on where it is. Each frame the
//! agent moves its own position, then pushes that pose onto the node and the
//! kinematic physics body; physics never moves an agent, it only answers
//! overlap queries against it.

use crate::animation::{AnimationMixer, AnimationSet, AnimationSlot};
use crate::error::Result;
use crate::scene::{AnimationClip, AssetProvider, AudioSink, ClipPlayback, Primitive, RenderScene};
use crate::scheduler::{DeferredTask, Scheduler, TaskId};
use crate::sync::{BodyVisualMap, SyncMode};
use glam::{Quat, Vec3};
use horde_ai::{
    compute_avoidance, is_clear, separation_offset, AlertTimer, BehaviorState, BehaviorThresholds,
    SteeringConfig, SteeringOutcome, TransitionContext,
};
use horde_combat::{DamageInfo, Health, LifeBand};
use horde_core::{flatten, ground_distance, Aabb, Id, NodeId, SoundHandle};
use horde_physics::{BodyKind, ColliderDesc, ColliderShape, PhysicsWorld, RigidBodyDesc, RigidBodyHandle};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tunables shared by every agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_health: u32,
    /// Movement speed in units per second
    pub speed: f32,
    /// Speed at which the chase clip plays at its authored rate
    pub chase_baseline_speed: f32,
    pub thresholds: BehaviorThresholds,
    /// Agents are kept within this distance of the origin on x and z
    pub world_half_extent: f32,
    pub ground_y: f32,
    /// Half-extents of the agent's physics box; the box sits on the ground
    pub body_half_extents: [f32; 3],
    /// Ambient sound plays while the target is this close
    pub sound_radius: f32,
    /// Seconds an alert lasts
    pub alert_duration: f64,
    /// Agents within this distance of a noise are alerted
    pub noise_radius: f32,
    /// Player life drained per second by each attacking agent
    pub attack_damage_per_second: f32,
    /// Playback rate of the dying clip
    pub dying_time_scale: f32,
    /// The fade starts this long before removal
    pub fade_lead_in: f32,
    /// Teardown delay when no dying clip is bound
    pub fallback_teardown: f32,
    /// Seconds before the idle clip is restarted
    pub idle_cycle: f32,
    /// Height of the life bar above the feet
    pub life_bar_offset: f32,
    pub life_bar_size: [f32; 2],
    pub skins: Vec<String>,
    pub idle_clips: Vec<String>,
    pub chase_clips: Vec<String>,
    pub attack_clips: Vec<String>,
    pub dying_clips: Vec<String>,
    pub ambient_sound: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let models = |names: &[&str]| -> Vec<String> {
            names.iter().map(|n| format!("/assets/models/{n}.fbx")).collect()
        };
        Self {
            max_health: 10,
            speed: 3.0,
            chase_baseline_speed: 3.0,
            thresholds: BehaviorThresholds::default(),
            world_half_extent: 300.0,
            ground_y: 0.0,
            body_half_extents: [1.0, 2.0, 1.0],
            sound_radius: 30.0,
            alert_duration: horde_ai::alert::DEFAULT_ALERT_DURATION,
            noise_radius: 150.0,
            attack_damage_per_second: 0.25,
            dying_time_scale: 0.4,
            fade_lead_in: 1.0,
            fallback_teardown: 5.0,
            idle_cycle: 8.0,
            life_bar_offset: 4.6,
            life_bar_size: [2.0, 0.2],
            skins: models(&["zombie1", "zombie2", "zombie3", "zombie4", "zombie5", "zombie6", "Mutant"]),
            idle_clips: models(&["idle1", "idle2"]),
            chase_clips: models(&["chase1", "chase2"]),
            attack_clips: models(&["Attack1", "Attack2"]),
            dying_clips: models(&["ZDying", "ZDeath"]),
            ambient_sound: Some("/assets/audio/zombie.mp3".to_string()),
        }
    }
}

impl AgentConfig {
    /// Candidate clip files for a slot
    pub fn clip_paths(&self, slot: AnimationSlot) -> &[String] {
        match slot {
            AnimationSlot::Idle => &self.idle_clips,
            AnimationSlot::Chase => &self.chase_clips,
            AnimationSlot::Attack => &self.attack_clips,
            AnimationSlot::Dying => &self.dying_clips,
        }
    }

    pub fn body_half_extents(&self) -> Vec3 {
        Vec3::from(self.body_half_extents)
    }

    /// Teardown delay for a dying clip, scaled by the dying playback rate
    pub fn teardown_delay(&self, clip: Option<&AnimationClip>) -> f32 {
        match clip {
            Some(clip) if clip.duration > 0.0 && self.dying_time_scale > 0.0 => {
                clip.duration / self.dying_time_scale
            }
            _ => self.fallback_teardown,
        }
    }
}

/// Mutable world pieces an agent touches
pub struct AgentEnv<'a, S, A> {
    pub physics: &'a mut PhysicsWorld,
    pub scene: &'a mut S,
    pub audio: &'a mut A,
    pub scheduler: &'a mut Scheduler,
    pub links: &'a mut BodyVisualMap,
}

/// Read-only inputs to one agent update
#[derive(Debug, Clone, Copy)]
pub struct AgentFrame<'a> {
    /// Simulation clock
    pub now: f64,
    pub dt: f32,
    pub target: Vec3,
    pub obstacles: &'a [Aabb],
    /// Positions of live agents at the start of the frame
    pub peers: &'a [(Id, Vec3)],
    pub steering: &'a SteeringConfig,
    pub config: &'a AgentConfig,
}

/// What one update did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentTick {
    pub previous: BehaviorState,
    pub state: BehaviorState,
    pub displacement: Vec3,
    /// Player life this agent drained this frame
    pub attack_damage: f32,
}

/// Result of a hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShotOutcome {
    pub dealt: u32,
    /// This hit started the dying sequence
    pub killed: bool,
}

/// A hostile agent
#[derive(Debug, Clone)]
pub struct Zombie {
    id: Id,
    position: Vec3,
    rotation: Quat,
    health: Health,
    state: BehaviorState,
    alert: AlertTimer,
    speed: f32,
    idle_timer: f32,
    body: Option<RigidBodyHandle>,
    node: Option<NodeId>,
    life_bar: Option<NodeId>,
    sound: Option<SoundHandle>,
    sound_playing: bool,
    animations: AnimationSet,
    mixer: AnimationMixer,
    teardown: Vec<TaskId>,
}

impl Zombie {
    /// Load an agent's model and clips and create its body, node and life bar.
    ///
    /// A model that fails to load is replaced by a placeholder box with no
    /// clips; clips that fail to load are left unbound.
    pub fn spawn<S, A, R>(
        id: Id,
        position: Vec3,
        speed: f32,
        config: &AgentConfig,
        assets: &mut dyn AssetProvider,
        rng: &mut R,
        env: &mut AgentEnv<'_, S, A>,
    ) -> Result<Self>
    where
        S: RenderScene,
        A: AudioSink,
        R: Rng,
    {
        let half = config.body_half_extents();
        let model = match config.skins.choose(rng) {
            Some(path) => match assets.load_skinned_model(path) {
                Ok(model) => Some(model),
                Err(e) => {
                    log::warn!("agent {} gets a placeholder: {}", id, e);
                    None
                }
            },
            None => None,
        };

        let model_loaded = model.is_some();
        let (node, mut animations) = match model {
            Some(model) => (model.node, AnimationSet::from_model_clips(&model.clips)),
            None => (
                env.scene.create_primitive(Primitive::Box { half_extents: half }, [0.35, 0.45, 0.3]),
                AnimationSet::new(),
            ),
        };
        if model_loaded {
            for slot in AnimationSlot::ALL {
                let Some(path) = config.clip_paths(slot).choose(rng) else {
                    continue;
                };
                match assets.load_animation_clip(path) {
                    Ok(clip) => animations.bind(slot, clip),
                    Err(e) => log::warn!("agent {} has no {:?} clip: {}", id, slot, e),
                }
            }
        }
        env.scene.attach(node);

        let body = env.physics.create_body(
            RigidBodyDesc::kinematic(BodyKind::Agent).with_position(position + Vec3::Y * half.y),
            ColliderDesc::new(ColliderShape::cuboid(half.x, half.y, half.z)).with_user_data(id.to_bits() as u128),
        );
        let body = match body {
            Ok(body) => body,
            Err(e) => {
                env.scene.detach(node);
                return Err(e.into());
            }
        };
        env.links.insert(body, node, SyncMode::Excluded);

        let [bar_width, bar_height] = config.life_bar_size;
        let life_bar = env.scene.create_primitive(
            Primitive::LifeBar {
                width: bar_width,
                height: bar_height,
            },
            LifeBand::Healthy.color(),
        );
        env.scene.attach(life_bar);

        let sound = config.ambient_sound.as_deref().and_then(|path| {
            let sound = env.audio.load(path);
            if sound.is_none() {
                log::warn!("agent {} has no ambient sound: {} failed to load", id, path);
            }
            sound
        });

        let zombie = Self {
            id,
            position,
            rotation: Quat::IDENTITY,
            health: Health::new(config.max_health),
            state: BehaviorState::Idle,
            alert: AlertTimer::new(),
            speed,
            idle_timer: 0.0,
            body: Some(body),
            node: Some(node),
            life_bar: Some(life_bar),
            sound,
            sound_playing: false,
            animations,
            mixer: AnimationMixer::new(),
            teardown: Vec::new(),
        };
        zombie.update_life_bar(env.scene);
        zombie.commit_transform(config, env);
        log::debug!("spawned agent {} at {:?}", id, position);
        Ok(zombie)
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    pub fn is_removed(&self) -> bool {
        self.state == BehaviorState::Removed
    }

    pub fn is_alerted(&self, now: f64) -> bool {
        self.alert.is_active(now)
    }

    pub fn alert(&self) -> &AlertTimer {
        &self.alert
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn body(&self) -> Option<RigidBodyHandle> {
        self.body
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn life_bar(&self) -> Option<NodeId> {
        self.life_bar
    }

    pub fn sound(&self) -> Option<SoundHandle> {
        self.sound
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    /// Tasks scheduled by `die` that have not been cancelled
    pub fn pending_teardown(&self) -> &[TaskId] {
        &self.teardown
    }

    /// Move the agent. Takes effect on the node and body at the next commit
    pub fn set_position(&mut self, position: Vec3) {
        if position.is_finite() {
            self.position = position;
        }
    }

    /// Bind a clip that finished loading after spawn
    pub fn bind_clip(&mut self, slot: AnimationSlot, clip: AnimationClip) {
        self.animations.bind(slot, clip);
    }

    // ==================== Per-frame update ====================

    /// Advance one frame.
    ///
    /// Removed agents are a no-op. Dying agents only advance their dying
    /// clip and keep their body on their node.
    pub fn update<S, A>(&mut self, frame: &AgentFrame<'_>, env: &mut AgentEnv<'_, S, A>) -> AgentTick
    where
        S: RenderScene,
        A: AudioSink,
    {
        let previous = self.state;
        let mut tick = AgentTick {
            previous,
            state: previous,
            displacement: Vec3::ZERO,
            attack_damage: 0.0,
        };
        if self.state == BehaviorState::Removed {
            return tick;
        }

        if self.state.is_alive() || self.mixer.is_running(AnimationSlot::Dying) {
            self.mixer.advance(frame.dt);
        }
        if self.state.is_dead() && self.node.is_none() {
            return tick;
        }

        self.sync_body(env.physics, frame.config);
        self.position = clamp_to_world(self.position, frame.config);
        if self.state.is_dead() {
            return tick;
        }

        let distance = ground_distance(self.position, frame.target);
        self.update_sound(distance, frame.config, env.audio);

        let push = separation_offset(
            self.position,
            frame.peers.iter().filter(|(id, _)| *id != self.id).map(|(_, p)| *p),
            frame.steering.peer_radius,
            frame.steering.peer_push * frame.dt,
        );
        let nudged = self.position + push;
        if push != Vec3::ZERO
            && nudged.is_finite()
            && is_clear(nudged, frame.obstacles, frame.steering.body_half_extent)
        {
            self.position = nudged;
            tick.displacement += push;
        }

        self.alert.expire(frame.now);
        let distance = ground_distance(self.position, frame.target);
        let next = self.state.next(
            &TransitionContext::new(distance, self.alert.is_active(frame.now)),
            &frame.config.thresholds,
        );
        if next != previous {
            log::trace!("agent {} {:?} -> {:?} at {:.1}", self.id, previous, next, distance);
        }
        self.state = next;

        match next {
            BehaviorState::Idle => self.idle(frame, previous, env.scene),
            BehaviorState::Chasing => tick.displacement += self.chase(frame, env.scene),
            BehaviorState::Attacking => {
                self.face(frame.target);
                self.play(AnimationSlot::Attack, ClipPlayback::looped(1.0), env.scene);
                tick.attack_damage = frame.config.attack_damage_per_second * frame.dt;
            }
            BehaviorState::Dying | BehaviorState::Removed => {}
        }

        self.position = clamp_to_world(self.position, frame.config);
        self.commit_transform(frame.config, env);
        tick.state = next;
        tick
    }

    fn idle<S: RenderScene>(&mut self, frame: &AgentFrame<'_>, previous: BehaviorState, scene: &mut S) {
        if previous != BehaviorState::Idle {
            self.idle_timer = 0.0;
        }
        self.idle_timer -= frame.dt;
        if self.idle_timer <= 0.0 {
            self.mixer.stop_all();
            self.idle_timer = frame.config.idle_cycle;
        }
        self.play(AnimationSlot::Idle, ClipPlayback::looped(1.0), scene);
    }

    fn chase<S: RenderScene>(&mut self, frame: &AgentFrame<'_>, scene: &mut S) -> Vec3 {
        let toward = flatten(frame.target - self.position);
        let outcome = compute_avoidance(
            self.position,
            toward,
            frame.obstacles,
            self.speed,
            frame.dt,
            frame.steering,
        );
        if outcome == SteeringOutcome::Degenerate {
            log::trace!("agent {} has no usable chase direction", self.id);
        }
        let step = outcome.displacement();
        self.position += step;
        self.face(frame.target);

        let rate = if frame.config.chase_baseline_speed > 0.0 {
            self.speed / frame.config.chase_baseline_speed
        } else {
            1.0
        };
        self.play(AnimationSlot::Chase, ClipPlayback::looped(rate), scene);
        step
    }

    fn face(&mut self, target: Vec3) {
        if let Some(dir) = flatten(target - self.position).try_normalize() {
            self.rotation = Quat::from_rotation_y(dir.x.atan2(dir.z));
        }
    }

    /// Start a slot's clip unless it is already running.
    ///
    /// Missing clips and missing nodes are a no-op. Replaying the running
    /// clip with a new rate only updates its rate.
    fn play<S: RenderScene>(&mut self, slot: AnimationSlot, playback: ClipPlayback, scene: &mut S) -> bool {
        let (Some(node), Some(clip)) = (self.node, self.animations.get(slot)) else {
            return false;
        };
        if self.mixer.is_running(slot) {
            if self.mixer.time_scale() != Some(playback.time_scale) {
                self.mixer.set_time_scale(playback.time_scale);
                scene.play_animation(node, clip, playback);
            }
            return false;
        }
        scene.stop_animations(node);
        scene.play_animation(node, clip, playback);
        self.mixer.play(slot, clip, playback);
        true
    }

    fn update_sound<A: AudioSink>(&mut self, distance: f32, config: &AgentConfig, audio: &mut A) {
        let Some(sound) = self.sound else {
            return;
        };
        let inside = distance <= config.sound_radius;
        if inside && !self.sound_playing {
            audio.play(sound);
            self.sound_playing = true;
        } else if !inside && self.sound_playing {
            audio.pause(sound);
            self.sound_playing = false;
        }
    }

    // ==================== Damage and teardown ====================

    /// Raise the alert. Dead agents ignore noise
    pub fn raise_alert(&mut self, now: f64, duration: f64) -> bool {
        if !self.state.is_alive() {
            return false;
        }
        self.alert.raise(now, duration);
        true
    }

    /// Take a hit.
    ///
    /// Health stops at zero; the hit that empties it starts the dying
    /// sequence. Hits on a dying or removed agent do nothing.
    pub fn get_shot<S, A>(
        &mut self,
        damage: &DamageInfo,
        now: f64,
        config: &AgentConfig,
        env: &mut AgentEnv<'_, S, A>,
    ) -> ShotOutcome
    where
        S: RenderScene,
        A: AudioSink,
    {
        if !self.state.is_alive() {
            return ShotOutcome::default();
        }
        let (dealt, died) = self.health.apply_damage(damage);
        self.alert.raise(now, config.alert_duration);
        self.update_life_bar(env.scene);
        if died {
            self.die(now, config, env);
        }
        ShotOutcome { dealt, killed: died }
    }

    /// Start dying. Returns false if already dying or removed.
    ///
    /// Stops every clip, hides the life bar, silences the ambient sound and
    /// plays the dying clip once at the reduced rate. The fade and the
    /// removal are scheduled from the scaled clip length.
    pub fn die<S, A>(&mut self, now: f64, config: &AgentConfig, env: &mut AgentEnv<'_, S, A>) -> bool
    where
        S: RenderScene,
        A: AudioSink,
    {
        if !self.state.is_alive() {
            return false;
        }
        self.state = BehaviorState::Dying;
        self.alert.clear();
        self.mixer.stop_all();

        if let Some(node) = self.node {
            env.scene.stop_animations(node);
        }
        if let Some(bar) = self.life_bar {
            env.scene.set_visible(bar, false);
        }
        if let Some(sound) = self.sound {
            env.audio.stop(sound);
            self.sound_playing = false;
        }

        let clip = self.animations.get(AnimationSlot::Dying);
        let delay = config.teardown_delay(clip);
        if let (Some(node), Some(clip)) = (self.node, clip) {
            let playback = ClipPlayback::once(config.dying_time_scale);
            env.scene.play_animation(node, clip, playback);
            self.mixer.play(AnimationSlot::Dying, clip, playback);
        }

        let lead_in = config.fade_lead_in.clamp(0.0, delay);
        let fade = env.scheduler.schedule(
            now + f64::from(delay - lead_in),
            DeferredTask::FadeOut {
                agent: self.id,
                duration: lead_in,
            },
        );
        let removal = env
            .scheduler
            .schedule(now + f64::from(delay), DeferredTask::RemoveAgent { agent: self.id });
        self.teardown = vec![fade, removal];

        log::debug!("agent {} dying, removal in {:.2}s", self.id, delay);
        true
    }

    /// Begin the fade-out of the agent's node
    pub fn fade_out<S: RenderScene>(&self, duration: f32, scene: &mut S) {
        if let Some(node) = self.node {
            scene.fade_out(node, duration);
        }
    }

    /// Release the body, the node and the life bar together.
    ///
    /// Cancels any pending teardown. Returns false if already removed.
    pub fn remove<S, A>(&mut self, env: &mut AgentEnv<'_, S, A>) -> bool
    where
        S: RenderScene,
        A: AudioSink,
    {
        if self.state == BehaviorState::Removed {
            return false;
        }
        for task in self.teardown.drain(..) {
            env.scheduler.cancel(task);
        }
        if let Some(body) = self.body.take() {
            env.links.remove(body);
            env.physics.remove_body(body);
        }
        if let Some(node) = self.node.take() {
            env.scene.detach(node);
        }
        if let Some(bar) = self.life_bar.take() {
            env.scene.detach(bar);
        }
        if let Some(sound) = self.sound.take() {
            if self.sound_playing {
                env.audio.stop(sound);
            }
        }
        self.sound_playing = false;
        self.mixer.stop_all();
        self.state = BehaviorState::Removed;
        log::debug!("removed agent {}", self.id);
        true
    }

    // ==================== Transforms ====================

    fn body_center(&self, config: &AgentConfig) -> Vec3 {
        self.position + Vec3::Y * config.body_half_extents[1]
    }

    /// Move the physics body onto the node's pose
    fn sync_body(&self, physics: &mut PhysicsWorld, config: &AgentConfig) {
        let Some(body) = self.body else {
            return;
        };
        if let Err(e) = physics.set_body_transform(body, self.body_center(config), self.rotation) {
            log::warn!("agent {} lost its body: {}", self.id, e);
        }
    }

    /// Push the agent's pose onto its node, life bar and body
    pub fn commit_transform<S, A>(&self, config: &AgentConfig, env: &mut AgentEnv<'_, S, A>)
    where
        S: RenderScene,
        A: AudioSink,
    {
        if let Some(node) = self.node {
            env.scene.set_transform(node, self.position, self.rotation);
        }
        if let Some(bar) = self.life_bar {
            env.scene.set_transform(bar, self.position + Vec3::Y * config.life_bar_offset, Quat::IDENTITY);
        }
        self.sync_body(env.physics, config);
    }

    fn update_life_bar<S: RenderScene>(&self, scene: &mut S) {
        if let Some(bar) = self.life_bar {
            let fraction = self.health.fraction();
            scene.set_fill(bar, fraction, LifeBand::from_fraction(fraction).color());
        }
    }
}

fn clamp_to_world(position: Vec3, config: &AgentConfig) -> Vec3 {
    let limit = config.world_half_extent;
    Vec3::new(
        position.x.clamp(-limit, limit),
        config.ground_y,
        position.z.clamp(-limit, limit),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessAudio, HeadlessScene, ProceduralAssets, SoundState};
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        physics: PhysicsWorld,
        scene: HeadlessScene,
        audio: HeadlessAudio,
        scheduler: Scheduler,
        links: BodyVisualMap,
        config: AgentConfig,
        steering: SteeringConfig,
        rng: SmallRng,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                physics: PhysicsWorld::default(),
                scene: HeadlessScene::new(),
                audio: HeadlessAudio::new(),
                scheduler: Scheduler::new(),
                links: BodyVisualMap::new(),
                config: AgentConfig::default(),
                steering: SteeringConfig::default(),
                rng: SmallRng::seed_from_u64(5),
            }
        }

        fn env(&mut self) -> AgentEnv<'_, HeadlessScene, HeadlessAudio> {
            AgentEnv {
                physics: &mut self.physics,
                scene: &mut self.scene,
                audio: &mut self.audio,
                scheduler: &mut self.scheduler,
                links: &mut self.links,
            }
        }

        fn spawn_with(&mut self, position: Vec3, assets: &mut ProceduralAssets) -> Zombie {
            let config = self.config.clone();
            let mut rng = self.rng.clone();
            let zombie = Zombie::spawn(Id::new(1, 0), position, config.speed, &config, assets, &mut rng, &mut self.env())
                .unwrap();
            self.rng = rng;
            zombie
        }

        fn spawn(&mut self, position: Vec3) -> Zombie {
            self.spawn_with(position, &mut ProceduralAssets::new())
        }

        fn step(&mut self, zombie: &mut Zombie, now: f64, target: Vec3) -> AgentTick {
            let config = self.config.clone();
            let steering = self.steering.clone();
            let frame = AgentFrame {
                now,
                dt: DT,
                target,
                obstacles: &[],
                peers: &[],
                steering: &steering,
                config: &config,
            };
            zombie.update(&frame, &mut self.env())
        }
    }

    #[test]
    fn test_spawn_creates_one_body_one_node() {
        let mut rig = Rig::new();
        let zombie = rig.spawn(Vec3::new(10.0, 0.0, 10.0));

        let body = zombie.body().unwrap();
        let node = zombie.node().unwrap();
        assert_eq!(rig.physics.body_count(), 1);
        assert_eq!(rig.links.node(body), Some(node));
        assert_eq!(rig.links.mode(body), Some(SyncMode::Excluded));
        assert!(rig.scene.is_attached(node));
        assert!(rig.scene.is_attached(zombie.life_bar().unwrap()));
        assert_relative_eq!(rig.physics.body_position(body).unwrap().y, 2.0);
        assert!(AnimationSlot::ALL.iter().all(|s| zombie.animations().get(*s).is_some()));
    }

    #[test]
    fn test_missing_model_gets_placeholder() {
        let mut rig = Rig::new();
        rig.config.skins = vec!["/assets/models/gone.fbx".into()];
        let mut assets = ProceduralAssets::new().with_missing("/assets/models/gone.fbx");
        let zombie = rig.spawn_with(Vec3::ZERO, &mut assets);

        let node = zombie.node().unwrap();
        assert!(matches!(
            rig.scene.node(node).and_then(|n| n.primitive),
            Some(Primitive::Box { .. })
        ));
        assert!(zombie.animations().is_empty());
        assert!(zombie.body().is_some());
    }

    #[test]
    fn test_distance_bands() {
        let mut rig = Rig::new();

        let mut far = rig.spawn(Vec3::new(0.0, 0.0, -60.0));
        assert_eq!(rig.step(&mut far, 0.0, Vec3::ZERO).state, BehaviorState::Idle);
        assert_eq!(far.position(), Vec3::new(0.0, 0.0, -60.0));

        let mut near = rig.spawn(Vec3::new(0.0, 0.0, -20.0));
        let tick = rig.step(&mut near, 0.0, Vec3::ZERO);
        assert_eq!(tick.state, BehaviorState::Chasing);
        assert!(near.position().z > -20.0);
        assert_relative_eq!(tick.displacement.length(), 3.0 * DT, epsilon = 1e-5);

        let mut close = rig.spawn(Vec3::new(0.0, 0.0, -4.0));
        let tick = rig.step(&mut close, 0.0, Vec3::ZERO);
        assert_eq!(tick.state, BehaviorState::Attacking);
        assert_eq!(close.position(), Vec3::new(0.0, 0.0, -4.0));
        assert_relative_eq!(tick.attack_damage, 0.25 * DT);
    }

    #[test]
    fn test_alert_overrides_distance() {
        let mut rig = Rig::new();
        let mut zombie = rig.spawn(Vec3::new(0.0, 0.0, -200.0));
        assert!(zombie.raise_alert(0.0, 30.0));

        assert_eq!(rig.step(&mut zombie, 1.0, Vec3::ZERO).state, BehaviorState::Chasing);
        assert_eq!(rig.step(&mut zombie, 31.0, Vec3::ZERO).state, BehaviorState::Idle);
        assert!(!zombie.is_alerted(31.0));
    }

    #[test]
    fn test_position_clamped_to_world() {
        let mut rig = Rig::new();
        let mut zombie = rig.spawn(Vec3::ZERO);
        zombie.set_position(Vec3::new(450.0, 7.0, -320.0));
        rig.step(&mut zombie, 0.0, Vec3::new(400.0, 0.0, 400.0));
        assert!(zombie.position().x <= 300.0);
        assert!(zombie.position().z >= -300.0);
        assert_eq!(zombie.position().y, 0.0);
    }

    #[test]
    fn test_ambient_sound_is_proximity_gated() {
        let mut rig = Rig::new();
        let mut zombie = rig.spawn(Vec3::new(0.0, 0.0, -20.0));
        let sound = zombie.sound().unwrap();

        rig.step(&mut zombie, 0.0, Vec3::ZERO);
        rig.step(&mut zombie, 0.0, Vec3::ZERO);
        assert_eq!(rig.audio.state(sound), Some(SoundState::Playing));
        assert_eq!(rig.audio.sound(sound).map(|s| s.plays), Some(1));

        rig.step(&mut zombie, 0.0, Vec3::new(0.0, 0.0, 100.0));
        assert_eq!(rig.audio.state(sound), Some(SoundState::Paused));
    }

    #[test]
    fn test_chase_rate_follows_speed() {
        let mut rig = Rig::new();
        let mut zombie = rig.spawn(Vec3::new(0.0, 0.0, -20.0));
        zombie.set_speed(1.5);
        rig.step(&mut zombie, 0.0, Vec3::ZERO);

        let node = zombie.node().unwrap();
        let (_, playback) = rig.scene.node(node).and_then(|n| n.animation.clone()).unwrap();
        assert!(playback.looping);
        assert_relative_eq!(playback.time_scale, 0.5);
    }

    #[test]
    fn test_health_never_negative_and_dies_once() {
        let mut rig = Rig::new();
        let config = rig.config.clone();
        let mut zombie = rig.spawn(Vec3::new(0.0, 0.0, -20.0));

        let mut kills = 0;
        for _ in 0..12 {
            if zombie.get_shot(&DamageInfo::new(1).with_critical(2), 0.0, &config, &mut rig.env()).killed {
                kills += 1;
            }
        }
        assert_eq!(kills, 1);
        assert_eq!(zombie.health().current(), 0);
        assert_eq!(zombie.state(), BehaviorState::Dying);
        assert_eq!(rig.scheduler.len(), 2);

        assert!(!zombie.die(0.0, &config, &mut rig.env()));
        assert_eq!(rig.scheduler.len(), 2, "second die schedules nothing");
    }

    #[test]
    fn test_dying_sequence() {
        let mut rig = Rig::new();
        let config = rig.config.clone();
        let mut zombie = rig.spawn(Vec3::new(0.0, 0.0, -20.0));
        rig.step(&mut zombie, 0.0, Vec3::ZERO);
        let sound = zombie.sound().unwrap();

        assert!(zombie.die(10.0, &config, &mut rig.env()));
        let node = zombie.node().unwrap();
        let record = rig.scene.node(node).unwrap();
        let (clip, playback) = record.animation.clone().unwrap();
        assert!(clip.starts_with('Z'));
        assert!(!playback.looping);
        assert_relative_eq!(playback.time_scale, 0.4);
        assert_eq!(rig.scene.node(zombie.life_bar().unwrap()).map(|n| n.visible), Some(false));
        assert_eq!(rig.audio.state(sound), Some(SoundState::Stopped));

        // 2 s clip at 0.4x: fade at 4 s, removal at 5 s
        assert!(rig.scheduler.take_due(13.9).is_empty());
        let due = rig.scheduler.take_due(14.0);
        assert!(matches!(due[..], [(_, DeferredTask::FadeOut { duration, .. })] if duration == 1.0));
        let due = rig.scheduler.take_due(15.0);
        assert!(matches!(due[..], [(_, DeferredTask::RemoveAgent { .. })]));

        let tick = rig.step(&mut zombie, 15.0, Vec3::ZERO);
        assert_eq!(tick.state, BehaviorState::Dying);
        assert_eq!(tick.displacement, Vec3::ZERO);
    }

    #[test]
    fn test_fallback_teardown_without_dying_clip() {
        let mut rig = Rig::new();
        rig.config.dying_clips.clear();
        let config = rig.config.clone();
        let mut zombie = rig.spawn(Vec3::ZERO);

        zombie.die(0.0, &config, &mut rig.env());
        assert!(rig.scheduler.take_due(4.9).len() == 1);
        assert!(rig.scheduler.take_due(5.0).len() == 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut rig = Rig::new();
        let config = rig.config.clone();
        let mut zombie = rig.spawn(Vec3::ZERO);
        let node = zombie.node().unwrap();
        zombie.die(0.0, &config, &mut rig.env());

        assert!(zombie.remove(&mut rig.env()));
        assert!(!zombie.remove(&mut rig.env()));
        assert!(rig.scheduler.is_empty(), "pending teardown cancelled");
        assert_eq!(rig.physics.body_count(), 0);
        assert!(rig.links.is_empty());
        assert_eq!(rig.scene.node(node).map(|n| n.detach_calls), Some(1));
        assert!(zombie.body().is_none() && zombie.node().is_none());

        let tick = rig.step(&mut zombie, 1.0, Vec3::ZERO);
        assert_eq!(tick.state, BehaviorState::Removed);
    }

    #[test]
    fn test_late_clip_binding() {
        let mut rig = Rig::new();
        rig.config.idle_clips.clear();
        let mut zombie = rig.spawn(Vec3::new(0.0, 0.0, -100.0));
        let node = zombie.node().unwrap();

        rig.step(&mut zombie, 0.0, Vec3::ZERO);
        assert!(rig.scene.node(node).and_then(|n| n.animation.clone()).is_none());

        zombie.bind_clip(AnimationSlot::Idle, AnimationClip::new("idle_late", 3.0));
        rig.step(&mut zombie, 0.1, Vec3::ZERO);
        let (name, _) = rig.scene.node(node).and_then(|n| n.animation.clone()).unwrap();
        assert_eq!(name, "idle_late");
    }
}

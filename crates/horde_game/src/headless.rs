//! In-memory collaborators
//!
//! Used by the `horde_sim` binary to run the simulation without a renderer,
//! and by tests to observe what the simulation asked its collaborators to do.

use crate::error::AssetError;
use crate::scene::{
    AnimationClip, AssetProvider, AudioSink, ClipPlayback, Primitive, RenderScene, SkinnedModel,
};
use glam::{Quat, Vec3};
use horde_core::{NodeId, SoundHandle};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Everything the scene was told about one node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub primitive: Option<Primitive>,
    pub color: [f32; 3],
    pub attached: bool,
    pub transform: Option<(Vec3, Quat)>,
    pub visible: bool,
    pub fill: Option<(f32, [f32; 3])>,
    /// Clip name and playback of the last `play_animation`
    pub animation: Option<(String, ClipPlayback)>,
    pub fade: Option<f32>,
    pub detach_calls: usize,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            primitive: None,
            color: [1.0; 3],
            attached: false,
            transform: None,
            visible: true,
            fill: None,
            animation: None,
            fade: None,
            detach_calls: 0,
        }
    }
}

/// A decal request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decal {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: [f32; 3],
}

/// Scene graph that only records
#[derive(Debug, Default)]
pub struct HeadlessScene {
    nodes: BTreeMap<NodeId, NodeRecord>,
    decals: Vec<Decal>,
    next_node: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, node: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&node)
    }

    pub fn transform(&self, node: NodeId) -> Option<(Vec3, Quat)> {
        self.nodes.get(&node).and_then(|n| n.transform)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.attached)
    }

    pub fn attached_count(&self) -> usize {
        self.nodes.values().filter(|n| n.attached).count()
    }

    pub fn decals(&self) -> &[Decal] {
        &self.decals
    }

    fn record(&mut self, node: NodeId) -> &mut NodeRecord {
        self.nodes.entry(node).or_default()
    }
}

impl RenderScene for HeadlessScene {
    fn create_primitive(&mut self, primitive: Primitive, color: [f32; 3]) -> NodeId {
        let node = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            node,
            NodeRecord {
                primitive: Some(primitive),
                color,
                ..Default::default()
            },
        );
        node
    }

    fn attach(&mut self, node: NodeId) {
        self.record(node).attached = true;
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(record) = self.nodes.get_mut(&node) {
            record.attached = false;
            record.detach_calls += 1;
        }
    }

    fn set_transform(&mut self, node: NodeId, position: Vec3, rotation: Quat) {
        self.record(node).transform = Some((position, rotation));
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        self.record(node).visible = visible;
    }

    fn set_fill(&mut self, node: NodeId, fraction: f32, color: [f32; 3]) {
        self.record(node).fill = Some((fraction, color));
    }

    fn play_animation(&mut self, node: NodeId, clip: &AnimationClip, playback: ClipPlayback) {
        self.record(node).animation = Some((clip.name.clone(), playback));
    }

    fn stop_animations(&mut self, node: NodeId) {
        self.record(node).animation = None;
    }

    fn fade_out(&mut self, node: NodeId, duration: f32) {
        self.record(node).fade = Some(duration);
    }

    fn add_decal(&mut self, position: Vec3, normal: Vec3, color: [f32; 3]) {
        self.decals.push(Decal {
            position,
            normal,
            color,
        });
    }
}

/// Playback state of a recorded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoundState {
    #[default]
    Loaded,
    Playing,
    Paused,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundRecord {
    pub path: String,
    pub state: SoundState,
    pub plays: usize,
    pub pauses: usize,
}

/// Audio sink that only records
#[derive(Debug, Default)]
pub struct HeadlessAudio {
    sounds: BTreeMap<SoundHandle, SoundRecord>,
    missing: HashSet<String>,
    next_sound: u64,
}

impl HeadlessAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loading `path` fail
    pub fn with_missing(mut self, path: impl Into<String>) -> Self {
        self.missing.insert(path.into());
        self
    }

    pub fn sound(&self, handle: SoundHandle) -> Option<&SoundRecord> {
        self.sounds.get(&handle)
    }

    pub fn state(&self, handle: SoundHandle) -> Option<SoundState> {
        self.sounds.get(&handle).map(|s| s.state)
    }

    /// Total `play` calls for every sound loaded from `path`
    pub fn plays_of(&self, path: &str) -> usize {
        self.sounds.values().filter(|s| s.path == path).map(|s| s.plays).sum()
    }
}

impl AudioSink for HeadlessAudio {
    fn load(&mut self, path: &str) -> Option<SoundHandle> {
        if self.missing.contains(path) {
            return None;
        }
        let handle = SoundHandle(self.next_sound);
        self.next_sound += 1;
        self.sounds.insert(
            handle,
            SoundRecord {
                path: path.to_string(),
                state: SoundState::Loaded,
                plays: 0,
                pauses: 0,
            },
        );
        Some(handle)
    }

    fn play(&mut self, sound: SoundHandle) {
        if let Some(record) = self.sounds.get_mut(&sound) {
            record.state = SoundState::Playing;
            record.plays += 1;
        }
    }

    fn pause(&mut self, sound: SoundHandle) {
        if let Some(record) = self.sounds.get_mut(&sound) {
            record.state = SoundState::Paused;
            record.pauses += 1;
        }
    }

    fn stop(&mut self, sound: SoundHandle) {
        if let Some(record) = self.sounds.get_mut(&sound) {
            record.state = SoundState::Stopped;
        }
    }
}

/// Node ids handed out for models start here, clear of scene primitives
const MODEL_NODE_BASE: u64 = 1 << 32;

/// Asset provider that fabricates models and clips from their paths
#[derive(Debug)]
pub struct ProceduralAssets {
    default_duration: f32,
    durations: HashMap<String, f32>,
    missing: HashSet<String>,
    next_node: u64,
    loads: usize,
}

impl Default for ProceduralAssets {
    fn default() -> Self {
        Self {
            default_duration: 2.0,
            durations: HashMap::new(),
            missing: HashSet::new(),
            next_node: MODEL_NODE_BASE,
            loads: 0,
        }
    }
}

impl ProceduralAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duration of every clip without an explicit one
    pub fn with_default_duration(mut self, seconds: f32) -> Self {
        self.default_duration = seconds;
        self
    }

    pub fn with_duration(mut self, path: impl Into<String>, seconds: f32) -> Self {
        self.durations.insert(path.into(), seconds);
        self
    }

    /// Make loading `path` fail
    pub fn with_missing(mut self, path: impl Into<String>) -> Self {
        self.missing.insert(path.into());
        self
    }

    /// Successful loads so far
    pub fn loads(&self) -> usize {
        self.loads
    }

    fn check(&self, path: &str) -> Result<(), AssetError> {
        if self.missing.contains(path) {
            Err(AssetError::NotFound(path.to_string()))
        } else {
            Ok(())
        }
    }
}

impl AssetProvider for ProceduralAssets {
    fn load_skinned_model(&mut self, path: &str) -> Result<SkinnedModel, AssetError> {
        self.check(path)?;
        let node = NodeId(self.next_node);
        self.next_node += 1;
        self.loads += 1;
        Ok(SkinnedModel {
            node,
            clips: Vec::new(),
        })
    }

    fn load_animation_clip(&mut self, path: &str) -> Result<AnimationClip, AssetError> {
        self.check(path)?;
        let name = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(path);
        let duration = self.durations.get(path).copied().unwrap_or(self.default_duration);
        self.loads += 1;
        Ok(AnimationClip::new(name, duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_records_lifecycle() {
        let mut scene = HeadlessScene::new();
        let node = scene.create_primitive(Primitive::Sphere { radius: 0.02 }, [1.0, 0.0, 0.0]);
        assert!(!scene.is_attached(node));

        scene.attach(node);
        scene.set_transform(node, Vec3::ONE, Quat::IDENTITY);
        assert_eq!(scene.attached_count(), 1);
        assert_eq!(scene.transform(node), Some((Vec3::ONE, Quat::IDENTITY)));

        scene.detach(node);
        scene.detach(node);
        assert!(!scene.is_attached(node));
        assert_eq!(scene.node(node).map(|n| n.detach_calls), Some(2));
    }

    #[test]
    fn test_assets_fail_on_missing() {
        let mut assets = ProceduralAssets::new()
            .with_missing("/models/gone.fbx")
            .with_duration("/models/ZDying.fbx", 4.0);

        assert!(matches!(
            assets.load_skinned_model("/models/gone.fbx"),
            Err(AssetError::NotFound(_))
        ));
        let clip = assets.load_animation_clip("/models/ZDying.fbx").unwrap();
        assert_eq!(clip.name, "ZDying");
        assert_eq!(clip.duration, 4.0);
        assert_eq!(assets.loads(), 1);
    }

    #[test]
    fn test_audio_states() {
        let mut audio = HeadlessAudio::new().with_missing("gone.mp3");
        assert!(audio.load("gone.mp3").is_none());

        let growl = audio.load("growl.mp3").unwrap();
        audio.play(growl);
        audio.pause(growl);
        assert_eq!(audio.state(growl), Some(SoundState::Paused));
        assert_eq!(audio.plays_of("growl.mp3"), 1);
    }
}

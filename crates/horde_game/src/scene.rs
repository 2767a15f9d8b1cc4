//! Collaborator interfaces
//!
//! Rendering, audio and asset I/O live outside this crate. The simulation
//! only talks to them through these traits, using opaque [`NodeId`] and
//! [`SoundHandle`] values that the collaborator hands out.

use crate::error::AssetError;
use glam::{Quat, Vec3};
use horde_core::{NodeId, SoundHandle};
use serde::{Deserialize, Serialize};

/// Simple renderable shapes the simulation asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    Cylinder { half_height: f32, radius: f32 },
    /// Infinite ground plane
    Plane,
    /// Billboarded health bar
    LifeBar { width: f32, height: f32 },
    /// Pick-up marker
    PowerUp,
}

/// A named animation clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds at a time scale of 1
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// A loaded skinned model: its scene node and the clips baked into it
#[derive(Debug, Clone, PartialEq)]
pub struct SkinnedModel {
    pub node: NodeId,
    pub clips: Vec<AnimationClip>,
}

/// How a clip should be played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlayback {
    pub looping: bool,
    pub time_scale: f32,
}

impl ClipPlayback {
    pub fn looped(time_scale: f32) -> Self {
        Self {
            looping: true,
            time_scale,
        }
    }

    pub fn once(time_scale: f32) -> Self {
        Self {
            looping: false,
            time_scale,
        }
    }
}

/// The render scene graph
pub trait RenderScene {
    /// Create a node for a primitive shape. The node is not attached yet
    fn create_primitive(&mut self, primitive: Primitive, color: [f32; 3]) -> NodeId;

    fn attach(&mut self, node: NodeId);

    /// Detach and release a node. Unknown nodes are ignored
    fn detach(&mut self, node: NodeId);

    fn set_transform(&mut self, node: NodeId, position: Vec3, rotation: Quat);

    fn set_visible(&mut self, node: NodeId, visible: bool);

    /// Fill level and colour of a bar-like node
    fn set_fill(&mut self, node: NodeId, fraction: f32, color: [f32; 3]);

    fn play_animation(&mut self, node: NodeId, clip: &AnimationClip, playback: ClipPlayback);

    fn stop_animations(&mut self, node: NodeId);

    /// Fade a node's materials out over `duration` seconds
    fn fade_out(&mut self, node: NodeId, duration: f32);

    /// Paint a splat at a surface contact
    fn add_decal(&mut self, position: Vec3, normal: Vec3, color: [f32; 3]);
}

/// Sound playback
pub trait AudioSink {
    /// Prepare a sound. `None` if it could not be loaded
    fn load(&mut self, path: &str) -> Option<SoundHandle>;

    fn play(&mut self, sound: SoundHandle);

    fn pause(&mut self, sound: SoundHandle);

    fn stop(&mut self, sound: SoundHandle);
}

/// Model and animation loading
pub trait AssetProvider {
    fn load_skinned_model(&mut self, path: &str) -> Result<SkinnedModel, AssetError>;

    fn load_animation_clip(&mut self, path: &str) -> Result<AnimationClip, AssetError>;
}

//! Agent animation bookkeeping
//!
//! The render collaborator owns the actual skeletal playback. This module
//! keeps the logical clock for the one clip an agent is playing so the
//! simulation knows when a one-shot clip (the dying clip) has finished.

use crate::scene::{AnimationClip, ClipPlayback};
use serde::{Deserialize, Serialize};

/// The behaviours an agent has clips for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationSlot {
    Idle,
    Chase,
    Attack,
    Dying,
}

impl AnimationSlot {
    pub const ALL: [AnimationSlot; 4] = [Self::Idle, Self::Chase, Self::Attack, Self::Dying];

    /// Name fragments that identify a clip baked into a model
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Idle => &["idle"],
            Self::Chase => &["chase", "run", "walk"],
            Self::Attack => &["attack"],
            Self::Dying => &["dying", "death"],
        }
    }

    /// Whether a clip with this name belongs to the slot
    pub fn matches(&self, clip_name: &str) -> bool {
        let name = clip_name.to_ascii_lowercase();
        self.keywords().iter().any(|k| name.contains(k))
    }
}

/// Clips bound to an agent, one optional clip per slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationSet {
    idle: Option<AnimationClip>,
    chase: Option<AnimationClip>,
    attack: Option<AnimationClip>,
    dying: Option<AnimationClip>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the first clip of a model whose name matches each slot
    pub fn from_model_clips(clips: &[AnimationClip]) -> Self {
        let mut set = Self::new();
        for slot in AnimationSlot::ALL {
            if let Some(clip) = clips.iter().find(|c| slot.matches(&c.name)) {
                set.bind(slot, clip.clone());
            }
        }
        set
    }

    pub fn get(&self, slot: AnimationSlot) -> Option<&AnimationClip> {
        self.slot(slot).as_ref()
    }

    /// Bind a clip, replacing any previous one
    pub fn bind(&mut self, slot: AnimationSlot, clip: AnimationClip) {
        *self.slot_mut(slot) = Some(clip);
    }

    pub fn is_empty(&self) -> bool {
        AnimationSlot::ALL.iter().all(|s| self.get(*s).is_none())
    }

    fn slot(&self, slot: AnimationSlot) -> &Option<AnimationClip> {
        match slot {
            AnimationSlot::Idle => &self.idle,
            AnimationSlot::Chase => &self.chase,
            AnimationSlot::Attack => &self.attack,
            AnimationSlot::Dying => &self.dying,
        }
    }

    fn slot_mut(&mut self, slot: AnimationSlot) -> &mut Option<AnimationClip> {
        match slot {
            AnimationSlot::Idle => &mut self.idle,
            AnimationSlot::Chase => &mut self.chase,
            AnimationSlot::Attack => &mut self.attack,
            AnimationSlot::Dying => &mut self.dying,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ActiveClip {
    slot: AnimationSlot,
    time: f32,
    duration: f32,
    time_scale: f32,
    looping: bool,
    playing: bool,
}

/// Playback clock for the single active clip of an agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationMixer {
    active: Option<ActiveClip>,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a clip in a slot, replacing whatever was playing
    pub fn play(&mut self, slot: AnimationSlot, clip: &AnimationClip, playback: ClipPlayback) {
        self.active = Some(ActiveClip {
            slot,
            time: 0.0,
            duration: clip.duration,
            time_scale: playback.time_scale,
            looping: playback.looping,
            playing: true,
        });
    }

    /// Change the playback rate of the running clip
    pub fn set_time_scale(&mut self, time_scale: f32) {
        if let Some(active) = &mut self.active {
            active.time_scale = time_scale;
        }
    }

    pub fn stop_all(&mut self) {
        self.active = None;
    }

    /// Advance the clock. Returns true when a one-shot clip just finished
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(active) = &mut self.active else {
            return false;
        };
        if !active.playing || active.duration <= 0.0 {
            return false;
        }

        let time = active.time + dt * active.time_scale;
        if active.looping {
            active.time = time.rem_euclid(active.duration);
            false
        } else if time >= active.duration {
            active.time = active.duration;
            active.playing = false;
            true
        } else {
            active.time = time;
            false
        }
    }

    /// Check if the clip in `slot` is currently running
    pub fn is_running(&self, slot: AnimationSlot) -> bool {
        self.active.is_some_and(|a| a.slot == slot && a.playing)
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some_and(|a| a.playing)
    }

    pub fn current(&self) -> Option<AnimationSlot> {
        self.active.map(|a| a.slot)
    }

    /// Playback position of the active clip in seconds
    pub fn time(&self) -> f32 {
        self.active.map_or(0.0, |a| a.time)
    }

    pub fn time_scale(&self) -> Option<f32> {
        self.active.map(|a| a.time_scale)
    }
}

//! Agent behavior state machine

use serde::{Deserialize, Serialize};

/// What an agent is doing this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Far from the target, cycling the idle clip
    #[default]
    Idle,
    /// Alerted or within sight range, moving toward the target
    Chasing,
    /// In reach of the target, stationary, draining its life
    Attacking,
    /// Health hit zero; the dying clip is playing and teardown is scheduled
    Dying,
    /// Terminal; no body, no node, no more updates
    Removed,
}

impl BehaviorState {
    /// Still taking part in the fight
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Idle | Self::Chasing | Self::Attacking)
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    /// Pick the state for the next frame.
    ///
    /// `Dying` and `Removed` are left only through `die`/`remove`, never
    /// through distance. Band edges resolve toward the closer band.
    pub fn next(self, ctx: &TransitionContext, thresholds: &BehaviorThresholds) -> Self {
        match self {
            Self::Dying | Self::Removed => self,
            Self::Idle | Self::Chasing | Self::Attacking => {
                if ctx.distance <= thresholds.attack_distance {
                    Self::Attacking
                } else if ctx.alerted || ctx.distance <= thresholds.idle_distance {
                    Self::Chasing
                } else {
                    Self::Idle
                }
            }
        }
    }
}

/// Distance bands separating idle, chasing and attacking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorThresholds {
    /// Beyond this the agent idles unless alerted
    pub idle_distance: f32,
    /// At or within this the agent attacks
    pub attack_distance: f32,
}

impl Default for BehaviorThresholds {
    fn default() -> Self {
        Self {
            idle_distance: 50.0,
            attack_distance: 5.0,
        }
    }
}

impl BehaviorThresholds {
    pub fn new(idle_distance: f32, attack_distance: f32) -> Self {
        Self {
            idle_distance,
            attack_distance,
        }
    }
}

/// Inputs to a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionContext {
    /// Ground-plane distance to the target
    pub distance: f32,
    /// Alert flag currently raised
    pub alerted: bool,
}

impl TransitionContext {
    pub fn new(distance: f32, alerted: bool) -> Self {
        Self { distance, alerted }
    }
}

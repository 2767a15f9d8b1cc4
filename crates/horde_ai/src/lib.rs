//! Horde AI - Agent Steering and Behavior
//!
//! This crate decides where an agent goes and what it is doing; it never
//! touches physics or rendering directly.
//!
//! # Features
//!
//! - Obstacle-avoidance steering against axis-aligned obstacle volumes
//! - Pairwise peer separation
//! - Distance-banded behavior state machine (idle, chasing, attacking, dying, removed)
//! - Timed alert flag raised by noise
//!
//! # Example
//!
//! ```ignore
//! use horde_ai::prelude::*;
//!
//! let config = SteeringConfig::default();
//! match compute_avoidance(position, toward_player, &obstacles, 3.0, dt, &config) {
//!     SteeringOutcome::Move(step) => position += step,
//!     SteeringOutcome::Blocked | SteeringOutcome::Degenerate => {}
//! }
//!
//! let next = state.next(&TransitionContext::new(distance, alert.is_active(now)), &thresholds);
//! ```

pub mod alert;
pub mod state_machine;
pub mod steering;

pub mod prelude {
    pub use crate::alert::AlertTimer;
    pub use crate::state_machine::{BehaviorState, BehaviorThresholds, TransitionContext};
    pub use crate::steering::{
        compute_avoidance, is_clear, separation_offset, SteeringConfig, SteeringOutcome,
    };
}

pub use prelude::*;

//! Horde Game - the simulation context
//!
//! Ties the lower crates together into a playable world: zombie agents with
//! animation and sound, the projectile pipeline, body-to-node sync,
//! rejection-sampling placement, deferred teardown, level flow and
//! power-ups. Rendering, audio and asset loading stay behind the traits in
//! [`scene`]; [`headless`] provides in-memory versions of all three.
//!
//! # Example
//!
//! ```ignore
//! use horde_game::prelude::*;
//!
//! let mut sim = Simulation::new(GameConfig::default(), HeadlessScene::new(), HeadlessAudio::new())?;
//! sim.build_level(&mut ProceduralAssets::new())?;
//! sim.on_agent_killed(|agent, at| log::info!("{} down at {:?}", agent, at));
//!
//! sim.fire(eye, aim)?;
//! let report = sim.tick(1.0 / 60.0);
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod headless;
pub mod hooks;
pub mod level;
pub mod placement;
pub mod powerup;
pub mod scene;
pub mod scheduler;
pub mod simulation;
pub mod sync;
pub mod zombie;

pub mod prelude {
    pub use crate::animation::{AnimationMixer, AnimationSet, AnimationSlot};
    pub use crate::config::{CombatConfig, GameConfig};
    pub use crate::error::{AssetError, GameError, Result};
    pub use crate::headless::{HeadlessAudio, HeadlessScene, ProceduralAssets};
    pub use crate::hooks::{GameEvent, GameHooks, SubscriberId};
    pub use crate::level::{LevelConfig, LevelProgress};
    pub use crate::placement::{place_agents, place_player, place_structures, FieldConfig, PlacementReport};
    pub use crate::powerup::{PowerUp, PowerUpConfig, PowerUpKind};
    pub use crate::scene::{
        AnimationClip, AssetProvider, AudioSink, ClipPlayback, Primitive, RenderScene, SkinnedModel,
    };
    pub use crate::scheduler::{DeferredTask, Scheduler, TaskId};
    pub use crate::simulation::{LevelReport, ShotReport, Simulation, TickReport};
    pub use crate::sync::{BodyVisualMap, SyncMode};
    pub use crate::zombie::{AgentConfig, ShotOutcome, Zombie};
}

pub use prelude::*;

//! Error types for the game layer

use horde_core::Id;
use horde_physics::PhysicsError;
use thiserror::Error;

/// Failures reported by an [`AssetProvider`](crate::scene::AssetProvider)
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("Model '{0}' has no skeleton")]
    NotSkinned(String),
}

/// Game errors
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(Id),

    #[error("Cannot fire along a zero or non-finite direction")]
    DegenerateAim,
}

/// Result type for game operations
pub type Result<T> = std::result::Result<T, GameError>;

//! Error types for the room ring

use crate::slot::Slot;
use thiserror::Error;

/// Boxed error coming back from a host spawner
pub type SpawnerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Room ring errors
#[derive(Debug, Error)]
pub enum RoomError {
    /// The variant catalog has no templates
    #[error("Room catalog must contain at least one template")]
    EmptyCatalog,

    /// Room size is zero, negative or not finite
    #[error("Invalid room size: {0} (must be finite and > 0)")]
    InvalidRoomSize(f32),

    /// No agent was supplied to read the initial quadrant from
    #[error("No agent reference supplied")]
    MissingAgent,

    /// The host failed to create a room
    #[error("Failed to spawn room in slot {slot}: {source}")]
    Spawn {
        slot: Slot,
        #[source]
        source: SpawnerError,
    },

    /// The host failed to destroy a room
    #[error("Failed to despawn room in slot {slot}: {source}")]
    Despawn {
        slot: Slot,
        #[source]
        source: SpawnerError,
    },

    /// Configuration is well-formed but invalid
    #[error("Invalid room ring configuration: {0}")]
    Config(String),

    /// IO error while loading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl RoomError {
    /// Create a spawn error for a slot
    pub fn spawn(slot: Slot, source: impl Into<SpawnerError>) -> Self {
        RoomError::Spawn {
            slot,
            source: source.into(),
        }
    }

    /// Create a despawn error for a slot
    pub fn despawn(slot: Slot, source: impl Into<SpawnerError>) -> Self {
        RoomError::Despawn {
            slot,
            source: source.into(),
        }
    }
}

/// Result type for room ring operations
pub type Result<T> = std::result::Result<T, RoomError>;

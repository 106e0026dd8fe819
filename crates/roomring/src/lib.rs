//! Roomring - Quadrant Room Ring
//!
//! This crate keeps four rooms arranged around an origin, one per quadrant,
//! and swaps the room diagonally opposite a moving agent whenever the agent
//! crosses into a new quadrant.
//!
//! # Features
//!
//! - Quadrant detection from the agent's x/z signs
//! - Fixed per-slot placement geometry (position + yaw)
//! - Round-robin variant catalog shared by all slots
//! - Host-agnostic spawning through the [`RoomSpawner`] capability
//! - In-memory spawner for headless hosts and tests
//! - TOML configuration
//!
//! # Architecture
//!
//! ```text
//!              z+
//!   ┌──────────┬──────────┐
//!   │  slot 1  │  slot 0  │
//!   │  (x-,z+) │  (x+,z+) │
//! x-├──────────●──────────┤x+
//!   │  slot 2  │  slot 3  │
//!   │  (x-,z-) │  (x+,z-) │
//!   └──────────┴──────────┘
//!              z-
//!
//!  agent enters quadrant q  ──▶  slot (q + 2) % 4 is rebuilt
//! ```
//!
//! # Example
//!
//! ```ignore
//! use roomring::prelude::*;
//!
//! let catalog = RoomCatalog::new(vec!["hall", "library", "vault"])?;
//! let mut ring = RoomRingBuilder::new(catalog)
//!     .with_room_size(20.0)
//!     .with_agent(&Vec3::new(5.0, 0.0, 5.0))
//!     .build(InMemorySpawner::new(), Vec3::ZERO)?;
//!
//! // Once per frame
//! if let Some(swap) = ring.tick(agent_position)? {
//!     println!("slot {} now holds variant {}", swap.slot, swap.variant);
//! }
//! ```

pub mod agent;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod memory;
pub mod quadrant;
pub mod ring;
pub mod slot;
pub mod spawner;

pub mod prelude {
    //! Common imports for room ring functionality
    pub use crate::agent::AgentSource;
    pub use crate::catalog::RoomCatalog;
    pub use crate::config::RoomRingConfig;
    pub use crate::error::{Result, RoomError};
    pub use crate::events::{RingStats, RoomSwap};
    pub use crate::memory::{InMemorySpawner, LiveRoom, RoomId, SpawnOp};
    pub use crate::quadrant::Quadrant;
    pub use crate::ring::{RoomRing, RoomRingBuilder};
    pub use crate::slot::{Pose, Slot};
    pub use crate::spawner::RoomSpawner;
    pub use glam::{Quat, Vec3};
}

pub use prelude::*;

//! Events and counters produced by the ring

use crate::quadrant::Quadrant;
use crate::slot::Slot;
use serde::{Deserialize, Serialize};

/// One destroy-and-create replacement of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSwap {
    /// Slot that was rebuilt
    pub slot: Slot,
    /// Catalog index of the new room
    pub variant: usize,
    /// Last real quadrant before the crossing (`None` if never observed)
    pub previous: Option<Quadrant>,
    /// Quadrant the agent entered
    pub entered: Quadrant,
    /// Tick on which the swap happened
    pub tick: u64,
}

/// Running counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingStats {
    /// Ticks processed
    pub ticks: u64,
    /// Swaps performed
    pub swaps: u64,
}

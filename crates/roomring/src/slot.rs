//! Room slots and their fixed placement geometry

use crate::quadrant::Quadrant;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, SQRT_2};
use std::fmt;

/// Number of slots in the ring
pub const SLOT_COUNT: usize = 4;

/// One of the four fixed room positions around the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot(u8);

impl Slot {
    /// All slots in index order
    pub const ALL: [Slot; SLOT_COUNT] = [Slot(0), Slot(1), Slot(2), Slot(3)];

    /// Create a slot from its index (0-3)
    pub fn new(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Index of this slot (0-3)
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The slot diagonally opposite an agent standing in `quadrant`
    pub fn opposite(quadrant: Quadrant) -> Self {
        Slot(((quadrant.index() + 2) % SLOT_COUNT) as u8)
    }

    /// The slot that sits inside `quadrant`
    pub fn within(quadrant: Quadrant) -> Self {
        Slot(quadrant.index() as u8)
    }

    /// Placement angle around the vertical axis, in radians
    pub fn placement_angle(self) -> f32 {
        FRAC_PI_4 * (2 * self.index() + 1) as f32
    }

    /// Facing yaw in degrees, `45 * (1 - 2i)`
    pub fn yaw_degrees(self) -> f32 {
        45.0 * (1.0 - 2.0 * self.index() as f32)
    }

    /// Placement pose for a room of `room_size`, relative to the ring origin
    pub fn pose(self, room_size: f32) -> Pose {
        let angle = self.placement_angle();
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * room_size * SQRT_2;
        Pose::new(position, self.yaw_degrees())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local position and orientation of a placed room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Offset from the ring origin
    pub position: Vec3,
    /// Rotation about the vertical axis
    pub rotation: Quat,
    /// Same rotation as `rotation`, in degrees
    pub yaw_degrees: f32,
}

impl Pose {
    /// Create a pose from a position and a yaw in degrees
    pub fn new(position: Vec3, yaw_degrees: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw_degrees.to_radians()),
            yaw_degrees,
        }
    }

    /// Yaw wrapped into `[0, 360)`
    pub fn normalized_yaw(&self) -> f32 {
        self.yaw_degrees.rem_euclid(360.0)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            yaw_degrees: 0.0,
        }
    }
}

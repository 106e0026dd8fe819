//! Quadrant detection on the horizontal (x/z) plane

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four 90° sectors around the origin
///
/// The discriminant is the quadrant index used throughout the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Quadrant {
    /// x > 0, z > 0
    PosXPosZ = 0,
    /// x < 0, z > 0
    NegXPosZ = 1,
    /// x < 0, z < 0
    NegXNegZ = 2,
    /// x > 0, z < 0
    PosXNegZ = 3,
}

impl Quadrant {
    /// All quadrants in index order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::PosXPosZ,
        Quadrant::NegXPosZ,
        Quadrant::NegXNegZ,
        Quadrant::PosXNegZ,
    ];

    /// Quadrant of a world position, or `None` when it sits on an axis
    ///
    /// Only x and z are inspected. NaN on either axis also yields `None`.
    pub fn of(position: Vec3) -> Option<Self> {
        Self::from_xz(position.x, position.z)
    }

    /// Quadrant from raw x/z coordinates
    pub fn from_xz(x: f32, z: f32) -> Option<Self> {
        match (x > 0.0, x < 0.0, z > 0.0, z < 0.0) {
            (true, _, true, _) => Some(Quadrant::PosXPosZ),
            (_, true, true, _) => Some(Quadrant::NegXPosZ),
            (_, true, _, true) => Some(Quadrant::NegXNegZ),
            (true, _, _, true) => Some(Quadrant::PosXNegZ),
            _ => None,
        }
    }

    /// Quadrant from its index (0-3)
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Index of this quadrant (0-3)
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The quadrant across the origin
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 2) % 4]
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quadrant::PosXPosZ => "+x+z",
            Quadrant::NegXPosZ => "-x+z",
            Quadrant::NegXNegZ => "-x-z",
            Quadrant::PosXNegZ => "+x-z",
        };
        write!(f, "Q{} ({})", self.index(), label)
    }
}

//! Agent position sources

use glam::Vec3;
use std::cell::Cell;

/// Anything that can report the agent's current world-space position
///
/// Polled once per tick.
pub trait AgentSource {
    /// Current world-space position
    fn world_position(&self) -> Vec3;
}

impl AgentSource for Vec3 {
    fn world_position(&self) -> Vec3 {
        *self
    }
}

impl AgentSource for [f32; 3] {
    fn world_position(&self) -> Vec3 {
        Vec3::from_array(*self)
    }
}

impl AgentSource for Cell<Vec3> {
    fn world_position(&self) -> Vec3 {
        self.get()
    }
}

impl<A: AgentSource + ?Sized> AgentSource for &A {
    fn world_position(&self) -> Vec3 {
        (**self).world_position()
    }
}

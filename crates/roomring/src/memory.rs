//! In-process spawner
//!
//! Keeps live rooms in a map instead of a scene graph. Used by the headless
//! driver and by tests that need to observe every spawn and despawn.

use crate::slot::Pose;
use crate::spawner::RoomSpawner;
use glam::Vec3;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Identifier of a room created by [`InMemorySpawner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// A room currently alive in the spawner
#[derive(Debug, Clone, PartialEq)]
pub struct LiveRoom<T> {
    /// Room identifier
    pub id: RoomId,
    /// Template it was created from
    pub template: T,
    /// Pose relative to the anchor
    pub pose: Pose,
    /// Anchor position at spawn time
    pub anchor: Vec3,
}

impl<T> LiveRoom<T> {
    /// World-space position of the room
    pub fn world_position(&self) -> Vec3 {
        self.anchor + self.pose.position
    }
}

/// Recorded spawner operation
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnOp<T> {
    /// A room was created
    Spawn { id: RoomId, template: T },
    /// A room was destroyed
    Despawn { id: RoomId },
}

/// Errors from the in-memory spawner
#[derive(Debug, Error)]
pub enum InMemoryError {
    /// Template was marked as unavailable
    #[error("Template not available: {0}")]
    TemplateUnavailable(String),

    /// Handle does not refer to a live room
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),
}

/// Spawner that stores rooms in memory
///
/// The parent is the anchor's world position.
#[derive(Debug, Clone)]
pub struct InMemorySpawner<T> {
    rooms: HashMap<RoomId, LiveRoom<T>>,
    ops: Vec<SpawnOp<T>>,
    unavailable: Vec<T>,
    next_id: u64,
}

impl<T: Clone + PartialEq + fmt::Debug> InMemorySpawner<T> {
    /// Create an empty spawner
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            ops: Vec::new(),
            unavailable: Vec::new(),
            next_id: 1,
        }
    }

    /// Make spawning `template` fail
    pub fn with_unavailable(mut self, template: T) -> Self {
        self.unavailable.push(template);
        self
    }

    /// Make spawning `template` fail from now on
    pub fn mark_unavailable(&mut self, template: T) {
        self.unavailable.push(template);
    }

    /// Allow spawning `template` again
    pub fn mark_available(&mut self, template: &T) {
        self.unavailable.retain(|t| t != template);
    }

    /// Look up a live room
    pub fn get(&self, id: RoomId) -> Option<&LiveRoom<T>> {
        self.rooms.get(&id)
    }

    /// Whether a room is still alive
    pub fn is_live(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    /// Number of live rooms
    pub fn live_count(&self) -> usize {
        self.rooms.len()
    }

    /// Live rooms ordered by id
    pub fn live_rooms(&self) -> Vec<&LiveRoom<T>> {
        let mut rooms: Vec<_> = self.rooms.values().collect();
        rooms.sort_by_key(|r| r.id);
        rooms
    }

    /// Every operation performed so far
    pub fn ops(&self) -> &[SpawnOp<T>] {
        &self.ops
    }

    /// Take the operation log, leaving it empty
    pub fn drain_ops(&mut self) -> Vec<SpawnOp<T>> {
        std::mem::take(&mut self.ops)
    }
}

impl<T: Clone + PartialEq + fmt::Debug> Default for InMemorySpawner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + fmt::Debug> RoomSpawner for InMemorySpawner<T> {
    type Template = T;
    type Handle = RoomId;
    type Parent = Vec3;
    type Error = InMemoryError;

    fn spawn(&mut self, template: &T, pose: &Pose, parent: &Vec3) -> Result<RoomId, InMemoryError> {
        if self.unavailable.contains(template) {
            return Err(InMemoryError::TemplateUnavailable(format!("{:?}", template)));
        }

        let id = RoomId(self.next_id);
        self.next_id += 1;

        self.rooms.insert(
            id,
            LiveRoom {
                id,
                template: template.clone(),
                pose: *pose,
                anchor: *parent,
            },
        );
        self.ops.push(SpawnOp::Spawn {
            id,
            template: template.clone(),
        });
        Ok(id)
    }

    fn despawn(&mut self, handle: &RoomId) -> Result<(), InMemoryError> {
        self.rooms
            .remove(handle)
            .ok_or(InMemoryError::RoomNotFound(*handle))?;
        self.ops.push(SpawnOp::Despawn { id: *handle });
        Ok(())
    }
}

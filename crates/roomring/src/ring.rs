//! The quadrant room manager

use crate::agent::AgentSource;
use crate::catalog::RoomCatalog;
use crate::config::{is_recommended_room_size, validate_room_size, RoomRingConfig, RECOMMENDED_ROOM_SIZE};
use crate::error::{Result, RoomError};
use crate::events::{RingStats, RoomSwap};
use crate::quadrant::Quadrant;
use crate::slot::{Pose, Slot, SLOT_COUNT};
use crate::spawner::RoomSpawner;
use glam::Vec3;

/// Four rooms around an origin, rebuilt one at a time as the agent moves
///
/// Slot `i` always sits in quadrant `i`. When the agent enters quadrant `q`,
/// the room in slot `(q + 2) % 4` is destroyed and replaced with the next
/// catalog variant.
pub struct RoomRing<S: RoomSpawner> {
    /// Host spawner
    spawner: S,
    /// Variants in rotation order
    catalog: RoomCatalog<S::Template>,
    /// Node the rooms are parented under
    parent: S::Parent,
    /// Room size used for every placement
    room_size: f32,
    /// Live room per slot; `None` only while a placement is pending
    slots: [Option<S::Handle>; SLOT_COUNT],
    /// Swaps whose despawn succeeded but whose spawn has not yet
    pending: [Option<RoomSwap>; SLOT_COUNT],
    /// Last real quadrant the agent was seen in
    current_quadrant: Option<Quadrant>,
    /// Catalog index of the most recent swap
    next_variant: usize,
    /// Counters
    stats: RingStats,
    /// Swaps from the last tick
    last_events: Vec<RoomSwap>,
}

impl<S: RoomSpawner> RoomRing<S> {
    /// Create the ring and spawn all four rooms with the first variant
    ///
    /// If any of the four spawns fails, the rooms created so far are
    /// destroyed before the error is returned.
    pub fn new<A: AgentSource + ?Sized>(
        mut spawner: S,
        parent: S::Parent,
        catalog: RoomCatalog<S::Template>,
        room_size: f32,
        agent: &A,
    ) -> Result<Self> {
        validate_room_size(room_size)?;
        if !is_recommended_room_size(room_size) {
            let (min, max) = RECOMMENDED_ROOM_SIZE;
            log::warn!(
                "Room size {} is outside the recommended range {}..={}",
                room_size,
                min,
                max
            );
        }

        let mut slots: [Option<S::Handle>; SLOT_COUNT] = Default::default();
        for slot in Slot::ALL {
            let pose = slot.pose(room_size);
            match spawner.spawn(catalog.first(), &pose, &parent) {
                Ok(handle) => {
                    log::debug!("Spawned variant 0 in slot {} at {:?}", slot, pose.position);
                    slots[slot.index()] = Some(handle);
                }
                Err(e) => {
                    let error = RoomError::spawn(slot, e);
                    log::error!("Room ring initialization failed: {}", error);
                    Self::rollback(&mut spawner, &mut slots);
                    return Err(error);
                }
            }
        }

        let current_quadrant = Quadrant::of(agent.world_position());
        log::info!(
            "Room ring ready: {} variants, room size {}, agent in {}",
            catalog.len(),
            room_size,
            current_quadrant.map_or_else(|| "no quadrant".to_string(), |q| q.to_string())
        );

        Ok(Self {
            spawner,
            catalog,
            parent,
            room_size,
            slots,
            pending: Default::default(),
            current_quadrant,
            next_variant: 0,
            stats: RingStats::default(),
            last_events: Vec::new(),
        })
    }

    fn rollback(spawner: &mut S, slots: &mut [Option<S::Handle>; SLOT_COUNT]) {
        for (index, handle) in slots.iter_mut().enumerate() {
            if let Some(handle) = handle.take() {
                if let Err(e) = spawner.despawn(&handle) {
                    log::error!("Failed to despawn room in slot {} during rollback: {}", index, e);
                }
            }
        }
    }

    /// Poll the agent once and advance the ring
    pub fn update<A: AgentSource + ?Sized>(&mut self, agent: &A) -> Result<Option<RoomSwap>> {
        self.tick(agent.world_position())
    }

    /// Advance the ring for one simulation step
    ///
    /// Returns the last swap completed this tick, if any. Positions on an
    /// axis never trigger a swap; the last real quadrant is kept.
    ///
    /// A slot left vacant by a failed spawn is refilled at the start of the
    /// next tick, before the agent's quadrant is looked at.
    pub fn tick(&mut self, agent_position: Vec3) -> Result<Option<RoomSwap>> {
        self.last_events.clear();
        self.stats.ticks += 1;

        self.refill_vacant()?;

        match Quadrant::of(agent_position) {
            None => {
                log::trace!("Agent at {:?} is on an axis, keeping {:?}", agent_position, self.current_quadrant);
            }
            Some(entered) if self.current_quadrant != Some(entered) => self.enter(entered)?,
            Some(_) => {}
        }

        Ok(self.last_events.last().copied())
    }

    /// Retry every placement left pending by an earlier failed spawn
    fn refill_vacant(&mut self) -> Result<()> {
        for slot in Slot::ALL {
            if let Some(pending) = self.pending[slot.index()] {
                log::debug!("Retrying variant {} in vacant slot {}", pending.variant, slot);
                self.place(RoomSwap {
                    tick: self.stats.ticks,
                    ..pending
                })?;
            }
        }
        Ok(())
    }

    /// Rebuild the slot opposite `entered` with the next variant
    ///
    /// The transition is committed once the old room is gone. A failed
    /// despawn leaves the ring untouched, so the next tick retries it.
    fn enter(&mut self, entered: Quadrant) -> Result<()> {
        let slot = Slot::opposite(entered);
        let swap = RoomSwap {
            slot,
            variant: self.catalog.next_index(self.next_variant),
            previous: self.current_quadrant,
            entered,
            tick: self.stats.ticks,
        };

        if let Some(old) = &self.slots[slot.index()] {
            self.spawner
                .despawn(old)
                .map_err(|e| RoomError::despawn(slot, e))?;
            self.slots[slot.index()] = None;
        }

        self.next_variant = swap.variant;
        self.current_quadrant = Some(entered);
        self.place(swap)
    }

    /// Spawn the swap's variant into its slot
    ///
    /// On failure the swap stays pending and the slot stays vacant.
    fn place(&mut self, swap: RoomSwap) -> Result<()> {
        let slot = swap.slot;
        let pose = self.pose(slot);
        match self
            .spawner
            .spawn(self.catalog.get(swap.variant), &pose, &self.parent)
        {
            Ok(handle) => {
                self.slots[slot.index()] = Some(handle);
                self.pending[slot.index()] = None;
                self.stats.swaps += 1;
                self.last_events.push(swap);
                log::debug!(
                    "Agent in {}, rebuilt slot {} with variant {}",
                    swap.entered,
                    slot,
                    swap.variant
                );
                Ok(())
            }
            Err(e) => {
                self.pending[slot.index()] = Some(swap);
                Err(RoomError::spawn(slot, e))
            }
        }
    }

    /// Destroy all four rooms and hand the spawner back
    ///
    /// Every slot is attempted; the first failure is returned.
    pub fn teardown(mut self) -> Result<S> {
        let mut first_error = None;
        for slot in Slot::ALL {
            if let Some(handle) = self.slots[slot.index()].take() {
                if let Err(e) = self.spawner.despawn(&handle) {
                    let error = RoomError::despawn(slot, e);
                    log::error!("{}", error);
                    first_error.get_or_insert(error);
                }
            }
        }

        log::info!(
            "Room ring torn down after {} ticks and {} swaps",
            self.stats.ticks,
            self.stats.swaps
        );

        match first_error {
            Some(error) => Err(error),
            None => Ok(self.spawner),
        }
    }

    // ==================== Queries ====================

    /// Handle of the room in `slot`
    pub fn room(&self, slot: Slot) -> Option<&S::Handle> {
        self.slots[slot.index()].as_ref()
    }

    /// All slots with their rooms
    pub fn rooms(&self) -> impl Iterator<Item = (Slot, Option<&S::Handle>)> + '_ {
        Slot::ALL.into_iter().map(move |slot| (slot, self.room(slot)))
    }

    /// Whether every slot holds a room
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Swap waiting to be placed in `slot` after a failed spawn
    pub fn pending(&self, slot: Slot) -> Option<&RoomSwap> {
        self.pending[slot.index()].as_ref()
    }

    /// Pose of `slot`, relative to the parent
    pub fn pose(&self, slot: Slot) -> Pose {
        slot.pose(self.room_size)
    }

    /// Last real quadrant the agent was seen in
    pub fn current_quadrant(&self) -> Option<Quadrant> {
        self.current_quadrant
    }

    /// Catalog index of the most recent swap
    pub fn next_variant(&self) -> usize {
        self.next_variant
    }

    /// Configured room size
    pub fn room_size(&self) -> f32 {
        self.room_size
    }

    /// Variant catalog
    pub fn catalog(&self) -> &RoomCatalog<S::Template> {
        &self.catalog
    }

    /// Parent node
    pub fn parent(&self) -> &S::Parent {
        &self.parent
    }

    /// Counters
    pub fn stats(&self) -> RingStats {
        self.stats
    }

    /// Host spawner
    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Host spawner (mutable)
    pub fn spawner_mut(&mut self) -> &mut S {
        &mut self.spawner
    }

    /// Swaps from the last tick
    pub fn events(&self) -> &[RoomSwap] {
        &self.last_events
    }

    /// Take the swaps from the last tick
    pub fn drain_events(&mut self) -> Vec<RoomSwap> {
        std::mem::take(&mut self.last_events)
    }
}

/// Builder for [`RoomRing`]
#[derive(Debug, Clone)]
pub struct RoomRingBuilder<T> {
    catalog: RoomCatalog<T>,
    room_size: f32,
    agent_position: Option<Vec3>,
}

impl<T> RoomRingBuilder<T> {
    /// Start from a catalog, with the default room size
    pub fn new(catalog: RoomCatalog<T>) -> Self {
        Self {
            catalog,
            room_size: RoomRingConfig::default().room_size,
            agent_position: None,
        }
    }

    /// Set room size
    pub fn with_room_size(mut self, room_size: f32) -> Self {
        self.room_size = room_size;
        self
    }

    /// Read the agent's starting position
    pub fn with_agent<A: AgentSource + ?Sized>(mut self, agent: &A) -> Self {
        self.agent_position = Some(agent.world_position());
        self
    }

    /// Spawn the rooms and return the ring
    pub fn build<S>(self, spawner: S, parent: S::Parent) -> Result<RoomRing<S>>
    where
        S: RoomSpawner<Template = T>,
    {
        let agent = self.agent_position.ok_or(RoomError::MissingAgent)?;
        RoomRing::new(spawner, parent, self.catalog, self.room_size, &agent)
    }
}

impl RoomRingBuilder<String> {
    /// Builder from a validated configuration
    pub fn from_config(config: &RoomRingConfig) -> Result<Self> {
        config.validate()?;
        let catalog = RoomCatalog::new(config.variants.iter().cloned())?;
        Ok(Self::new(catalog).with_room_size(config.room_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemorySpawner, SpawnOp};
    use std::fmt;

    #[derive(Debug)]
    struct HostDown;

    impl fmt::Display for HostDown {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "host down")
        }
    }

    impl std::error::Error for HostDown {}

    /// Spawner that fails after a fixed number of spawns
    struct FlakySpawner {
        spawns_left: usize,
        despawn_failures: usize,
        live: Vec<u32>,
        next: u32,
    }

    impl FlakySpawner {
        fn new(spawns_left: usize) -> Self {
            Self {
                spawns_left,
                despawn_failures: 0,
                live: Vec::new(),
                next: 0,
            }
        }

        fn failing_despawns(mut self, count: usize) -> Self {
            self.despawn_failures = count;
            self
        }
    }

    impl RoomSpawner for FlakySpawner {
        type Template = &'static str;
        type Handle = u32;
        type Parent = ();
        type Error = HostDown;

        fn spawn(&mut self, _: &&'static str, _: &Pose, _: &()) -> std::result::Result<u32, HostDown> {
            if self.spawns_left == 0 {
                return Err(HostDown);
            }
            self.spawns_left -= 1;
            self.next += 1;
            self.live.push(self.next);
            Ok(self.next)
        }

        fn despawn(&mut self, handle: &u32) -> std::result::Result<(), HostDown> {
            if self.despawn_failures > 0 {
                self.despawn_failures -= 1;
                return Err(HostDown);
            }
            self.live.retain(|h| h != handle);
            Ok(())
        }
    }

    fn template_of(ring: &RoomRing<InMemorySpawner<&'static str>>, slot: usize) -> &'static str {
        let id = ring.room(Slot::ALL[slot]).unwrap();
        ring.spawner().get(*id).unwrap().template
    }

    fn ring(variants: &[&'static str], start: Vec3) -> RoomRing<InMemorySpawner<&'static str>> {
        RoomRingBuilder::new(RoomCatalog::new(variants.iter().copied()).unwrap())
            .with_room_size(10.0)
            .with_agent(&start)
            .build(InMemorySpawner::new(), Vec3::ZERO)
            .unwrap()
    }

    #[test]
    fn test_new_ring_is_complete() {
        let ring = ring(&["a"], Vec3::new(1.0, 0.0, 1.0));
        assert!(ring.is_complete());
        assert_eq!(ring.spawner().live_count(), 4);
        assert_eq!(ring.current_quadrant(), Some(Quadrant::PosXPosZ));
        assert_eq!(ring.next_variant(), 0);
    }

    #[test]
    fn test_builder_requires_agent() {
        let result = RoomRingBuilder::new(RoomCatalog::single("a"))
            .build(InMemorySpawner::new(), Vec3::ZERO);
        assert!(matches!(result, Err(RoomError::MissingAgent)));
    }

    #[test]
    fn test_invalid_room_size_spawns_nothing() {
        let mut spawner = InMemorySpawner::new();
        let error = RoomRingBuilder::new(RoomCatalog::single("a"))
            .with_room_size(0.0)
            .with_agent(&Vec3::ONE)
            .build(&mut spawner, Vec3::ZERO)
            .err();
        assert!(matches!(error, Some(RoomError::InvalidRoomSize(_))));
        assert!(spawner.ops().is_empty());
    }

    #[test]
    fn test_failed_init_rolls_back() {
        let mut spawner = FlakySpawner::new(2);
        let error = RoomRing::new(&mut spawner, (), RoomCatalog::single("a"), 10.0, &Vec3::ONE)
            .err()
            .expect("third spawn fails");

        match error {
            RoomError::Spawn { slot, .. } => assert_eq!(slot.index(), 2),
            other => panic!("expected spawn error, got {}", other),
        }
        assert!(spawner.live.is_empty());
    }

    #[test]
    fn test_same_quadrant_is_noop() {
        let mut ring = ring(&["a", "b"], Vec3::new(1.0, 0.0, 1.0));
        ring.spawner_mut().drain_ops();

        for step in 1..20 {
            let p = Vec3::new(step as f32, 0.0, 0.5 * step as f32);
            assert!(ring.tick(p).unwrap().is_none());
        }
        assert!(ring.spawner().ops().is_empty());
        assert_eq!(ring.stats().swaps, 0);
        assert_eq!(ring.stats().ticks, 19);
    }

    #[test]
    fn test_axis_keeps_last_quadrant() {
        let mut ring = ring(&["a", "b"], Vec3::new(-1.0, 0.0, -1.0));
        ring.spawner_mut().drain_ops();

        assert!(ring.tick(Vec3::new(0.0, 0.0, -3.0)).unwrap().is_none());
        assert!(ring.tick(Vec3::ZERO).unwrap().is_none());
        assert_eq!(ring.current_quadrant(), Some(Quadrant::NegXNegZ));

        // Coming back to the same quadrant off the axis is still a no-op
        assert!(ring.tick(Vec3::new(-2.0, 0.0, -2.0)).unwrap().is_none());
        assert!(ring.spawner().ops().is_empty());
    }

    #[test]
    fn test_start_on_axis_first_quadrant_swaps() {
        let mut ring = ring(&["a", "b"], Vec3::ZERO);
        assert_eq!(ring.current_quadrant(), None);

        let swap = ring.tick(Vec3::new(1.0, 0.0, 1.0)).unwrap().unwrap();
        assert_eq!(swap.previous, None);
        assert_eq!(swap.entered, Quadrant::PosXPosZ);
        assert_eq!(swap.slot.index(), 2);
        assert_eq!(swap.variant, 1);
    }

    #[test]
    fn test_swap_despawns_before_spawn() {
        let mut ring = ring(&["a", "b"], Vec3::new(1.0, 0.0, 1.0));
        let old = *ring.room(Slot::ALL[3]).unwrap();
        ring.spawner_mut().drain_ops();

        ring.tick(Vec3::new(-1.0, 0.0, 1.0)).unwrap();

        let new = *ring.room(Slot::ALL[3]).unwrap();
        assert_eq!(
            ring.spawner().ops(),
            &[SpawnOp::Despawn { id: old }, SpawnOp::Spawn { id: new, template: "b" }]
        );
    }

    #[test]
    fn test_failed_swap_leaves_slot_vacant_then_refills() {
        let mut ring = ring(&["a", "b", "c"], Vec3::new(1.0, 0.0, 1.0));
        ring.spawner_mut().mark_unavailable("b");

        let result = ring.tick(Vec3::new(-1.0, 0.0, 1.0));
        assert!(matches!(result, Err(RoomError::Spawn { .. })));
        assert!(ring.room(Slot::ALL[3]).is_none());
        assert!(!ring.is_complete());
        assert_eq!(ring.pending(Slot::ALL[3]).map(|s| s.variant), Some(1));
        assert_eq!(ring.current_quadrant(), Some(Quadrant::NegXPosZ));
        assert_eq!(ring.next_variant(), 1);
        assert_eq!(ring.stats().swaps, 0);
        assert_eq!(ring.spawner().live_count(), 3);

        // While the template is still missing, every tick retries and fails
        assert!(ring.tick(Vec3::new(-1.0, 0.0, 1.0)).is_err());
        assert!(ring.room(Slot::ALL[3]).is_none());

        ring.spawner_mut().mark_available(&"b");
        let swap = ring.tick(Vec3::new(-1.0, 0.0, 1.0)).unwrap().unwrap();
        assert_eq!(swap.slot.index(), 3);
        assert_eq!(swap.variant, 1);
        assert_eq!(swap.tick, 3);
        assert!(ring.pending(Slot::ALL[3]).is_none());
        assert!(ring.is_complete());
        assert_eq!(ring.spawner().live_count(), 4);
        assert_eq!(template_of(&ring, 3), "b");
    }

    #[test]
    fn test_vacant_slot_refilled_after_agent_moves_on() {
        let mut ring = ring(&["a", "b", "c"], Vec3::new(1.0, 0.0, 1.0));
        ring.spawner_mut().mark_unavailable("b");
        assert!(ring.tick(Vec3::new(-1.0, 0.0, 1.0)).is_err());

        ring.spawner_mut().mark_available(&"b");
        let swap = ring.tick(Vec3::new(-1.0, 0.0, -1.0)).unwrap().unwrap();

        // The vacant slot is filled first, then the new quadrant is handled
        assert_eq!(swap.slot.index(), 0);
        assert_eq!(swap.variant, 2);
        assert_eq!(swap.previous, Some(Quadrant::NegXPosZ));
        let slots: Vec<usize> = ring.events().iter().map(|s| s.slot.index()).collect();
        assert_eq!(slots, vec![3, 0]);

        for _ in 0..3 {
            assert!(ring.tick(Vec3::new(-1.0, 0.0, -1.0)).unwrap().is_none());
        }
        assert!(ring.is_complete());
        assert_eq!(template_of(&ring, 3), "b");
        assert_eq!(template_of(&ring, 0), "c");
        assert_eq!(ring.spawner().live_count(), 4);
        assert_eq!(ring.stats().swaps, 2);
    }

    #[test]
    fn test_failed_despawn_keeps_room() {
        let spawner = FlakySpawner::new(usize::MAX).failing_despawns(1);
        let mut ring = RoomRing::new(spawner, (), RoomCatalog::new(["a", "b"]).unwrap(), 10.0, &Vec3::ONE).unwrap();
        let old = *ring.room(Slot::ALL[3]).unwrap();

        let result = ring.tick(Vec3::new(-1.0, 0.0, 1.0));
        assert!(matches!(result, Err(RoomError::Despawn { .. })));
        assert_eq!(ring.room(Slot::ALL[3]), Some(&old));
        assert_eq!(ring.current_quadrant(), Some(Quadrant::PosXPosZ));
        assert_eq!(ring.spawner().live.len(), 4);

        // The host recovers; the same transition goes through
        let swap = ring.tick(Vec3::new(-1.0, 0.0, 1.0)).unwrap().unwrap();
        assert_eq!(swap.slot.index(), 3);
        assert_ne!(ring.room(Slot::ALL[3]), Some(&old));
        assert_eq!(ring.spawner().live.len(), 4);

        let spawner = ring.teardown().unwrap();
        assert!(spawner.live.is_empty());
    }

    #[test]
    fn test_drain_events() {
        let mut ring = ring(&["a", "b"], Vec3::new(1.0, 0.0, 1.0));
        ring.tick(Vec3::new(-1.0, 0.0, 1.0)).unwrap();

        let events = ring.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].slot.index(), 3);
        assert!(ring.events().is_empty());
    }

    #[test]
    fn test_events_cleared_each_tick() {
        let mut ring = ring(&["a", "b"], Vec3::new(1.0, 0.0, 1.0));
        ring.tick(Vec3::new(-1.0, 0.0, 1.0)).unwrap();
        assert_eq!(ring.events().len(), 1);

        ring.tick(Vec3::new(-1.0, 0.0, 1.0)).unwrap();
        assert!(ring.events().is_empty());
    }

    #[test]
    fn test_teardown_despawns_everything() {
        let mut ring = ring(&["a", "b"], Vec3::new(1.0, 0.0, 1.0));
        ring.tick(Vec3::new(-1.0, 0.0, -1.0)).unwrap();

        let spawner = ring.teardown().unwrap();
        assert_eq!(spawner.live_count(), 0);
    }

    #[test]
    fn test_from_config() {
        let config = RoomRingConfig::default()
            .with_room_size(15.0)
            .with_variants(["hall", "vault"]);
        let ring = RoomRingBuilder::from_config(&config)
            .unwrap()
            .with_agent(&[3.0f32, 0.0, -3.0])
            .build(InMemorySpawner::new(), Vec3::from_array(config.origin))
            .unwrap();

        assert_eq!(ring.room_size(), 15.0);
        assert_eq!(ring.catalog().len(), 2);
        assert_eq!(ring.current_quadrant(), Some(Quadrant::PosXNegZ));
    }
}

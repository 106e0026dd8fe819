//! Scripted agent walk

use crate::sim_config::SimConfig;
use roomring::prelude::*;

/// Closed loop of waypoints sampled at a fixed number of steps per leg
#[derive(Debug, Clone)]
pub struct Walk {
    points: Vec<Vec3>,
    steps_per_leg: u32,
    laps: u32,
}

impl Walk {
    /// Create a walk
    pub fn new(points: Vec<Vec3>, steps_per_leg: u32, laps: u32) -> Self {
        Self {
            points,
            steps_per_leg: steps_per_leg.max(1),
            laps,
        }
    }

    /// Walk described by the driver configuration
    pub fn from_config(config: &SimConfig) -> Self {
        let points = config.walk.iter().copied().map(Vec3::from_array).collect();
        Self::new(points, config.steps_per_leg, config.laps)
    }

    /// Number of samples the walk produces
    pub fn len(&self) -> usize {
        self.points.len() * self.steps_per_leg as usize * self.laps as usize
    }

    /// Whether the walk produces no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Agent positions, one per tick, relative to the ring origin
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        let n = self.points.len();
        let steps = self.steps_per_leg;
        (0..self.laps).flat_map(move |_| {
            (0..n).flat_map(move |leg| {
                let from = self.points[leg];
                let to = self.points[(leg + 1) % n];
                (0..steps).map(move |step| from.lerp(to, step as f32 / steps as f32))
            })
        })
    }
}

/// Outcome of a completed walk
#[derive(Debug, Clone)]
pub struct WalkReport {
    /// Ring counters at the end of the walk
    pub stats: RingStats,
    /// Every swap, in order
    pub swaps: Vec<RoomSwap>,
    /// Template per slot when the walk ended
    pub final_rooms: Vec<(Slot, String)>,
    /// Live rooms left after teardown
    pub leaked: usize,
}

/// Build the ring, drive it along the walk and tear it down
pub fn run(config: &SimConfig) -> Result<WalkReport> {
    let walk = Walk::from_config(config);
    if walk.is_empty() {
        log::warn!("Walk produces no positions (laps = {})", config.laps);
    } else {
        log::info!("Walking {} positions", walk.len());
    }
    let origin = Vec3::from_array(config.ring.origin);
    let mut positions = walk.positions().peekable();
    let start = positions.peek().copied().unwrap_or(Vec3::ZERO);

    let mut ring = RoomRingBuilder::from_config(&config.ring)?
        .with_agent(&start)
        .build(InMemorySpawner::new(), origin)?;

    let mut swaps = Vec::new();
    for local in positions {
        // Quadrants are measured around the anchor
        let world = origin + local;
        ring.tick(local)?;
        for swap in ring.drain_events() {
            let template = ring.catalog().get(swap.variant);
            log::info!(
                "tick {:>4}: agent {:?} entered {}, slot {} -> {}",
                swap.tick,
                world.to_array(),
                swap.entered,
                swap.slot,
                template
            );
            swaps.push(swap);
        }
    }

    let final_rooms = ring
        .rooms()
        .filter_map(|(slot, id)| {
            let id = id?;
            let room = ring.spawner().get(*id)?;
            Some((slot, room.template.clone()))
        })
        .collect();
    let stats = ring.stats();

    let spawner = ring.teardown()?;

    Ok(WalkReport {
        stats,
        swaps,
        final_rooms,
        leaked: spawner.live_count(),
    })
}

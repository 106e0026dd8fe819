//! Driver configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `ROOMRING_ROOM_SIZE`, `ROOMRING_VARIANTS`
//! 2. Config file: first CLI argument, or `roomring.toml` in the working directory
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! room_size = 20.0
//! variants = ["hall", "library", "vault"]
//! origin = [0.0, 0.0, 0.0]
//!
//! steps_per_leg = 8
//! laps = 2
//! walk = [[5.0, 0.0, 5.0], [-5.0, 0.0, 5.0], [-5.0, 0.0, -5.0], [5.0, 0.0, -5.0]]
//! ```

use roomring::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "roomring.toml";

/// Complete driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ring settings
    #[serde(flatten)]
    pub ring: RoomRingConfig,
    /// Waypoints the agent walks through, in order
    pub walk: Vec<[f32; 3]>,
    /// Interpolated ticks between consecutive waypoints
    pub steps_per_leg: u32,
    /// Times the waypoint loop is repeated
    pub laps: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        let ring = RoomRingConfig::default().with_variants(["hall", "library", "vault"]);
        let r = ring.room_size * 0.5;
        Self {
            ring,
            // Counter-clockwise through all four quadrants
            walk: vec![[r, 0.0, r], [-r, 0.0, r], [-r, 0.0, -r], [r, 0.0, -r]],
            steps_per_leg: 8,
            laps: 2,
        }
    }
}

impl SimConfig {
    /// Load configuration from all sources
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                log::info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };

        config.apply_overrides(
            std::env::var("ROOMRING_ROOM_SIZE").ok().as_deref(),
            std::env::var("ROOMRING_VARIANTS").ok().as_deref(),
        )?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        log::info!("Loaded driver config from {}", path.display());
        Ok(config)
    }

    /// Apply environment-style overrides
    pub fn apply_overrides(&mut self, room_size: Option<&str>, variants: Option<&str>) -> Result<()> {
        if let Some(value) = room_size {
            let size: f32 = value
                .trim()
                .parse()
                .map_err(|_| RoomError::Config(format!("ROOMRING_ROOM_SIZE is not a number: {}", value)))?;
            self.ring.room_size = size;
            log::info!("Room size from env: {}", size);
        }

        if let Some(value) = variants {
            let names: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            log::info!("Variants from env: {:?}", names);
            self.ring.variants = names;
        }

        Ok(())
    }

    /// Validate ring settings and the walk
    pub fn validate(&self) -> Result<()> {
        self.ring.validate()?;
        if self.walk.is_empty() {
            return Err(RoomError::Config("walk needs at least one waypoint".to_string()));
        }
        if self.walk.iter().flatten().any(|c| !c.is_finite()) {
            return Err(RoomError::Config("walk contains a non-finite coordinate".to_string()));
        }
        if self.steps_per_leg == 0 {
            return Err(RoomError::Config("steps_per_leg must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        log::info!("Room ring configuration:");
        log::info!("  Room size: {}", self.ring.room_size);
        log::info!("  Variants: {}", self.ring.variants.join(", "));
        log::info!("  Origin: {:?}", self.ring.origin);
        log::info!(
            "  Walk: {} waypoints x {} laps, {} steps per leg",
            self.walk.len(),
            self.laps,
            self.steps_per_leg
        );
    }
}

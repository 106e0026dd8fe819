//! Room ring configuration

use crate::error::{Result, RoomError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Recommended room size range; sizes outside it work but are logged
pub const RECOMMENDED_ROOM_SIZE: (f32, f32) = (1.0, 50.0);

/// Room ring configuration
///
/// # Example Config File
///
/// ```toml
/// room_size = 20.0
/// variants = ["hall", "library", "vault"]
/// origin = [0.0, 0.0, 0.0]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomRingConfig {
    /// Half-extent of a room; slot centres sit at `(±room_size, 0, ±room_size)`
    pub room_size: f32,

    /// Template names in rotation order
    pub variants: Vec<String>,

    /// World position of the ring anchor
    pub origin: [f32; 3],
}

impl Default for RoomRingConfig {
    fn default() -> Self {
        Self {
            room_size: 20.0,
            variants: vec!["room_a".to_string()],
            origin: [0.0, 0.0, 0.0],
        }
    }
}

impl RoomRingConfig {
    /// Set room size
    pub fn with_room_size(mut self, room_size: f32) -> Self {
        self.room_size = room_size;
        self
    }

    /// Set variant names
    pub fn with_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants = variants.into_iter().map(Into::into).collect();
        self
    }

    /// Set anchor position
    pub fn with_origin(mut self, x: f32, y: f32, z: f32) -> Self {
        self.origin = [x, y, z];
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded room ring config from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| RoomError::Config(e.to_string()))
    }

    /// Check room size and variants
    pub fn validate(&self) -> Result<()> {
        validate_room_size(self.room_size)?;
        if self.variants.is_empty() {
            return Err(RoomError::EmptyCatalog);
        }
        if let Some(pos) = self.variants.iter().position(|v| v.trim().is_empty()) {
            return Err(RoomError::Config(format!("variant {} has an empty name", pos)));
        }
        if self.origin.iter().any(|c| !c.is_finite()) {
            return Err(RoomError::Config(format!("origin {:?} is not finite", self.origin)));
        }
        Ok(())
    }
}

/// Reject non-positive or non-finite sizes
pub fn validate_room_size(room_size: f32) -> Result<()> {
    if !room_size.is_finite() || room_size <= 0.0 {
        return Err(RoomError::InvalidRoomSize(room_size));
    }
    Ok(())
}

/// Whether `room_size` lies inside [`RECOMMENDED_ROOM_SIZE`]
pub fn is_recommended_room_size(room_size: f32) -> bool {
    let (min, max) = RECOMMENDED_ROOM_SIZE;
    (min..=max).contains(&room_size)
}

//! Ordered room variant catalog

use crate::error::{Result, RoomError};

/// Ordered, non-empty list of room templates
///
/// Templates are opaque to the ring; it only hands them back to the spawner.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomCatalog<T> {
    templates: Vec<T>,
}

impl<T> RoomCatalog<T> {
    /// Create a catalog, rejecting an empty template list
    pub fn new(templates: impl IntoIterator<Item = T>) -> Result<Self> {
        let templates: Vec<T> = templates.into_iter().collect();
        if templates.is_empty() {
            return Err(RoomError::EmptyCatalog);
        }
        Ok(Self { templates })
    }

    /// Catalog holding a single template
    pub fn single(template: T) -> Self {
        Self {
            templates: vec![template],
        }
    }

    /// Number of variants
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `false`; a catalog holds at least one template
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Template at `index`, wrapping around the catalog length
    pub fn get(&self, index: usize) -> &T {
        &self.templates[index % self.templates.len()]
    }

    /// The template every slot starts with
    pub fn first(&self) -> &T {
        &self.templates[0]
    }

    /// Index that follows `index` in the rotation
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.templates.len()
    }
}

//! In-memory storage backend for testing and development

use crate::core::error::PersistenceError;
use crate::core::location::Location;
use crate::core::store::Storage;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};

const BACKEND: &str = "in_memory";

/// In-memory location storage
///
/// Keeps insertion order. Uses RwLock for thread-safe access; clones share
/// the same map.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    locations: Arc<RwLock<IndexMap<String, Location>>>,
}

impl InMemoryStorage {
    /// Create an empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-filled with `locations`
    pub fn with_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        let map = locations
            .into_iter()
            .map(|loc| (loc.id.clone(), loc))
            .collect();
        Self {
            locations: Arc::new(RwLock::new(map)),
        }
    }
}

fn lock_error(e: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::backend(BACKEND, format!("Failed to acquire lock: {}", e))
}

#[async_trait]
impl Storage for InMemoryStorage {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn get(&self, id: &str) -> Result<Option<Location>, PersistenceError> {
        let locations = self.locations.read().map_err(lock_error)?;

        Ok(locations.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Location>, PersistenceError> {
        let locations = self.locations.read().map_err(lock_error)?;

        Ok(locations.values().cloned().collect())
    }

    async fn put(&self, location: &Location) -> Result<(), PersistenceError> {
        let mut locations = self.locations.write().map_err(lock_error)?;

        locations.insert(location.id.clone(), location.clone());

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, PersistenceError> {
        let mut locations = self.locations.write().map_err(lock_error)?;

        Ok(locations.shift_remove(id).is_some())
    }
}

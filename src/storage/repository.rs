//! `RecordStore` implementation over any [`Storage`] backend

use crate::core::clock::{Clock, SystemClock};
use crate::core::error::ServiceError;
use crate::core::location::{Location, LocationDraft};
use crate::core::service::RecordStore;
use crate::core::store::Storage;
use crate::core::validation::{validate_draft, validate_location, validate_stored};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Location record store.
///
/// Owns id assignment, timestamps and boundary validation; the backend only
/// moves bytes. Records read back from the backend are re-validated, so a
/// malformed record fails loudly instead of reaching queries.
///
/// # Example
///
/// ```rust,ignore
/// let store = LocationRepository::new(InMemoryStorage::new());
/// let loc = store
///     .create(LocationDraft::new("Jaffa Port", 4, GeoPoint::new(32.05, 34.75)))
///     .await?;
/// assert_eq!(loc.created_at, loc.updated_at);
/// ```
pub struct LocationRepository<S: Storage> {
    storage: S,
    clock: Arc<dyn Clock>,
}

impl<S: Storage> LocationRepository<S> {
    /// Create a repository stamping records with wall-clock time
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    /// Create a repository with an explicit time source
    pub fn with_clock(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// The underlying backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    async fn fresh_id(&self) -> Result<String, ServiceError> {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.storage.contains(&id).await? {
                return Ok(id);
            }
        }
    }

    fn checked(location: Location) -> Result<Location, ServiceError> {
        validate_stored(&location)?;
        Ok(location)
    }
}

impl<S: Storage + Clone> Clone for LocationRepository<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[async_trait]
impl<S: Storage> RecordStore for LocationRepository<S> {
    async fn create(&self, draft: LocationDraft) -> Result<Location, ServiceError> {
        let fields = validate_draft(&draft).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected location draft");
        })?;

        let now = self.clock.now_millis();
        let location = Location {
            id: self.fresh_id().await?,
            name: fields.name,
            rate: fields.rate,
            geo: fields.geo,
            created_at: now,
            updated_at: now,
        };

        self.storage.put(&location).await?;
        tracing::info!(
            id = %location.id,
            backend = self.storage.name(),
            "Location created"
        );
        Ok(location)
    }

    async fn update(&self, location: Location) -> Result<Location, ServiceError> {
        let existing = self
            .storage
            .get(&location.id)
            .await?
            .ok_or_else(|| ServiceError::not_found(&location.id))?;

        let fields = validate_location(&location).inspect_err(|e| {
            tracing::warn!(id = %location.id, error = %e, "Rejected location update");
        })?;

        let updated = Location {
            id: existing.id,
            name: fields.name,
            rate: fields.rate,
            geo: fields.geo,
            created_at: existing.created_at,
            updated_at: self.clock.now_millis().max(existing.created_at),
        };

        self.storage.put(&updated).await?;
        tracing::info!(id = %updated.id, "Location updated");
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        if !self.storage.delete(id).await? {
            return Err(ServiceError::not_found(id));
        }
        tracing::info!(id, "Location removed");
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Location, ServiceError> {
        let location = self
            .storage
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(id))?;
        Self::checked(location)
    }

    async fn get_all(&self) -> Result<Vec<Location>, ServiceError> {
        let locations = self.storage.list().await?;
        tracing::debug!(count = locations.len(), "Loaded locations");
        locations.into_iter().map(Self::checked).collect()
    }
}

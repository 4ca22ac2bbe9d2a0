//! Facade wiring a record store to queries, statistics and distances
//!
//! This is the entry point a UI layer talks to: mutate through
//! [`TravelLog::store`], fetch the display list with [`TravelLog::query`],
//! then the summaries with [`TravelLog::rating_stats`] and
//! [`TravelLog::recency_stats`].

use crate::config::{ServiceConfig, StorageConfig};
use crate::core::clock::{Clock, SystemClock};
use crate::core::error::ServiceError;
use crate::core::location::{LatLng, Location};
use crate::core::query::{self, FilterCriteria, QueryParams, SortCriteria};
use crate::core::service::RecordStore;
use crate::geo;
use crate::stats::{self, TierCounts};
use crate::storage::{InMemoryStorage, JsonFileStorage, LocationRepository};
use serde::Serialize;
use std::sync::Arc;

/// A location annotated with its distance from a reference position
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistancedLocation {
    #[serde(flatten)]
    pub location: Location,

    /// Kilometers, two decimals; `None` when no reference position is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// The location data service
#[derive(Clone)]
pub struct TravelLog {
    store: Arc<dyn RecordStore>,
    config: ServiceConfig,
    clock: Arc<dyn Clock>,
}

impl TravelLog {
    /// Wrap an existing store
    pub fn new(store: Arc<dyn RecordStore>, config: ServiceConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Wrap an existing store; `clock` drives recency statistics
    pub fn with_clock(
        store: Arc<dyn RecordStore>,
        config: ServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// Open the backend named by `config`
    pub async fn from_config(config: ServiceConfig) -> Result<Self, ServiceError> {
        Self::from_config_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Open the backend named by `config`, stamping records with `clock`
    pub async fn from_config_with_clock(
        config: ServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ServiceError> {
        config.validate()?;

        let store: Arc<dyn RecordStore> = match &config.storage {
            StorageConfig::InMemory => Arc::new(LocationRepository::with_clock(
                InMemoryStorage::new(),
                clock.clone(),
            )),
            StorageConfig::JsonFile { path } => Arc::new(LocationRepository::with_clock(
                JsonFileStorage::open(path).await?,
                clock.clone(),
            )),
            #[cfg(feature = "lmdb")]
            StorageConfig::Lmdb { path } => Arc::new(LocationRepository::with_clock(
                crate::storage::LmdbStorage::open(path)?,
                clock.clone(),
            )),
            #[cfg(not(feature = "lmdb"))]
            StorageConfig::Lmdb { .. } => {
                return Err(crate::core::error::ConfigError::invalid(
                    "storage.backend",
                    "lmdb backend requires the `lmdb` feature",
                )
                .into());
            }
        };

        tracing::info!(storage = ?config.storage, "Travel log opened");
        Ok(Self::with_clock(store, config, clock))
    }

    /// The record store, for create/update/remove/get
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Filtered and sorted snapshot
    pub async fn query(
        &self,
        filter: &FilterCriteria,
        sort: &SortCriteria,
    ) -> Result<Vec<Location>, ServiceError> {
        let locations = self.store.get_all().await?;
        Ok(query::query(locations, filter, sort))
    }

    /// Snapshot using the configured default filter and sort
    pub async fn list(&self) -> Result<Vec<Location>, ServiceError> {
        self.query(&self.config.query.filter, &self.config.query.sort)
            .await
    }

    /// Snapshot for URL query parameters, sorted by the configured default
    pub async fn query_params(&self, params: &QueryParams) -> Result<Vec<Location>, ServiceError> {
        self.query(&params.filter_criteria(), &self.config.query.sort)
            .await
    }

    /// Rating tier counts over every stored location
    pub async fn rating_stats(&self) -> Result<TierCounts, ServiceError> {
        let locations = self.store.get_all().await?;
        Ok(stats::by_rating_tier(
            &locations,
            &self.config.stats.rating_tiers,
        ))
    }

    /// Recency tier counts over every stored location, relative to now
    pub async fn recency_stats(&self) -> Result<TierCounts, ServiceError> {
        let locations = self.store.get_all().await?;
        Ok(stats::by_recency_tier(
            &locations,
            &self.config.stats.recency_tiers,
            self.clock.now_millis(),
        ))
    }

    /// Distance of one location from `origin`
    pub fn distance_to(origin: LatLng, location: &Location) -> f64 {
        geo::distance(origin, location.geo.lat_lng())
    }

    /// Annotate each location with its distance from `origin`, keeping order
    pub fn with_distances(
        locations: Vec<Location>,
        origin: Option<LatLng>,
    ) -> Vec<DistancedLocation> {
        locations
            .into_iter()
            .map(|location| DistancedLocation {
                distance_km: origin.map(|o| Self::distance_to(o, &location)),
                location,
            })
            .collect()
    }
}

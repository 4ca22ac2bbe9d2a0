//! # Travel Tip
//!
//! Location data service for a travel log: a persistent record store of
//! named, rated geographic locations, plus the derived views a UI needs.
//!
//! ## Features
//!
//! - **Record Store**: create, update, remove and fetch locations with
//!   boundary validation and managed timestamps
//! - **Pluggable Backends**: in-memory, single JSON file, or LMDB
//!   (`--features lmdb`)
//! - **Query Engine**: case-insensitive name search, minimum rating and
//!   stable multi-key sorting
//! - **Geodesic Distance**: haversine great-circle distance in kilometers
//! - **Statistics**: rating and recency tier counts with percentages that
//!   always sum to 100
//! - **Configuration-Based**: storage backend, default query and tier
//!   boundaries via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use travel_tip::prelude::*;
//!
//! let log = TravelLog::from_config(ServiceConfig::default()).await?;
//!
//! log.store()
//!     .create(LocationDraft::new("Jaffa Port", 4, GeoPoint::new(32.05, 34.75)))
//!     .await?;
//!
//! let cafes = log
//!     .query(&FilterCriteria::new("cafe", 3), &SortCriteria::desc("rate"))
//!     .await?;
//! let tiers = log.rating_stats().await?;
//! for segment in tiers.segments() {
//!     println!("{}: {}..{}", segment.label, segment.start, segment.end);
//! }
//! ```

pub mod config;
pub mod core;
pub mod geo;
pub mod stats;
pub mod storage;
pub mod travel_log;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        clock::{Clock, ManualClock, SystemClock},
        entity::Entity,
        error::{ConfigError, PersistenceError, ServiceError, ValidationError},
        field::FieldValue,
        location::{GeoPoint, LatLng, Location, LocationDraft},
        query::{FilterCriteria, QueryParams, SortCriteria, SortDirection},
        service::RecordStore,
        store::Storage,
    };

    // === Derived Views ===
    pub use crate::geo::distance;
    pub use crate::stats::{RatingTiers, RecencyTiers, Segment, TierCounts};
    pub use crate::travel_log::{DistancedLocation, TravelLog};

    // === Storage ===
    #[cfg(feature = "lmdb")]
    pub use crate::storage::LmdbStorage;
    pub use crate::storage::{InMemoryStorage, JsonFileStorage, LocationRepository};

    // === Config ===
    pub use crate::config::{QueryDefaults, ServiceConfig, StatsConfig, StorageConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}

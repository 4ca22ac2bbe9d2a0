//! Core module containing the record model, traits and query engine

pub mod clock;
pub mod entity;
pub mod error;
pub mod field;
pub mod location;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::Entity;
pub use error::{ConfigError, FieldValidationError, PersistenceError, ServiceError, ValidationError};
pub use field::FieldValue;
pub use location::{GeoPoint, LatLng, Location, LocationDraft};
pub use query::{FilterCriteria, QueryParams, SortCriteria, SortDirection};
pub use service::RecordStore;
pub use store::Storage;

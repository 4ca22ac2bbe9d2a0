//! The location record and its input forms

use crate::core::entity::Entity;
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A reference position as supplied by the map collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Geographic position of a location, with the address it was resolved to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub lng: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

impl From<&GeoPoint> for LatLng {
    fn from(geo: &GeoPoint) -> Self {
        geo.lat_lng()
    }
}

/// Unvalidated input of [`RecordStore::create`](crate::core::RecordStore::create)
///
/// `rate` is wide and `geo` optional so that out-of-range or missing values
/// reach validation instead of being unrepresentable at the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LocationDraft {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,

    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rate: i64,

    #[validate(required(message = "is required"))]
    pub geo: Option<GeoPoint>,
}

impl LocationDraft {
    pub fn new(name: impl Into<String>, rate: i64, geo: GeoPoint) -> Self {
        Self {
            name: name.into(),
            rate,
            geo: Some(geo),
        }
    }
}

/// A stored location record.
///
/// Serialized field names are the persisted record format: `id`, `name`,
/// `rate`, `geo`, `createdAt`, `updatedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub rate: u8,
    pub geo: GeoPoint,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Location {
    /// The draft form of this record, used to re-run boundary validation
    pub fn to_draft(&self) -> LocationDraft {
        LocationDraft {
            name: self.name.clone(),
            rate: i64::from(self.rate),
            geo: Some(self.geo.clone()),
        }
    }
}

impl Entity for Location {
    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["name", "rate", "createdAt", "updatedAt", "lat", "lng"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::String(self.id.clone())),
            "name" => Some(FieldValue::String(self.name.clone())),
            "rate" => Some(FieldValue::Integer(i64::from(self.rate))),
            "createdAt" | "created_at" => Some(FieldValue::Timestamp(self.created_at)),
            "updatedAt" | "updated_at" => Some(FieldValue::Timestamp(self.updated_at)),
            "lat" => Some(FieldValue::Float(self.geo.lat)),
            "lng" => Some(FieldValue::Float(self.geo.lng)),
            "address" => Some(
                self.geo
                    .address
                    .clone()
                    .map(FieldValue::String)
                    .unwrap_or(FieldValue::Null),
            ),
            _ => None,
        }
    }
}

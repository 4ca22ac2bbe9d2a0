//! Shared test harness for record store testing
//!
//! Provides location fixtures, a controllable clock start and the
//! `record_store_tests!` conformance suite that every backend runs.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
mod record_store_tests;

use travel_tip::prelude::*;

/// Clock start for every harness-built store
pub const START_MS: i64 = 1_700_000_000_000;

pub const HOUR_MS: i64 = 60 * 60 * 1_000;
pub const DAY_MS: i64 = 24 * HOUR_MS;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A valid draft somewhere in Tel Aviv
pub fn draft(name: &str, rate: i64) -> LocationDraft {
    LocationDraft::new(name, rate, GeoPoint::new(32.0853, 34.7818))
}

pub fn draft_at(name: &str, rate: i64, lat: f64, lng: f64) -> LocationDraft {
    LocationDraft::new(name, rate, GeoPoint::new(lat, lng))
}

/// Five records, two of them cafes; the query tests rely on this exact set
pub fn cafe_drafts() -> Vec<LocationDraft> {
    vec![
        draft_at("Cafe Hafuch", 5, 32.0853, 34.7818),
        draft_at("Jaffa Port", 4, 32.0543, 34.7516),
        draft_at("Carmel Market", 3, 32.0686, 34.7689),
        draft_at("cafe xoho", 2, 32.0790, 34.7705),
        draft_at("Old Bus Station", 1, 32.0557, 34.7796),
    ]
}

/// A stored record built directly, bypassing the repository
pub fn stored(id: &str, name: &str, rate: u8, created_at: i64, updated_at: i64) -> Location {
    Location {
        id: id.to_string(),
        name: name.to_string(),
        rate,
        geo: GeoPoint::new(32.0, 34.8),
        created_at,
        updated_at,
    }
}

/// Create every draft in order, returning the stored records
pub async fn seed(store: &dyn RecordStore, drafts: Vec<LocationDraft>) -> Vec<Location> {
    let mut created = Vec::with_capacity(drafts.len());
    for d in drafts {
        created.push(store.create(d).await.unwrap());
    }
    created
}

pub fn names(locations: &[Location]) -> Vec<&str> {
    locations.iter().map(|l| l.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

pub fn assert_not_found(err: &ServiceError, id: &str) {
    match err {
        ServiceError::NotFound { id: missing } => assert_eq!(missing, id),
        other => panic!("Expected ServiceError::NotFound({}), got {:?}", id, other),
    }
}

pub fn assert_validation_fields(err: &ServiceError, expected: &[&str]) {
    match err {
        ServiceError::Validation(v) => assert_eq!(v.fields(), expected),
        other => panic!("Expected ServiceError::Validation, got {:?}", other),
    }
}

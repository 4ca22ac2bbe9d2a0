//! Macro-generated test suite for `RecordStore` contract validation.
//!
//! The `record_store_tests!` macro generates a test module that validates a
//! `RecordStore` implementation against the full contract: CRUD, validation
//! at the boundary, timestamp management and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//!
//! record_store_tests!(|clock: Arc<dyn Clock>| async move {
//!     LocationRepository::with_clock(InMemoryStorage::new(), clock)
//! });
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get`: create then retrieve, verify all fields
//! - `test_get_nonexistent`: unknown id is `NotFound`
//! - `test_get_all_empty` / `test_get_all_multiple`
//! - `test_update_existing` / `test_update_nonexistent`
//! - `test_remove_existing` / `test_remove_nonexistent`
//!
//! ## Validation
//! - `test_create_invalid_draft`: rejected, nothing stored
//! - `test_update_invalid_leaves_record`: rejected, stored copy untouched
//!
//! ## Edge Cases
//! - `test_ids_are_unique`
//! - `test_concurrent_access`: parallel creates from spawned tasks

/// Generate a full `RecordStore` conformance test suite.
///
/// `$factory` must be a closure taking an `Arc<dyn Clock>` and returning a
/// future that resolves to a `RecordStore + Clone + 'static`. It is called
/// once per test with a fresh `ManualClock` at `START_MS`.
#[macro_export]
macro_rules! record_store_tests {
    ($factory:expr) => {
        mod record_store_contract_tests {
            use super::*;
            use std::sync::Arc;
            use travel_tip::prelude::*;

            async fn fresh() -> (impl RecordStore + Clone + 'static, Arc<ManualClock>) {
                let clock = Arc::new(ManualClock::new(START_MS));
                let store = ($factory)(clock.clone() as Arc<dyn Clock>).await;
                (store, clock)
            }

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let (store, _clock) = fresh().await;

                let created = store
                    .create(draft_at("  Jaffa Port ", 4, 32.0543, 34.7516))
                    .await
                    .unwrap();
                assert!(!created.id.is_empty());
                assert_eq!(created.name, "Jaffa Port");
                assert_eq!(created.rate, 4);
                assert_eq!(created.geo.lat, 32.0543);
                assert_eq!(created.geo.lng, 34.7516);
                assert_eq!(created.created_at, START_MS);
                assert_eq!(created.updated_at, START_MS);

                let fetched = store.get_by_id(&created.id).await.unwrap();
                assert_eq!(fetched, created);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let (store, _clock) = fresh().await;
                let err = store.get_by_id("no-such-id").await.unwrap_err();
                assert_not_found(&err, "no-such-id");
                assert_eq!(err.error_code(), "LOCATION_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_get_all_empty() {
                let (store, _clock) = fresh().await;
                assert!(store.get_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_get_all_multiple() {
                let (store, _clock) = fresh().await;
                let created = seed(&store, cafe_drafts()).await;

                let all = store.get_all().await.unwrap();
                assert_eq!(all.len(), 5);
                for loc in &created {
                    assert!(all.contains(loc), "{} should be listed", loc.name);
                }
            }

            #[tokio::test]
            async fn test_update_existing() {
                let (store, clock) = fresh().await;
                let mut loc = store.create(draft("Market", 3)).await.unwrap();

                clock.advance(HOUR_MS);
                loc.name = "Night Market".to_string();
                loc.rate = 5;
                let updated = store.update(loc.clone()).await.unwrap();

                assert_eq!(updated.id, loc.id);
                assert_eq!(updated.name, "Night Market");
                assert_eq!(updated.rate, 5);
                assert_eq!(updated.created_at, START_MS);
                assert_eq!(updated.updated_at, START_MS + HOUR_MS);

                let fetched = store.get_by_id(&loc.id).await.unwrap();
                assert_eq!(fetched, updated);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let (store, _clock) = fresh().await;
                let ghost = stored("ghost", "Ghost", 3, START_MS, START_MS);
                let err = store.update(ghost).await.unwrap_err();
                assert_not_found(&err, "ghost");
                assert!(store.get_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_remove_existing() {
                let (store, _clock) = fresh().await;
                let keep = store.create(draft("Keep", 3)).await.unwrap();
                let gone = store.create(draft("Gone", 3)).await.unwrap();

                store.remove(&gone.id).await.unwrap();

                let err = store.get_by_id(&gone.id).await.unwrap_err();
                assert_not_found(&err, &gone.id);
                assert_eq!(store.get_all().await.unwrap(), vec![keep]);
            }

            #[tokio::test]
            async fn test_remove_nonexistent() {
                let (store, _clock) = fresh().await;
                let loc = store.create(draft("Once", 3)).await.unwrap();
                store.remove(&loc.id).await.unwrap();

                let err = store.remove(&loc.id).await.unwrap_err();
                assert_not_found(&err, &loc.id);
            }

            // ==================================================================
            // Validation
            // ==================================================================

            #[tokio::test]
            async fn test_create_invalid_draft() {
                let (store, _clock) = fresh().await;

                let err = store.create(draft("   ", 0)).await.unwrap_err();
                assert_validation_fields(&err, &["name", "rate"]);
                assert_eq!(err.error_code(), "VALIDATION_ERROR");

                let err = store
                    .create(draft_at("Pole", 3, 90.5, 0.0))
                    .await
                    .unwrap_err();
                assert_validation_fields(&err, &["geo.lat"]);

                assert!(store.get_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_update_invalid_leaves_record() {
                let (store, clock) = fresh().await;
                let loc = store.create(draft("Market", 3)).await.unwrap();

                clock.advance(HOUR_MS);
                let mut bad = loc.clone();
                bad.rate = 6;
                let err = store.update(bad).await.unwrap_err();
                assert!(err.is_validation());

                assert_eq!(store.get_by_id(&loc.id).await.unwrap(), loc);
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_ids_are_unique() {
                let (store, _clock) = fresh().await;
                let created = seed(&store, (0..20).map(|i| draft(&format!("Spot {i}"), 3)).collect())
                    .await;

                let mut ids: Vec<&str> = created.iter().map(|l| l.id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();
                assert_eq!(ids.len(), 20);
            }

            #[tokio::test]
            async fn test_concurrent_access() {
                let (store, _clock) = fresh().await;
                let s1 = store.clone();
                let s2 = store.clone();

                let h1 = tokio::spawn(async move { s1.create(draft("Concurrent_A", 2)).await });
                let h2 = tokio::spawn(async move { s2.create(draft("Concurrent_B", 4)).await });

                let (r1, r2) = tokio::time::timeout(std::time::Duration::from_secs(30), async {
                    tokio::try_join!(h1, h2).unwrap()
                })
                .await
                .expect("Concurrent creates timed out after 30s");

                let a = r1.unwrap();
                let b = r2.unwrap();

                let all = store.get_all().await.unwrap();
                assert_eq!(all.len(), 2, "Both concurrently created records should be present");
                assert!(all.contains(&a));
                assert!(all.contains(&b));
            }
        }
    };
}

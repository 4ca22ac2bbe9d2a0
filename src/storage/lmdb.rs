//! LMDB storage backend using heed (memory-mapped B-tree).
//!
//! LMDB is an embedded key-value store, no external server required.
//! All operations are synchronous (memory-mapped I/O) and are wrapped in
//! `tokio::task::spawn_blocking` for async compatibility. A write is
//! durable once its transaction commits, which happens before the returned
//! future resolves.
//!
//! # Databases (named LMDB sub-databases)
//!
//! - `locations`: id string to JSON-encoded `Location`
//!
//! `list` returns records in key (id) order.
//!
//! # Feature flag
//!
//! Enable with `--features lmdb`. Requires the `heed` crate.

use crate::core::error::PersistenceError;
use crate::core::location::Location;
use crate::core::store::Storage;
use async_trait::async_trait;
use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};
use std::path::Path;
use std::sync::Arc;

const BACKEND: &str = "lmdb";

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

/// Encode a location as JSON bytes for LMDB storage.
fn lmdb_encode(location: &Location) -> Result<Vec<u8>, PersistenceError> {
    serde_json::to_vec(location).map_err(|e| PersistenceError::Encode {
        message: e.to_string(),
    })
}

/// Decode a location from JSON bytes.
fn lmdb_decode(bytes: &[u8]) -> Result<Location, PersistenceError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn backend_error(e: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::backend(BACKEND, e)
}

// ---------------------------------------------------------------------------
// LmdbStorage
// ---------------------------------------------------------------------------

/// LMDB-backed implementation of [`Storage`].
///
/// The `Env` is wrapped in an `Arc` for cheap cloning across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use travel_tip::storage::{LmdbStorage, LocationRepository};
///
/// let store = LocationRepository::new(LmdbStorage::open("/tmp/travel-lmdb")?);
/// ```
#[derive(Clone)]
pub struct LmdbStorage {
    env: Arc<Env>,
    db: Database<Str, Bytes>,
}

impl LmdbStorage {
    /// Open (or create) an LMDB environment at `path` and initialise the
    /// `locations` named database.
    ///
    /// The map size defaults to 256 MB. LMDB will not actually allocate that
    /// much, it is a virtual address space reservation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        std::fs::create_dir_all(path.as_ref()).map_err(|source| PersistenceError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(256 * 1024 * 1024)
                .max_dbs(10)
                .max_readers(126)
                .open(path.as_ref())
                .map_err(backend_error)?
        };

        let mut wtxn = env.write_txn().map_err(backend_error)?;
        let db: Database<Str, Bytes> = env
            .create_database(&mut wtxn, Some("locations"))
            .map_err(backend_error)?;
        wtxn.commit().map_err(backend_error)?;

        Ok(Self {
            env: Arc::new(env),
            db,
        })
    }
}

#[async_trait]
impl Storage for LmdbStorage {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn get(&self, id: &str) -> Result<Option<Location>, PersistenceError> {
        let env = self.env.clone();
        let db = self.db;
        let key = id.to_owned();

        tokio::task::spawn_blocking(move || {
            let rtxn = env.read_txn().map_err(backend_error)?;
            match db.get(&rtxn, &key).map_err(backend_error)? {
                Some(bytes) => Ok(Some(lmdb_decode(bytes)?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(backend_error)?
    }

    async fn list(&self) -> Result<Vec<Location>, PersistenceError> {
        let env = self.env.clone();
        let db = self.db;

        tokio::task::spawn_blocking(move || {
            let rtxn = env.read_txn().map_err(backend_error)?;
            let mut results = Vec::new();
            for item in db.iter(&rtxn).map_err(backend_error)? {
                let (_key, bytes) = item.map_err(backend_error)?;
                results.push(lmdb_decode(bytes)?);
            }
            Ok(results)
        })
        .await
        .map_err(backend_error)?
    }

    async fn put(&self, location: &Location) -> Result<(), PersistenceError> {
        let env = self.env.clone();
        let db = self.db;
        let key = location.id.clone();
        let bytes = lmdb_encode(location)?;

        tokio::task::spawn_blocking(move || {
            let mut wtxn = env.write_txn().map_err(backend_error)?;
            db.put(&mut wtxn, &key, &bytes).map_err(backend_error)?;
            wtxn.commit().map_err(backend_error)?;
            Ok(())
        })
        .await
        .map_err(backend_error)?
    }

    async fn delete(&self, id: &str) -> Result<bool, PersistenceError> {
        let env = self.env.clone();
        let db = self.db;
        let key = id.to_owned();

        tokio::task::spawn_blocking(move || {
            let mut wtxn = env.write_txn().map_err(backend_error)?;
            let existed = db.delete(&mut wtxn, &key).map_err(backend_error)?;
            wtxn.commit().map_err(backend_error)?;
            Ok(existed)
        })
        .await
        .map_err(backend_error)?
    }
}

//! JSON file storage backend.
//!
//! The whole collection lives in one JSON document mapping id to location:
//!
//! ```json
//! {
//!   "6f1c...": { "id": "6f1c...", "name": "Jaffa Port", "rate": 4,
//!                "geo": { "lat": 32.05, "lng": 34.75 },
//!                "createdAt": 1700000000000, "updatedAt": 1700000000000 }
//! }
//! ```
//!
//! The file is read once on [`JsonFileStorage::open`] and rewritten on every
//! mutation: the new document goes to a sibling temp file, is synced, then
//! renamed over the original, so a crash mid-write leaves the previous
//! version intact. The in-memory copy only changes after the rename succeeds.

use crate::core::error::PersistenceError;
use crate::core::location::Location;
use crate::core::store::Storage;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

type Collection = IndexMap<String, Location>;

/// File-backed location storage
#[derive(Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    locations: Arc<Mutex<Collection>>,
}

impl JsonFileStorage {
    /// Open the document at `path`, creating parent directories as needed.
    ///
    /// A missing or empty file is an empty collection; nothing is written
    /// until the first mutation.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let io_error = |source| PersistenceError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let locations = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Collection::new(),
            Ok(bytes) => decode(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collection::new(),
            Err(e) => return Err(io_error(e)),
        };

        tracing::debug!(
            path = %path.display(),
            count = locations.len(),
            "Opened JSON location file"
        );

        Ok(Self {
            path,
            locations: Arc::new(Mutex::new(locations)),
        })
    }

    /// Location of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, collection: &Collection) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(collection).map_err(|e| PersistenceError::Encode {
            message: e.to_string(),
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| PersistenceError::Io { path, source }
        };

        let mut file = tokio::fs::File::create(&tmp_path)
            .await
            .map_err(io_error(&tmp_path))?;
        file.write_all(&bytes).await.map_err(io_error(&tmp_path))?;
        file.sync_all().await.map_err(io_error(&tmp_path))?;
        drop(file);

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(io_error(&self.path))
    }
}

fn decode(bytes: &[u8]) -> Result<Collection, PersistenceError> {
    let collection: Collection = serde_json::from_slice(bytes)?;
    if let Some((key, loc)) = collection.iter().find(|(key, loc)| **key != loc.id) {
        return Err(PersistenceError::Corrupted {
            id: key.clone(),
            message: format!("stored under '{}' but carries id '{}'", key, loc.id),
        });
    }
    Ok(collection)
}

#[async_trait]
impl Storage for JsonFileStorage {
    fn name(&self) -> &'static str {
        "json_file"
    }

    async fn get(&self, id: &str) -> Result<Option<Location>, PersistenceError> {
        Ok(self.locations.lock().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Location>, PersistenceError> {
        Ok(self.locations.lock().await.values().cloned().collect())
    }

    async fn put(&self, location: &Location) -> Result<(), PersistenceError> {
        let mut locations = self.locations.lock().await;

        let mut next = locations.clone();
        next.insert(location.id.clone(), location.clone());
        self.persist(&next).await?;
        *locations = next;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, PersistenceError> {
        let mut locations = self.locations.lock().await;
        if !locations.contains_key(id) {
            return Ok(false);
        }

        let mut next = locations.clone();
        next.shift_remove(id);
        self.persist(&next).await?;
        *locations = next;

        Ok(true)
    }
}

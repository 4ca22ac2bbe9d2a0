//! Storage backend trait

use crate::core::error::PersistenceError;
use crate::core::location::Location;
use async_trait::async_trait;

/// A durable key-value medium holding locations keyed by id.
///
/// Backends do no validation and assign nothing; that is the job of the
/// [`RecordStore`](crate::core::RecordStore) layered on top. A `put` or
/// `delete` must be durable before its future resolves, and reads must
/// reflect the most recent write.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Short backend name used in logs and errors
    fn name(&self) -> &'static str;

    /// Fetch one record
    async fn get(&self, id: &str) -> Result<Option<Location>, PersistenceError>;

    /// Fetch every record
    async fn list(&self) -> Result<Vec<Location>, PersistenceError>;

    /// Insert or overwrite the record stored under `location.id`
    async fn put(&self, location: &Location) -> Result<(), PersistenceError>;

    /// Delete a record, returning whether it existed
    async fn delete(&self, id: &str) -> Result<bool, PersistenceError>;

    /// Whether a record exists under `id`
    async fn contains(&self, id: &str) -> Result<bool, PersistenceError> {
        Ok(self.get(id).await?.is_some())
    }
}

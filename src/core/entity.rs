//! Entity trait shared by everything the query and stats layers operate on

use crate::core::field::FieldValue;

/// Base trait for stored records.
///
/// All entities have:
/// - id: Unique opaque identifier
/// - updated_at: Last modification timestamp (epoch milliseconds)
///
/// Sorting and recency bucketing are written against this trait so they do
/// not depend on the concrete record layout.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Get the unique identifier for this entity instance
    fn id(&self) -> &str;

    /// Get the last update timestamp
    fn updated_at(&self) -> i64;

    /// Fields accepted by [`Entity::field_value`]
    fn sortable_fields() -> &'static [&'static str];

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}

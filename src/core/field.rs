//! Field values used for dynamic sorting

use std::cmp::Ordering;

/// A polymorphic field value read off an entity by name
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    /// Epoch milliseconds
    Timestamp(i64),
    Null,
}

impl FieldValue {
    /// Compare two values of the same kind.
    ///
    /// Strings compare lexicographically, numbers and timestamps numerically.
    /// Integers and floats are comparable with each other. Anything else
    /// (mismatched kinds, nulls, NaN) compares equal so a stable sort leaves
    /// the pair where it was.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b))
            | (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Integer(a), FieldValue::Float(b)) => {
                (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Float(a), FieldValue::Integer(b)) => {
                a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
            }
            _ => Ordering::Equal,
        }
    }
}

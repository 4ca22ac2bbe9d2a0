//! Validation and filtering system
//!
//! Every record crossing the store boundary goes through here: drafts on
//! create, full records on update, and records read back from a backend.
//! Fields are normalized by [`filters`] first, then checked by the
//! `validator` derive on [`LocationDraft`]/[`GeoPoint`] and the extra
//! [`validators`].

pub mod filters;
pub mod validators;

use crate::core::error::{FieldValidationError, PersistenceError, ValidationError};
use crate::core::location::{GeoPoint, Location, LocationDraft};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Fields of a draft that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    pub name: String,
    pub rate: u8,
    pub geo: GeoPoint,
}

/// Normalize and validate a draft.
///
/// All failing fields are reported together in a single
/// [`ValidationError::FieldErrors`], sorted by field path.
pub fn validate_draft(draft: &LocationDraft) -> Result<ValidatedFields, ValidationError> {
    let normalized = normalize(draft);
    let mut errors = Vec::new();

    if let Err(e) = normalized.validate() {
        flatten_errors("", &e, &mut errors);
    }

    if let Some(geo) = &normalized.geo {
        if let Err(e) = geo.validate() {
            flatten_errors("geo", &e, &mut errors);
        }
        let finite = validators::finite();
        for (field, value) in [("geo.lat", geo.lat), ("geo.lng", geo.lng)] {
            if let Err(message) = finite(field, value) {
                errors.push(FieldValidationError::new(field, message));
            }
        }
    }

    if !errors.is_empty() {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        return Err(ValidationError::FieldErrors(errors));
    }

    match normalized.geo {
        Some(geo) if (1..=5).contains(&normalized.rate) => Ok(ValidatedFields {
            name: normalized.name,
            rate: normalized.rate as u8,
            geo,
        }),
        // Unreachable once the derive passed; kept so the conversion is total.
        _ => Err(ValidationError::FieldError {
            field: "geo".to_string(),
            message: "is required".to_string(),
        }),
    }
}

/// Validate a full record passed to `update`.
pub fn validate_location(location: &Location) -> Result<ValidatedFields, ValidationError> {
    if let Err(message) = validators::not_blank()("id", &location.id) {
        return Err(ValidationError::FieldError {
            field: "id".to_string(),
            message,
        });
    }
    validate_draft(&location.to_draft())
}

/// Check a record read back from storage.
///
/// A record that fails here was written by something other than this
/// service, or the medium is damaged.
pub fn validate_stored(location: &Location) -> Result<(), PersistenceError> {
    let corrupted = |message: String| PersistenceError::Corrupted {
        id: location.id.clone(),
        message,
    };

    validate_location(location).map_err(|e| corrupted(e.to_string()))?;

    if location.updated_at < location.created_at {
        return Err(corrupted(format!(
            "updatedAt ({}) is before createdAt ({})",
            location.updated_at, location.created_at
        )));
    }
    Ok(())
}

fn normalize(draft: &LocationDraft) -> LocationDraft {
    LocationDraft {
        name: filters::trim(&draft.name),
        rate: draft.rate,
        geo: draft.geo.as_ref().map(|geo| GeoPoint {
            lat: geo.lat,
            lng: geo.lng,
            address: filters::trim_optional(geo.address.as_deref()),
        }),
    }
}

/// Flatten `validator` errors into dotted field paths (`geo.lat`).
fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldValidationError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(FieldValidationError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    flatten_errors(&format!("{}[{}]", path, idx), nested, out);
                }
            }
        }
    }
}

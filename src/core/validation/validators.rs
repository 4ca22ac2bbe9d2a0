//! Reusable field validators
//!
//! Complements the `validator` derive on the record types with the checks it
//! cannot express (finiteness, blank-after-trim).

/// Validator: float must be a finite number
pub fn finite() -> impl Fn(&str, f64) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: f64| {
        if value.is_finite() {
            Ok(())
        } else {
            Err(format!("'{}' must be a finite number (value: {})", field, value))
        }
    }
}

/// Validator: string must contain something other than whitespace
pub fn not_blank() -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &str| {
        if value.trim().is_empty() {
            Err(format!("'{}' must not be blank", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: integer must lie in `[min, max]`
pub fn int_range(
    min: i64,
    max: i64,
) -> impl Fn(&str, i64) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: i64| {
        if value < min || value > max {
            Err(format!(
                "'{}' must be between {} and {} (value: {})",
                field, min, max, value
            ))
        } else {
            Ok(())
        }
    }
}

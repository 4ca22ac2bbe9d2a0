//! Reusable field filters
//!
//! These filters normalize record fields before validation

/// Filter: trim whitespace from a string
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Filter: trim an optional string, dropping it when nothing is left
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Filter: round number to specified decimal places
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

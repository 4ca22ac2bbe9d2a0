//! Query composition: filter and sort criteria over a collection snapshot
//!
//! Queries are pure functions of `(collection, criteria)`. The criteria are
//! plain values owned by the caller (or taken from
//! [`QueryDefaults`](crate::config::QueryDefaults)); nothing here keeps a
//! "current filter".
//!
//! # Example
//! ```rust,ignore
//! let filter = FilterCriteria::new("cafe", 3);
//! let sort = SortCriteria::desc("rate");
//! let shown = query(store.get_all().await?, &filter, &sort);
//! ```

use crate::core::entity::Entity;
use crate::core::error::ValidationError;
use crate::core::field::FieldValue;
use crate::core::location::Location;
use crate::core::validation::validators;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Text-substring and minimum-rating predicate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the name; empty matches everything
    pub txt: String,

    /// Minimum rate; `0` disables the rating filter
    pub min_rate: u8,
}

impl FilterCriteria {
    pub fn new(txt: impl Into<String>, min_rate: u8) -> Self {
        Self {
            txt: txt.into(),
            min_rate,
        }
    }

    /// Whether `location` passes this filter
    pub fn matches(&self, location: &Location) -> bool {
        location.rate >= self.min_rate && contains_ignore_case(&location.name, &self.txt)
    }

    /// True when the filter keeps every record
    pub fn is_noop(&self) -> bool {
        self.txt.is_empty() && self.min_rate == 0
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Sort direction, serialized as `1` / `-1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl TryFrom<i8> for SortDirection {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortDirection::Ascending),
            -1 => Ok(SortDirection::Descending),
            other => Err(format!("sort direction must be 1 or -1, got {}", other)),
        }
    }
}

impl From<SortDirection> for i8 {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// Ordered mapping of field name to direction.
///
/// Serialized as a JSON/YAML object such as `{"rate": -1}`. Conventionally a
/// single key; further keys break ties in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortCriteria(IndexMap<String, SortDirection>);

impl SortCriteria {
    /// No sorting: results keep the snapshot order
    pub fn none() -> Self {
        Self::default()
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::default().then(field, SortDirection::Ascending)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::default().then(field, SortDirection::Descending)
    }

    /// Add a tie-breaking key
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.0.insert(field.into(), direction);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.0.iter().map(|(field, dir)| (field.as_str(), *dir))
    }
}

/// Filter stage: keep records matching `filter`, preserving order
pub fn apply_filter(locations: Vec<Location>, filter: &FilterCriteria) -> Vec<Location> {
    if filter.is_noop() {
        return locations;
    }
    locations
        .into_iter()
        .filter(|loc| filter.matches(loc))
        .collect()
}

/// Sort stage: stable sort by every key of `sort`, in order.
///
/// Fields the entity does not expose compare equal, so they never reorder
/// anything.
pub fn apply_sort<T: Entity>(items: Vec<T>, sort: &SortCriteria) -> Vec<T> {
    if sort.is_empty() || items.len() < 2 {
        return items;
    }

    for (field, _) in sort.iter() {
        if items[0].field_value(field).is_none() {
            tracing::warn!(
                field,
                known = ?T::sortable_fields(),
                "Ignoring unknown sort field"
            );
        }
    }

    let mut keyed: Vec<(Vec<FieldValue>, T)> = items
        .into_iter()
        .map(|item| {
            let keys = sort
                .iter()
                .map(|(field, _)| item.field_value(field).unwrap_or(FieldValue::Null))
                .collect();
            (keys, item)
        })
        .collect();

    // slice::sort_by is stable: ties keep their pre-sort order
    keyed.sort_by(|(a, _), (b, _)| {
        sort.iter()
            .zip(a.iter().zip(b.iter()))
            .map(|((_, dir), (x, y))| dir.apply(x.compare(y)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Filter then sort a snapshot. The full result is returned; an empty
/// result is a normal outcome.
pub fn query(
    locations: Vec<Location>,
    filter: &FilterCriteria,
    sort: &SortCriteria,
) -> Vec<Location> {
    let total = locations.len();
    let result = apply_sort(apply_filter(locations, filter), sort);
    tracing::debug!(total, matched = result.len(), "Query evaluated");
    result
}

/// Query parameters exchanged with the hosting application (URL query
/// string): `txt`, `minRate` and `locId`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryParams {
    pub txt: String,
    pub min_rate: u8,

    /// Initially-displayed record; presentation only, never filters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc_id: Option<String>,
}

impl QueryParams {
    /// Parse raw key/value pairs; unknown keys are ignored.
    ///
    /// An empty `minRate` means 0. A non-numeric or out-of-range `minRate`
    /// is rejected.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = QueryParams::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "txt" => params.txt = value.to_string(),
                "minRate" => params.min_rate = parse_min_rate(value)?,
                "locId" => {
                    params.loc_id = Some(value.trim())
                        .filter(|v| !v.is_empty())
                        .map(str::to_string)
                }
                _ => {}
            }
        }
        Ok(params)
    }

    /// Params reflecting `filter`, keeping no selected record
    pub fn from_filter(filter: &FilterCriteria) -> Self {
        Self {
            txt: filter.txt.clone(),
            min_rate: filter.min_rate,
            loc_id: None,
        }
    }

    pub fn filter_criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.txt.clone(), self.min_rate)
    }

    /// Render back to pairs for URL sync. `locId` is always present, empty
    /// when nothing is selected, so that syncing clears a stale selection.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("txt", self.txt.clone()),
            ("minRate", self.min_rate.to_string()),
            ("locId", self.loc_id.clone().unwrap_or_default()),
        ]
    }
}

fn parse_min_rate(raw: &str) -> Result<u8, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let invalid = |message: String| ValidationError::InvalidParam {
        name: "minRate".to_string(),
        value: raw.to_string(),
        message,
    };
    let value: i64 = raw
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
    validators::int_range(0, 5)("minRate", value).map_err(invalid)?;
    Ok(value as u8)
}

/// Pick the record to display initially, if `loc_id` names one in the list
pub fn select_initial<'a>(locations: &'a [Location], loc_id: Option<&str>) -> Option<&'a Location> {
    let loc_id = loc_id?;
    locations.iter().find(|loc| loc.id == loc_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::GeoPoint;

    fn loc(id: &str, name: &str, rate: u8, updated_at: i64) -> Location {
        Location {
            id: id.to_string(),
            name: name.to_string(),
            rate,
            geo: GeoPoint::new(0.0, 0.0),
            created_at: 0,
            updated_at,
        }
    }

    fn ids(locs: &[Location]) -> Vec<&str> {
        locs.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let locs = vec![loc("a", "X", 1, 0), loc("b", "Y", 5, 0)];
        let result = query(locs, &FilterCriteria::default(), &SortCriteria::none());
        assert_eq!(ids(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let locs = vec![loc("a", "CAFE Noir", 3, 0), loc("b", "Beach", 3, 0)];
        let result = apply_filter(locs, &FilterCriteria::new("caFe", 0));
        assert_eq!(ids(&result), vec!["a"]);
    }

    #[test]
    fn test_min_rate_inclusive() {
        let locs = vec![loc("a", "A", 2, 0), loc("b", "B", 3, 0), loc("c", "C", 4, 0)];
        let result = apply_filter(locs, &FilterCriteria::new("", 3));
        assert_eq!(ids(&result), vec!["b", "c"]);
    }

    #[test]
    fn test_sort_desc_is_stable() {
        let locs = vec![
            loc("a", "A", 3, 0),
            loc("b", "B", 5, 0),
            loc("c", "C", 3, 0),
            loc("d", "D", 5, 0),
        ];
        let result = apply_sort(locs, &SortCriteria::desc("rate"));
        assert_eq!(ids(&result), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_sort_by_name_ascending() {
        let locs = vec![loc("a", "Yafo", 1, 0), loc("b", "Akko", 1, 0), loc("c", "Eilat", 1, 0)];
        let result = apply_sort(locs, &SortCriteria::asc("name"));
        assert_eq!(ids(&result), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_timestamp() {
        let locs = vec![loc("a", "A", 1, 30), loc("b", "B", 1, 10), loc("c", "C", 1, 20)];
        let result = apply_sort(locs, &SortCriteria::desc("updatedAt"));
        assert_eq!(ids(&result), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_tie_breaker_key() {
        let locs = vec![loc("a", "Zed", 4, 0), loc("b", "Alpha", 4, 0), loc("c", "Mid", 5, 0)];
        let sort = SortCriteria::desc("rate").then("name", SortDirection::Ascending);
        let result = apply_sort(locs, &sort);
        assert_eq!(ids(&result), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_unknown_sort_field_keeps_order() {
        let locs = vec![loc("a", "B", 1, 0), loc("b", "A", 5, 0)];
        let result = apply_sort(locs, &SortCriteria::asc("color"));
        assert_eq!(ids(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_criteria_serde() {
        let sort: SortCriteria = serde_json::from_str(r#"{"rate": -1}"#).unwrap();
        assert_eq!(sort, SortCriteria::desc("rate"));
        assert_eq!(serde_json::to_string(&sort).unwrap(), r#"{"rate":-1}"#);
        assert!(serde_json::from_str::<SortCriteria>(r#"{"rate": 2}"#).is_err());
    }

    #[test]
    fn test_filter_criteria_serde_defaults() {
        let filter: FilterCriteria = serde_json::from_str(r#"{"txt":"pier"}"#).unwrap();
        assert_eq!(filter, FilterCriteria::new("pier", 0));
        let filter: FilterCriteria = serde_json::from_str(r#"{"minRate":4}"#).unwrap();
        assert_eq!(filter, FilterCriteria::new("", 4));
    }

    #[test]
    fn test_query_params_from_pairs() {
        let params =
            QueryParams::from_pairs([("txt", "cafe"), ("minRate", "3"), ("locId", "abc")]).unwrap();
        assert_eq!(params.filter_criteria(), FilterCriteria::new("cafe", 3));
        assert_eq!(params.loc_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_query_params_defaults() {
        let params = QueryParams::from_pairs([("minRate", ""), ("locId", ""), ("zoom", "4")]).unwrap();
        assert_eq!(params, QueryParams::default());
    }

    #[test]
    fn test_query_params_rejects_bad_min_rate() {
        for raw in ["abc", "9", "-1"] {
            let err = QueryParams::from_pairs([("minRate", raw)]).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidParam { ref name, .. } if name == "minRate"));
        }
    }

    #[test]
    fn test_query_params_to_pairs_clears_selection() {
        let pairs = QueryParams::from_filter(&FilterCriteria::new("x", 2)).to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("txt", "x".to_string()),
                ("minRate", "2".to_string()),
                ("locId", String::new()),
            ]
        );
    }

    #[test]
    fn test_select_initial() {
        let locs = vec![loc("a", "A", 1, 0), loc("b", "B", 1, 0)];
        assert_eq!(select_initial(&locs, Some("b")).map(|l| l.id.as_str()), Some("b"));
        assert!(select_initial(&locs, Some("zz")).is_none());
        assert!(select_initial(&locs, None).is_none());
    }
}

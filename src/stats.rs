//! Categorical aggregation of locations into named tiers
//!
//! Two dimensions are supported: rating ([`by_rating_tier`]) and recency of
//! the last update ([`by_recency_tier`]). For either, every input record
//! lands in exactly one bucket, so `sum(buckets) == total == input.len()`.
//!
//! Percentages for circular/stacked charts come from [`TierCounts::segments`],
//! which rounds the *running cumulative* share instead of each bucket on its
//! own; segment widths therefore always add up to exactly 100.

use crate::core::entity::Entity;
use crate::core::error::ConfigError;
use crate::core::location::Location;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MILLIS_PER_SEC: i64 = 1_000;

/// A rating bucket holding every rate `>= min_rate` not claimed by a tier
/// with a higher `min_rate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingTier {
    pub name: String,
    pub min_rate: u8,
}

/// A recency bucket holding records updated less than `within_secs` ago.
/// `None` marks the catch-all tier, which must come last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyTier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub within_secs: Option<u64>,
}

/// Validated rating tiers, kept in legend order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RatingTier>", into = "Vec<RatingTier>")]
pub struct RatingTiers(Vec<RatingTier>);

impl RatingTiers {
    /// Tiers must be non-empty, uniquely named, and cover rate 1
    pub fn new(tiers: Vec<RatingTier>) -> Result<Self, ConfigError> {
        check_names(tiers.iter().map(|t| t.name.as_str()), "stats.rating_tiers")?;
        let lowest = tiers.iter().map(|t| t.min_rate).min().unwrap_or(u8::MAX);
        if lowest > 1 {
            return Err(ConfigError::invalid(
                "stats.rating_tiers",
                format!("lowest min_rate is {}, rate 1 would not be counted", lowest),
            ));
        }
        Ok(Self(tiers))
    }

    pub fn tiers(&self) -> &[RatingTier] {
        &self.0
    }

    /// Tier with the greatest `min_rate` not above `rate`
    fn tier_for(&self, rate: u8) -> &str {
        self.0
            .iter()
            .filter(|t| t.min_rate <= rate)
            .max_by_key(|t| t.min_rate)
            .or_else(|| self.0.iter().min_by_key(|t| t.min_rate))
            .map(|t| t.name.as_str())
            .unwrap_or_default()
    }
}

impl Default for RatingTiers {
    /// `high` for 5, `medium` for 3 and 4, `low` below
    fn default() -> Self {
        Self(vec![
            RatingTier {
                name: "high".to_string(),
                min_rate: 5,
            },
            RatingTier {
                name: "medium".to_string(),
                min_rate: 3,
            },
            RatingTier {
                name: "low".to_string(),
                min_rate: 1,
            },
        ])
    }
}

impl TryFrom<Vec<RatingTier>> for RatingTiers {
    type Error = ConfigError;

    fn try_from(tiers: Vec<RatingTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<RatingTiers> for Vec<RatingTier> {
    fn from(tiers: RatingTiers) -> Self {
        tiers.0
    }
}

/// Validated recency tiers, ordered from most recent to catch-all
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RecencyTier>", into = "Vec<RecencyTier>")]
pub struct RecencyTiers(Vec<RecencyTier>);

impl RecencyTiers {
    /// Bounds must strictly increase and the last tier must be the catch-all
    pub fn new(tiers: Vec<RecencyTier>) -> Result<Self, ConfigError> {
        check_names(tiers.iter().map(|t| t.name.as_str()), "stats.recency_tiers")?;
        let (last, bounded) = tiers
            .split_last()
            .ok_or_else(|| ConfigError::invalid("stats.recency_tiers", "no tiers configured"))?;
        if last.within_secs.is_some() {
            return Err(ConfigError::invalid(
                "stats.recency_tiers",
                format!("last tier '{}' must have no within_secs bound", last.name),
            ));
        }
        let mut previous = 0u64;
        for tier in bounded {
            match tier.within_secs {
                Some(bound) if bound > previous => previous = bound,
                Some(bound) => {
                    return Err(ConfigError::invalid(
                        "stats.recency_tiers",
                        format!(
                            "tier '{}' bound {}s must be greater than {}s",
                            tier.name, bound, previous
                        ),
                    ));
                }
                None => {
                    return Err(ConfigError::invalid(
                        "stats.recency_tiers",
                        format!("only the last tier may omit within_secs, not '{}'", tier.name),
                    ));
                }
            }
        }
        Ok(Self(tiers))
    }

    pub fn tiers(&self) -> &[RecencyTier] {
        &self.0
    }

    fn tier_for(&self, age_ms: i64) -> &str {
        self.0
            .iter()
            .find(|t| match t.within_secs {
                Some(secs) => {
                    age_ms < i64::try_from(secs)
                        .unwrap_or(i64::MAX)
                        .saturating_mul(MILLIS_PER_SEC)
                }
                None => true,
            })
            .map(|t| t.name.as_str())
            .unwrap_or_default()
    }
}

impl Default for RecencyTiers {
    /// `today` under 24 hours, `week` under 7 days, `older` after that
    fn default() -> Self {
        Self(vec![
            RecencyTier {
                name: "today".to_string(),
                within_secs: Some(24 * 60 * 60),
            },
            RecencyTier {
                name: "week".to_string(),
                within_secs: Some(7 * 24 * 60 * 60),
            },
            RecencyTier {
                name: "older".to_string(),
                within_secs: None,
            },
        ])
    }
}

impl TryFrom<Vec<RecencyTier>> for RecencyTiers {
    type Error = ConfigError;

    fn try_from(tiers: Vec<RecencyTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<RecencyTiers> for Vec<RecencyTier> {
    fn from(tiers: RecencyTiers) -> Self {
        tiers.0
    }
}

fn check_names<'a>(names: impl Iterator<Item = &'a str>, field: &str) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() || name == "total" {
            return Err(ConfigError::invalid(
                field,
                format!("invalid tier name '{}'", name),
            ));
        }
        if !seen.insert(name) {
            return Err(ConfigError::invalid(
                field,
                format!("duplicate tier name '{}'", name),
            ));
        }
    }
    if seen.is_empty() {
        return Err(ConfigError::invalid(field, "no tiers configured"));
    }
    Ok(())
}

/// Per-tier counts plus their total.
///
/// Serializes flat, e.g. `{"high":1,"medium":2,"low":0,"total":3}`. Every
/// configured tier is present, zero counts included, in legend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    #[serde(flatten)]
    buckets: IndexMap<String, usize>,
    total: usize,
}

/// One slice of a circular chart: `[start, end)` in whole percent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub label: String,
    pub count: usize,
    pub start: u32,
    pub end: u32,
}

impl TierCounts {
    fn empty<'a>(names: impl Iterator<Item = &'a str>) -> Self {
        Self {
            buckets: names.map(|n| (n.to_string(), 0)).collect(),
            total: 0,
        }
    }

    fn add(&mut self, tier: &str) {
        if let Some(count) = self.buckets.get_mut(tier) {
            *count += 1;
            self.total += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Count for `tier`, 0 for unknown tiers
    pub fn get(&self, tier: &str) -> usize {
        self.buckets.get(tier).copied().unwrap_or(0)
    }

    /// `(tier, count)` in legend order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.buckets.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// `round(100 * count / total)`, halves rounding up; 0 when empty
    pub fn percent(&self, tier: &str) -> u32 {
        round_percent(self.get(tier), self.total)
    }

    /// Chart slices for non-empty tiers, using running-cumulative rounding.
    ///
    /// `end` of each slice is the rounded cumulative share, `start` is the
    /// previous slice's `end`; the last slice ends at exactly 100.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut cumulative = 0;
        let mut start = 0;
        for (label, count) in self.iter().filter(|(_, count)| *count > 0) {
            cumulative += count;
            let end = round_percent(cumulative, self.total);
            segments.push(Segment {
                label: label.to_string(),
                count,
                start,
                end,
            });
            start = end;
        }
        segments
    }
}

fn round_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // Integer half-up rounding of 100 * part / total
    ((200 * part + total) / (2 * total)) as u32
}

/// Bucket locations by rating
pub fn by_rating_tier(locations: &[Location], tiers: &RatingTiers) -> TierCounts {
    let mut counts = TierCounts::empty(tiers.tiers().iter().map(|t| t.name.as_str()));
    for loc in locations {
        counts.add(tiers.tier_for(loc.rate));
    }
    tracing::debug!(total = counts.total, "Aggregated rating tiers");
    counts
}

/// Bucket records by time elapsed since their last update.
///
/// Records updated "in the future" (clock skew) count as age zero.
pub fn by_recency_tier<T: Entity>(items: &[T], tiers: &RecencyTiers, now_ms: i64) -> TierCounts {
    let mut counts = TierCounts::empty(tiers.tiers().iter().map(|t| t.name.as_str()));
    for item in items {
        let age = now_ms.saturating_sub(item.updated_at());
        if age < 0 {
            tracing::debug!(id = item.id(), skew_ms = -age, "Record updated after now");
        }
        counts.add(tiers.tier_for(age.max(0)));
    }
    tracing::debug!(total = counts.total, "Aggregated recency tiers");
    counts
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic record, street index, and route adjustment types.
//!
//! This crate contains only data types, configuration structs, and the
//! fixed congestion tables. It has no heavyweight dependencies (no CSV,
//! no regex, no I/O).

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// A single cleaned row of the street-level traffic count dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    /// Upper-cased, trimmed street name as it appears in the dataset.
    pub street_name: String,
    /// Daily vehicle count. Malformed values are stored as `0.0`.
    pub total_count: f64,
    /// Date the count was taken, if present and parseable.
    pub date_count: Option<NaiveDate>,
    /// Cross-street bounds of the count segment (descriptive only).
    pub limits: Option<String>,
}

/// Aggregate statistics for one normalized street name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreetIndexEntry {
    /// Mean of the most recent dated counts, or of all counts when the
    /// street has no dated records.
    pub average_count: f64,
    /// Largest count across every record for the street.
    pub max_count: f64,
    /// Smallest count across every record for the street.
    pub min_count: f64,
    /// Number of raw records that contributed.
    pub sample_size: usize,
}

/// Congestion tier derived from a daily vehicle count.
///
/// Tiers are ordered from least to most congested.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CongestionLevel {
    /// Fewer than 3,000 vehicles/day.
    VeryLow,
    /// 3,000 to 8,000 vehicles/day.
    Low,
    /// 8,000 to 15,000 vehicles/day.
    Moderate,
    /// 15,000 to 25,000 vehicles/day.
    High,
    /// 25,000 vehicles/day and above.
    VeryHigh,
}

/// Exclusive upper bounds of each tier below [`CongestionLevel::VeryHigh`].
const THRESHOLDS: [(f64, CongestionLevel); 4] = [
    (3_000.0, CongestionLevel::VeryLow),
    (8_000.0, CongestionLevel::Low),
    (15_000.0, CongestionLevel::Moderate),
    (25_000.0, CongestionLevel::High),
];

impl CongestionLevel {
    /// Classifies a daily vehicle count. Upper bounds are exclusive, so
    /// a count of exactly `8000` is [`Self::Moderate`].
    #[must_use]
    pub fn from_count(count: f64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(upper, _)| count < *upper)
            .map_or(Self::VeryHigh, |(_, level)| *level)
    }

    /// Travel-time multiplier applied for this tier.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::VeryLow => 0.90,
            Self::Low => 0.95,
            Self::Moderate => 1.00,
            Self::High => 1.15,
            Self::VeryHigh => 1.30,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::VeryLow,
            Self::Low,
            Self::Moderate,
            Self::High,
            Self::VeryHigh,
        ]
    }
}

/// Result of classifying a single street.
///
/// A `level` of `None` is the "no data" sentinel: multiplier `1.0` and no
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Congestion tier, or `None` when the street is not in the index.
    pub level: Option<CongestionLevel>,
    /// Travel-time multiplier for the tier.
    pub multiplier: f64,
    /// Vehicle count the tier was derived from.
    pub count: Option<f64>,
}

impl Classification {
    /// Label used for the "no data" sentinel.
    pub const UNKNOWN: &'static str = "unknown";

    /// The "no data" sentinel.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            level: None,
            multiplier: 1.0,
            count: None,
        }
    }

    /// Classifies a known vehicle count.
    #[must_use]
    pub fn from_count(count: f64) -> Self {
        let level = CongestionLevel::from_count(count);
        Self {
            level: Some(level),
            multiplier: level.multiplier(),
            count: Some(count),
        }
    }

    /// Returns `true` for the "no data" sentinel.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.level.is_none()
    }

    /// Level name, or `"unknown"` for the sentinel.
    #[must_use]
    pub fn level_name(&self) -> &'static str {
        self.level.map_or(Self::UNKNOWN, Into::into)
    }
}

/// How many streets backed a route multiplier. Says nothing about the
/// multiplier's accuracy.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Confidence {
    /// Zero or one matched street.
    Low,
    /// Two to four matched streets.
    Medium,
    /// Five or more matched streets.
    High,
}

impl Confidence {
    /// Confidence for a number of matched streets.
    #[must_use]
    pub const fn from_matched(matched: usize) -> Self {
        match matched {
            0 | 1 => Self::Low,
            2..=4 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// Per-street contribution to a route multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetDetail {
    /// Normalized candidate street extracted from the instruction.
    pub street: String,
    /// Congestion tier of the street.
    pub level: CongestionLevel,
    /// Multiplier of the tier.
    pub multiplier: f64,
    /// Vehicle count used for classification.
    pub count: f64,
}

/// Traffic adjustment for an entire route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAdjustment {
    /// Mean of the per-street multipliers, rounded to 3 decimals.
    pub multiplier: f64,
    /// Sample-size confidence.
    pub confidence: Confidence,
    /// Number of classified streets (duplicates across steps count twice).
    pub streets_matched: usize,
    /// Contributions in the order they were encountered.
    pub street_details: Vec<StreetDetail>,
}

impl RouteAdjustment {
    /// Low-confidence identity adjustment used when nothing matched.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            multiplier: 1.0,
            confidence: Confidence::Low,
            streets_matched: 0,
            street_details: Vec::new(),
        }
    }
}

/// One step of a provider route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Free-text driving instruction with markup already removed.
    pub instruction: String,
    /// Provider-estimated duration of the step.
    #[serde(default)]
    pub duration_seconds: Option<u64>,
}

impl RouteStep {
    /// Creates a step with no duration.
    #[must_use]
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            duration_seconds: None,
        }
    }
}

/// A route adjustment applied to a provider duration estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAnalysis {
    /// Provider duration before adjustment.
    pub base_duration_seconds: u64,
    /// Provider duration scaled by the route multiplier.
    pub adjusted_duration_seconds: u64,
    /// Human-readable form of the adjusted duration.
    pub adjusted_duration: String,
    /// The underlying adjustment. `street_details` is emptied unless
    /// details were requested.
    pub adjustment: RouteAdjustment,
}

/// A street returned from a name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetSearchResult {
    /// Normalized street name (index key).
    pub street_name: String,
    /// Average count rounded to the nearest vehicle.
    pub average_count: u64,
    /// Congestion tier of the street.
    pub level: CongestionLevel,
    /// Number of raw records for the street.
    pub sample_size: usize,
}

/// Earliest and latest count dates in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest dated record.
    pub earliest: NaiveDate,
    /// Latest dated record.
    pub latest: NaiveDate,
}

/// Summary of the loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    /// Number of cleaned records.
    pub total_records: usize,
    /// Number of distinct normalized street names.
    pub unique_streets: usize,
    /// Mean count across all records, rounded.
    pub average_count: u64,
    /// Largest count across all records, rounded.
    pub max_count: u64,
    /// Smallest count across all records, rounded.
    pub min_count: u64,
    /// Date range, when any record is dated.
    pub date_range: Option<DateRange>,
}

/// Configuration for loading and querying the traffic dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Path to the traffic count CSV.
    pub dataset_path: PathBuf,
    /// Number of most recent dated records averaged per street.
    pub recency_window: usize,
    /// Minimum length of an extracted street candidate.
    pub min_candidate_len: usize,
}

/// Default location of the traffic count dataset.
pub const DEFAULT_DATASET_PATH: &str = "data/traffic_counts_datasd.csv";

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            recency_window: 3,
            min_candidate_len: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_half_open() {
        assert_eq!(CongestionLevel::from_count(0.0), CongestionLevel::VeryLow);
        assert_eq!(CongestionLevel::from_count(2_999.9), CongestionLevel::VeryLow);
        assert_eq!(CongestionLevel::from_count(3_000.0), CongestionLevel::Low);
        assert_eq!(CongestionLevel::from_count(8_000.0), CongestionLevel::Moderate);
        assert_eq!(CongestionLevel::from_count(15_000.0), CongestionLevel::High);
        assert_eq!(CongestionLevel::from_count(24_999.0), CongestionLevel::High);
        assert_eq!(CongestionLevel::from_count(25_000.0), CongestionLevel::VeryHigh);
    }

    #[test]
    fn multipliers_match_tiers() {
        let multipliers: Vec<f64> = CongestionLevel::all()
            .iter()
            .map(|l| l.multiplier())
            .collect();
        assert_eq!(multipliers, vec![0.90, 0.95, 1.00, 1.15, 1.30]);
    }

    #[test]
    fn level_names_round_trip_through_strum() {
        for level in CongestionLevel::all() {
            let name = Classification::from_count(match level {
                CongestionLevel::VeryLow => 100.0,
                CongestionLevel::Low => 5_000.0,
                CongestionLevel::Moderate => 10_000.0,
                CongestionLevel::High => 20_000.0,
                CongestionLevel::VeryHigh => 30_000.0,
            })
            .level_name();
            assert_eq!(name, level.as_ref());
            assert_eq!(name.parse::<CongestionLevel>().unwrap(), *level);
        }
    }

    #[test]
    fn unknown_sentinel() {
        let unknown = Classification::unknown();
        assert!(unknown.is_unknown());
        assert_eq!(unknown.level_name(), "unknown");
        assert!((unknown.multiplier - 1.0).abs() < f64::EPSILON);
        assert_eq!(unknown.count, None);
    }

    #[test]
    fn confidence_from_matched() {
        assert_eq!(Confidence::from_matched(0), Confidence::Low);
        assert_eq!(Confidence::from_matched(1), Confidence::Low);
        assert_eq!(Confidence::from_matched(2), Confidence::Medium);
        assert_eq!(Confidence::from_matched(4), Confidence::Medium);
        assert_eq!(Confidence::from_matched(5), Confidence::High);
    }

    #[test]
    fn identity_adjustment() {
        let identity = RouteAdjustment::identity();
        assert!((identity.multiplier - 1.0).abs() < f64::EPSILON);
        assert_eq!(identity.confidence, Confidence::Low);
        assert_eq!(identity.streets_matched, 0);
        assert!(identity.street_details.is_empty());
    }
}

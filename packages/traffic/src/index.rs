//! In-memory street index.
//!
//! Groups cleaned traffic records by normalized street name and keeps
//! per-street aggregates. The index is built in one batch and never
//! mutated afterwards; a refresh builds a new index.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::time::Instant;

use street_traffic_models::{
    CongestionLevel, StreetIndexEntry, StreetSearchResult, TrafficRecord,
};

use crate::normalize;

/// Immutable mapping from normalized street name to its aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreetIndex {
    entries: BTreeMap<String, StreetIndexEntry>,
}

impl StreetIndex {
    /// Builds the index from cleaned records.
    ///
    /// `recency_window` is the number of most recent dated records
    /// averaged for streets that have dates. Records whose name
    /// normalizes to an empty string are left out.
    #[must_use]
    pub fn build(records: &[TrafficRecord], recency_window: usize) -> Self {
        let start = Instant::now();

        let mut groups: BTreeMap<String, Vec<&TrafficRecord>> = BTreeMap::new();
        for record in records {
            let key = normalize::normalize(&record.street_name);
            if key.is_empty() {
                log::debug!("Skipping traffic record with empty street name");
                continue;
            }
            groups.entry(key).or_default().push(record);
        }

        let entries: BTreeMap<String, StreetIndexEntry> = groups
            .into_iter()
            .map(|(key, group)| {
                let entry = aggregate(group, recency_window);
                (key, entry)
            })
            .collect();

        log::info!(
            "Built street index: {} unique streets from {} records in {:.2?}",
            entries.len(),
            records.len(),
            start.elapsed()
        );

        Self { entries }
    }

    /// An index with no streets. Every lookup misses.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of distinct streets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the index holds no streets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by an already-normalized key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StreetIndexEntry> {
        self.entries.get(key)
    }

    /// Average count for a normalized street name.
    ///
    /// Tries an exact key match first. Otherwise averages the
    /// `average_count` of every key that contains the query or is
    /// contained in it. Returns `None` when nothing matches or the query
    /// is empty.
    #[must_use]
    pub fn lookup_count(&self, normalized: &str) -> Option<f64> {
        if normalized.is_empty() {
            return None;
        }

        if let Some(entry) = self.get(normalized) {
            return Some(entry.average_count);
        }

        let matched: Vec<f64> = self
            .entries
            .iter()
            .filter(|(key, _)| key.contains(normalized) || normalized.contains(key.as_str()))
            .map(|(_, entry)| entry.average_count)
            .collect();

        mean(&matched)
    }

    /// Streets whose key contains the normalized `query`.
    ///
    /// Keys that start with the query come first, then higher average
    /// counts. At most `limit` results are returned.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<StreetSearchResult> {
        let query = normalize::normalize(query);
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut matches: Vec<StreetSearchResult> = self
            .entries
            .iter()
            .filter(|(key, _)| key.contains(&query))
            .map(|(key, entry)| StreetSearchResult {
                street_name: key.clone(),
                average_count: round_count(entry.average_count),
                level: CongestionLevel::from_count(entry.average_count),
                sample_size: entry.sample_size,
            })
            .collect();

        matches.sort_by_key(|m| (!m.street_name.starts_with(&query), Reverse(m.average_count)));
        matches.truncate(limit);
        matches
    }
}

/// Aggregates one street's records.
fn aggregate(mut group: Vec<&TrafficRecord>, recency_window: usize) -> StreetIndexEntry {
    let counts: Vec<f64> = group.iter().map(|r| r.total_count).collect();
    let max_count = counts.iter().copied().fold(f64::MIN, f64::max);
    let min_count = counts.iter().copied().fold(f64::MAX, f64::min);
    let sample_size = counts.len();

    let average_count = if group.iter().any(|r| r.date_count.is_some()) {
        // Most recent first, undated last. Stable, so ties keep file order.
        group.sort_by_key(|r| Reverse(r.date_count));
        let recent: Vec<f64> = group
            .iter()
            .take(recency_window.max(1))
            .map(|r| r.total_count)
            .collect();
        mean(&recent)
    } else {
        mean(&counts)
    }
    .unwrap_or(0.0);

    StreetIndexEntry {
        average_count,
        max_count,
        min_count,
        sample_size,
    }
}

/// Arithmetic mean, `None` for an empty slice.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Rounds a non-negative count to the nearest whole vehicle.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn round_count(count: f64) -> u64 {
    count.max(0.0).round() as u64
}

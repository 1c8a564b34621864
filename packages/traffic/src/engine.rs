//! The traffic adjustment engine.
//!
//! A [`TrafficEngine`] owns one fully built street index plus the
//! dataset summary computed alongside it. It is immutable once built, so
//! any number of threads can query it through a shared reference.

use std::path::Path;

use street_traffic_models::{
    Classification, DatasetStats, DateRange, RouteAdjustment, RouteStep, StreetSearchResult,
    TrafficConfig, TrafficRecord,
};

use crate::adjust;
use crate::classify;
use crate::dataset;
use crate::index::{StreetIndex, mean, round_count};
use crate::progress::{NullProgress, ProgressCallback};

/// Built street index and dataset summary.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficEngine {
    index: StreetIndex,
    stats: Option<DatasetStats>,
    min_candidate_len: usize,
}

impl TrafficEngine {
    /// Builds an engine from already-cleaned records.
    #[must_use]
    pub fn build(records: &[TrafficRecord], config: &TrafficConfig) -> Self {
        let index = StreetIndex::build(records, config.recency_window);
        let stats = summarize(records, index.len());
        Self {
            index,
            stats,
            min_candidate_len: config.min_candidate_len,
        }
    }

    /// An engine with no data. Every classification is unknown.
    #[must_use]
    pub fn empty(config: &TrafficConfig) -> Self {
        Self {
            index: StreetIndex::empty(),
            stats: None,
            min_candidate_len: config.min_candidate_len,
        }
    }

    /// Loads the dataset named by `config` and builds the engine.
    ///
    /// Load failures are logged and produce an empty engine.
    #[must_use]
    pub fn load(config: &TrafficConfig) -> Self {
        Self::load_with_progress(config, &NullProgress)
    }

    /// Same as [`Self::load`], reporting progress while reading.
    #[must_use]
    pub fn load_with_progress(config: &TrafficConfig, progress: &dyn ProgressCallback) -> Self {
        Self::load_path(&config.dataset_path, config, progress)
    }

    /// Loads the dataset at `path` using the remaining settings of
    /// `config`.
    #[must_use]
    pub fn load_path(
        path: &Path,
        config: &TrafficConfig,
        progress: &dyn ProgressCallback,
    ) -> Self {
        let records = dataset::load_or_empty(path, progress);
        let engine = Self::build(&records, config);
        progress.finish(format!(
            "Indexed {} streets from {} records",
            engine.index.len(),
            records.len()
        ));
        engine
    }

    /// Returns `true` once an index with at least one street is loaded.
    #[must_use]
    pub fn is_built(&self) -> bool {
        !self.index.is_empty()
    }

    /// The underlying street index.
    #[must_use]
    pub const fn index(&self) -> &StreetIndex {
        &self.index
    }

    /// Classifies a single street name.
    #[must_use]
    pub fn classify(&self, street_name: &str) -> Classification {
        classify::classify(&self.index, street_name)
    }

    /// Adjustment for a route. Street details are always included.
    #[must_use]
    pub fn adjust(&self, steps: &[RouteStep]) -> RouteAdjustment {
        adjust::adjust_route(
            &self.index,
            steps.iter().map(|s| s.instruction.as_str()),
            self.min_candidate_len,
        )
    }

    /// Adjustment for a route, with street details only when
    /// `include_details` is set.
    #[must_use]
    pub fn adjust_route(&self, steps: &[RouteStep], include_details: bool) -> RouteAdjustment {
        let mut adjustment = self.adjust(steps);
        if !include_details {
            adjustment.street_details.clear();
        }
        adjustment
    }

    /// Streets matching `query`, prefix matches first.
    #[must_use]
    pub fn search_streets(&self, query: &str, limit: usize) -> Vec<StreetSearchResult> {
        self.index.search(query, limit)
    }

    /// Dataset summary, or `None` when no data is loaded.
    #[must_use]
    pub const fn stats(&self) -> Option<&DatasetStats> {
        self.stats.as_ref()
    }
}

/// Summarizes the cleaned records. `None` for an empty dataset.
fn summarize(records: &[TrafficRecord], unique_streets: usize) -> Option<DatasetStats> {
    let counts: Vec<f64> = records.iter().map(|r| r.total_count).collect();
    let average = mean(&counts)?;
    let max = counts.iter().copied().fold(f64::MIN, f64::max);
    let min = counts.iter().copied().fold(f64::MAX, f64::min);

    let mut dates = records.iter().filter_map(|r| r.date_count);
    let date_range = dates.next().map(|first| {
        dates.fold(
            DateRange {
                earliest: first,
                latest: first,
            },
            |range, date| DateRange {
                earliest: range.earliest.min(date),
                latest: range.latest.max(date),
            },
        )
    });

    Some(DatasetStats {
        total_records: records.len(),
        unique_streets,
        average_count: round_count(average),
        max_count: round_count(max),
        min_count: round_count(min),
        date_range,
    })
}

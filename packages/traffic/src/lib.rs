#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street-level traffic count index and route travel-time adjustment.
//!
//! Loads a historical vehicle-count CSV, indexes it by normalized street
//! name, and turns free-text driving instructions into a single
//! confidence-scored multiplier for a provider's travel-time estimate.
//!
//! # Architecture
//!
//! - **Load**: [`dataset`] reads and cleans the CSV. Any load failure
//!   degrades to an empty dataset.
//! - **Index**: [`index::StreetIndex`] groups records by the key produced
//!   by [`normalize::normalize`] and keeps recency-weighted aggregates.
//! - **Query**: [`instruction`] extracts street candidates, [`classify`]
//!   maps each to a congestion tier, and [`adjust`] averages the tiers'
//!   multipliers over a route.
//! - **Sharing**: [`TrafficEngine`] is immutable once built. An
//!   [`EngineHandle`] swaps in a rebuilt engine atomically.
//!
//! # Usage
//!
//! ```rust,no_run
//! use street_traffic::{RouteStep, TrafficConfig, TrafficEngine};
//!
//! let engine = TrafficEngine::load(&TrafficConfig::default());
//! let adjustment = engine.adjust_route(
//!     &[RouteStep::new("Turn right onto Main St")],
//!     false,
//! );
//! println!("x{} ({})", adjustment.multiplier, adjustment.confidence);
//! ```

pub mod adjust;
pub mod classify;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod handle;
pub mod index;
pub mod instruction;
pub mod normalize;
pub mod progress;
pub mod route;
pub mod synonyms;

pub use engine::TrafficEngine;
pub use handle::EngineHandle;
pub use street_traffic_models::{
    Classification, Confidence, CongestionLevel, DatasetStats, DateRange, RouteAdjustment,
    RouteAnalysis, RouteStep, StreetDetail, StreetIndexEntry, StreetSearchResult, TrafficConfig,
    TrafficRecord,
};

/// Errors from loading traffic data or configuration.
#[derive(Debug, thiserror::Error)]
pub enum TrafficError {
    /// Dataset file does not exist.
    #[error("Traffic dataset not found: {0}")]
    NotFound(String),

    /// I/O error reading a file.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// CSV header could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Dataset lacks `street_name` or `total_count`.
    #[error("Missing required columns street_name/total_count. Found: {found:?}")]
    MissingColumns {
        /// Header names that were present.
        found: Vec<String>,
    },

    /// Configuration file is not valid TOML.
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),
}

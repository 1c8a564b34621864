#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the street traffic server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the engine types to allow independent evolution of the API
//! contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use street_traffic_models::{
    Classification, Confidence, CongestionLevel, DatasetStats, RouteAnalysis, StreetDetail,
    StreetSearchResult,
};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with 4xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Query parameters for the street level endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StreetLevelParams {
    /// Street name to classify.
    pub street: Option<String>,
}

/// Congestion classification of one street.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStreetLevel {
    /// Street name as requested.
    pub street: String,
    /// Tier name, or `"unknown"` when the street has no data.
    pub traffic_level: String,
    /// Travel-time multiplier.
    pub congestion_multiplier: f64,
    /// Daily vehicle count, `null` when unknown.
    pub vehicle_count: Option<f64>,
}

impl ApiStreetLevel {
    /// Builds the response for `street` from its classification.
    #[must_use]
    pub fn new(street: String, classification: &Classification) -> Self {
        Self {
            street,
            traffic_level: classification.level_name().to_string(),
            congestion_multiplier: classification.multiplier,
            vehicle_count: classification.count,
        }
    }
}

/// Query parameters for the street search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Search text.
    pub q: Option<String>,
    /// Maximum number of results. Defaults to 10.
    pub limit: Option<usize>,
}

/// A street in search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStreetMatch {
    /// Normalized street name.
    pub street_name: String,
    /// Rounded average daily count.
    pub average_count: u64,
    /// Congestion tier.
    pub traffic_level: CongestionLevel,
    /// Number of dataset records for the street.
    pub sample_size: usize,
}

impl From<StreetSearchResult> for ApiStreetMatch {
    fn from(result: StreetSearchResult) -> Self {
        Self {
            street_name: result.street_name,
            average_count: result.average_count,
            traffic_level: result.level,
            sample_size: result.sample_size,
        }
    }
}

/// Street search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchResponse {
    /// Matching streets, best first.
    pub results: Vec<ApiStreetMatch>,
    /// Number of results.
    pub count: usize,
}

/// Date range of the loaded dataset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDateRange {
    /// Earliest count date.
    pub earliest: NaiveDate,
    /// Latest count date.
    pub latest: NaiveDate,
}

/// Summary of the loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDatasetStats {
    /// Number of dataset records.
    pub total_records: usize,
    /// Number of distinct streets.
    pub unique_streets: usize,
    /// Rounded mean count.
    pub average_count: u64,
    /// Rounded largest count.
    pub max_count: u64,
    /// Rounded smallest count.
    pub min_count: u64,
    /// Date range, absent when no record is dated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<ApiDateRange>,
}

impl From<&DatasetStats> for ApiDatasetStats {
    fn from(stats: &DatasetStats) -> Self {
        Self {
            total_records: stats.total_records,
            unique_streets: stats.unique_streets,
            average_count: stats.average_count,
            max_count: stats.max_count,
            min_count: stats.min_count,
            date_range: stats.date_range.map(|r| ApiDateRange {
                earliest: r.earliest,
                latest: r.latest,
            }),
        }
    }
}

/// Stats endpoint response: dataset summary, or `{"status": "no_data"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiStatsResponse {
    /// A dataset is loaded.
    Loaded(ApiDatasetStats),
    /// No dataset is loaded.
    NoData {
        /// Always `"no_data"`.
        status: String,
    },
}

impl ApiStatsResponse {
    /// Response for an optional dataset summary.
    #[must_use]
    pub fn from_stats(stats: Option<&DatasetStats>) -> Self {
        stats.map_or_else(
            || Self::NoData {
                status: "no_data".to_string(),
            },
            |s| Self::Loaded(s.into()),
        )
    }
}

/// One step of a route to adjust.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStepInput {
    /// Driving instruction. May contain HTML markup.
    pub instruction: String,
    /// Provider duration of the step.
    #[serde(default)]
    pub duration_seconds: Option<u64>,
}

/// One route alternative to adjust.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRouteInput {
    /// Steps in driving order.
    pub steps: Vec<ApiStepInput>,
    /// Provider total duration. Defaults to the sum of step durations.
    #[serde(default)]
    pub duration_seconds: Option<u64>,
}

/// Body of the route adjustment endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustRequest {
    /// Route alternatives in provider order.
    pub routes: Vec<ApiRouteInput>,
    /// Include per-street details in each analysis.
    #[serde(default)]
    pub include_details: bool,
}

/// Per-street contribution to a route multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStreetDetail {
    /// Extracted street name.
    pub street: String,
    /// Congestion tier.
    pub level: CongestionLevel,
    /// Tier multiplier.
    pub multiplier: f64,
    /// Daily vehicle count.
    pub count: f64,
}

impl From<StreetDetail> for ApiStreetDetail {
    fn from(detail: StreetDetail) -> Self {
        Self {
            street: detail.street,
            level: detail.level,
            multiplier: detail.multiplier,
            count: detail.count,
        }
    }
}

/// Traffic analysis metadata for a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTrafficAnalysis {
    /// Route multiplier.
    pub multiplier: f64,
    /// Sample-size confidence.
    pub confidence: Confidence,
    /// Number of classified streets.
    pub streets_analyzed: usize,
    /// Per-street contributions, only when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_details: Option<Vec<ApiStreetDetail>>,
}

/// Adjusted duration for one route alternative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRouteAnalysis {
    /// Provider duration before adjustment.
    pub total_duration_seconds: u64,
    /// Duration after applying the traffic multiplier.
    pub traffic_adjusted_seconds: u64,
    /// Human-readable adjusted duration.
    pub traffic_adjusted_duration: String,
    /// How the multiplier was derived.
    pub traffic_analysis: ApiTrafficAnalysis,
}

impl ApiRouteAnalysis {
    /// Builds the response, keeping street details only when
    /// `include_details` is set.
    #[must_use]
    pub fn new(analysis: RouteAnalysis, include_details: bool) -> Self {
        let adjustment = analysis.adjustment;
        let street_details = include_details.then(|| {
            adjustment
                .street_details
                .into_iter()
                .map(ApiStreetDetail::from)
                .collect()
        });

        Self {
            total_duration_seconds: analysis.base_duration_seconds,
            traffic_adjusted_seconds: analysis.adjusted_duration_seconds,
            traffic_adjusted_duration: analysis.adjusted_duration,
            traffic_analysis: ApiTrafficAnalysis {
                multiplier: adjustment.multiplier,
                confidence: adjustment.confidence,
                streets_analyzed: adjustment.streets_matched,
                street_details,
            },
        }
    }
}

//! Applying a route adjustment to a provider duration estimate.

use regex::Regex;
use std::sync::LazyLock;

use street_traffic_models::{RouteAnalysis, RouteStep};

use crate::engine::TrafficEngine;

/// Matches a single markup tag such as `<b>` or `<div style="...">`.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Removes markup tags from a provider instruction.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Formats a duration in minutes, e.g. `"45 mins"`, `"2 hr"`,
/// `"1 hr 5 mins"`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(minutes: f64) -> String {
    let minutes = minutes.max(0.0);
    if minutes < 60.0 {
        return format!("{minutes:.0} mins");
    }
    let hours = (minutes / 60.0).floor() as u64;
    let mins = (minutes % 60.0).floor() as u64;
    if mins == 0 {
        format!("{hours} hr")
    } else {
        format!("{hours} hr {mins} mins")
    }
}

/// Scales a provider duration by the route's traffic multiplier.
///
/// `base_duration_seconds` overrides the sum of the step durations when
/// the provider reports a route total.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn analyze_route(
    engine: &TrafficEngine,
    steps: &[RouteStep],
    base_duration_seconds: Option<u64>,
    include_details: bool,
) -> RouteAnalysis {
    let base = base_duration_seconds
        .unwrap_or_else(|| steps.iter().filter_map(|s| s.duration_seconds).sum());

    let adjustment = engine.adjust_route(steps, include_details);
    let adjusted_minutes = base as f64 / 60.0 * adjustment.multiplier;

    RouteAnalysis {
        base_duration_seconds: base,
        adjusted_duration_seconds: (adjusted_minutes * 60.0) as u64,
        adjusted_duration: format_duration(adjusted_minutes),
        adjustment,
    }
}

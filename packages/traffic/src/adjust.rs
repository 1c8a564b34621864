//! Route-level travel-time adjustment.
//!
//! Every street extracted from every step is classified. Streets with no
//! data are skipped. The route multiplier is the unweighted mean of the
//! remaining per-street multipliers, so a street named in two steps
//! counts twice.

use street_traffic_models::{Confidence, RouteAdjustment, StreetDetail};

use crate::classify::classify;
use crate::index::{StreetIndex, mean};
use crate::instruction::extract_street_candidates;

/// Computes the adjustment for a route given its step instructions in
/// order.
///
/// Street details are always collected, in step order and then
/// candidate order.
#[must_use]
pub fn adjust_route<'a>(
    index: &StreetIndex,
    instructions: impl IntoIterator<Item = &'a str>,
    min_candidate_len: usize,
) -> RouteAdjustment {
    let mut details: Vec<StreetDetail> = Vec::new();

    for instruction in instructions {
        for street in extract_street_candidates(instruction, min_candidate_len) {
            let classification = classify(index, &street);
            let (Some(level), Some(count)) = (classification.level, classification.count) else {
                continue;
            };
            details.push(StreetDetail {
                street,
                level,
                multiplier: classification.multiplier,
                count,
            });
        }
    }

    let multipliers: Vec<f64> = details.iter().map(|d| d.multiplier).collect();
    let Some(average) = mean(&multipliers) else {
        return RouteAdjustment::identity();
    };

    RouteAdjustment {
        multiplier: round_to_thousandths(average),
        confidence: Confidence::from_matched(details.len()),
        streets_matched: details.len(),
        street_details: details,
    }
}

fn round_to_thousandths(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

//! Street congestion classification.

use street_traffic_models::Classification;

use crate::index::StreetIndex;
use crate::normalize;

/// Classifies a free-text street name against the index.
///
/// The name is normalized, then looked up exactly and, failing that, by
/// substring (see [`StreetIndex::lookup_count`]). Streets with no data
/// yield [`Classification::unknown`].
#[must_use]
pub fn classify(index: &StreetIndex, street_name: &str) -> Classification {
    index
        .lookup_count(&normalize::normalize(street_name))
        .map_or_else(Classification::unknown, Classification::from_count)
}

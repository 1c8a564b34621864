//! Street name extraction from turn-by-turn driving instructions.
//!
//! Instructions such as "Turn right onto Main St" are matched against
//! three patterns, tried in order:
//!
//! 1. `ONTO|ON|TO` followed by words and a street-type suffix; captures
//!    the words without the suffix
//! 2. `VIA|TAKE`, captured the same way
//! 3. A single word together with its street-type suffix
//!
//! "Turn right onto Main St" therefore yields both `MAIN` and `MAIN ST`.
//! The bare name goes through the substring fallback of the lookup.
//!
//! Suffix tokens are not anchored on a trailing word boundary, so
//! provider spellings like `AVE` or `BLVD` still yield the dataset forms
//! `AV` and `BL`. The patterns can over-match (e.g. `CONTINUE ST` out of
//! "Continue straight"); such candidates simply fail to classify.

use regex::Regex;
use std::sync::LazyLock;

use crate::normalize;
use crate::synonyms;

/// Extraction patterns in priority order. Each captures the candidate
/// street in group 1.
static PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    let suffix = synonyms::suffix_alternation();
    [
        Regex::new(&format!(r"(?:ONTO|ON|TO)\s+([A-Z0-9\s]+?)\s+(?:{suffix})"))
            .expect("valid regex"),
        Regex::new(&format!(r"(?:VIA|TAKE)\s+([A-Z0-9\s]+?)\s+(?:{suffix})"))
            .expect("valid regex"),
        Regex::new(&format!(r"([A-Z0-9]+\s+(?:{suffix}))")).expect("valid regex"),
    ]
});

/// Extracts normalized street candidates from a driving instruction.
///
/// Candidates shorter than `min_len` characters are dropped. The result
/// has no duplicates and keeps first-seen order; an instruction with no
/// recognizable street yields an empty list.
#[must_use]
pub fn extract_street_candidates(instruction: &str, min_len: usize) -> Vec<String> {
    let upper = instruction.to_uppercase();
    if upper.trim().is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<String> = Vec::new();

    for pattern in PATTERNS.iter() {
        for caps in pattern.captures_iter(&upper) {
            let Some(raw) = caps.get(1) else {
                continue;
            };
            let normalized = normalize::normalize(raw.as_str());
            if normalized.chars().count() < min_len || candidates.contains(&normalized) {
                continue;
            }
            candidates.push(normalized);
        }
    }

    candidates
}

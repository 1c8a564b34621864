//! Street name normalization.
//!
//! Applied symmetrically when building the street index and when
//! querying it, so that "Main Street" and "MAIN ST" produce the same key.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::synonyms;

/// Matches a spelled-out street type as a whole word.
static FULL_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:{})\b", synonyms::full_form_alternation())).expect("valid regex")
});

/// Normalizes a street name.
///
/// The pipeline:
/// 1. Uppercase
/// 2. Trim
/// 3. Abbreviate whole-word street types (STREET→ST, AVENUE→AV, etc.)
/// 4. Collapse whitespace
///
/// The result is a fixed point: normalizing it again returns it unchanged.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let upper = raw.to_uppercase();
    let trimmed = upper.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let abbreviated = FULL_SUFFIX_RE.replace_all(trimmed, |caps: &Captures<'_>| {
        synonyms::abbreviate(&caps[0]).to_string()
    });

    abbreviated.split_whitespace().collect::<Vec<_>>().join(" ")
}

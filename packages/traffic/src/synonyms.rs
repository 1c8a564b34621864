//! Street-type suffix table.
//!
//! The traffic count dataset spells street types in a short two-letter
//! form (`ST`, `AV`, `BL`, ...). Free text spells them out in full. This
//! table maps the spelled-out forms onto the dataset's abbreviations so
//! both sides of a lookup agree.

/// Spelled-out street type and its dataset abbreviation.
pub const STREET_SUFFIXES: [(&str, &str); 10] = [
    ("STREET", "ST"),
    ("AVENUE", "AV"),
    ("BOULEVARD", "BL"),
    ("DRIVE", "DR"),
    ("ROAD", "RD"),
    ("LANE", "LN"),
    ("COURT", "CT"),
    ("PLACE", "PL"),
    ("HIGHWAY", "HW"),
    ("FREEWAY", "FW"),
];

/// Returns the dataset abbreviation for a spelled-out street type, or
/// the token unchanged.
#[must_use]
pub fn abbreviate(token: &str) -> &str {
    STREET_SUFFIXES
        .iter()
        .find(|(full, _)| *full == token)
        .map_or(token, |(_, abbrev)| abbrev)
}

/// Regex alternation of the spelled-out forms, e.g. `STREET|AVENUE|...`.
#[must_use]
pub fn full_form_alternation() -> String {
    STREET_SUFFIXES
        .iter()
        .map(|(full, _)| *full)
        .collect::<Vec<_>>()
        .join("|")
}

/// Regex alternation of the abbreviations, e.g. `ST|AV|...`.
#[must_use]
pub fn suffix_alternation() -> String {
    STREET_SUFFIXES
        .iter()
        .map(|(_, abbrev)| *abbrev)
        .collect::<Vec<_>>()
        .join("|")
}

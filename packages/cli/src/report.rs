//! Plain-text rendering of query results.

use std::fmt::Write as _;

use street_traffic::{
    Classification, DatasetStats, RouteAdjustment, RouteAnalysis, StreetSearchResult,
};

/// Dataset summary, or a notice when nothing is loaded.
pub fn stats(stats: Option<&DatasetStats>) -> String {
    let Some(stats) = stats else {
        return "No traffic data loaded".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "Records:        {}", stats.total_records);
    let _ = writeln!(out, "Unique streets: {}", stats.unique_streets);
    let _ = writeln!(out, "Average count:  {}", stats.average_count);
    let _ = writeln!(out, "Max count:      {}", stats.max_count);
    let _ = write!(out, "Min count:      {}", stats.min_count);
    if let Some(range) = stats.date_range {
        let _ = write!(out, "\nDate range:     {} to {}", range.earliest, range.latest);
    }
    out
}

/// One street's classification.
pub fn classification(street: &str, classification: &Classification) -> String {
    let count = classification
        .count
        .map_or_else(|| "-".to_string(), |c| format!("{c:.0}"));
    format!(
        "{street}: {} (x{:.2}, count {count})",
        classification.level_name(),
        classification.multiplier,
    )
}

/// Search results as an aligned table.
pub fn search_results(results: &[StreetSearchResult]) -> String {
    if results.is_empty() {
        return "No matching streets".to_string();
    }

    let width = results
        .iter()
        .map(|r| r.street_name.len())
        .max()
        .unwrap_or(0)
        .max("STREET".len());

    let mut out = format!(
        "{:<width$}  {:>10}  {:<9}  {:>7}",
        "STREET", "AVG COUNT", "LEVEL", "SAMPLES"
    );
    for result in results {
        let _ = write!(
            out,
            "\n{:<width$}  {:>10}  {:<9}  {:>7}",
            result.street_name,
            result.average_count,
            result.level.as_ref(),
            result.sample_size,
        );
    }
    out
}

/// Route multiplier with its confidence and, when present, the streets
/// behind it.
pub fn adjustment(adjustment: &RouteAdjustment) -> String {
    let mut out = format!(
        "Multiplier: x{} ({} confidence, {} streets matched)",
        adjustment.multiplier,
        adjustment.confidence.as_ref(),
        adjustment.streets_matched,
    );
    for detail in &adjustment.street_details {
        let _ = write!(
            out,
            "\n  {}: {} (x{:.2}, count {:.0})",
            detail.street,
            detail.level.as_ref(),
            detail.multiplier,
            detail.count,
        );
    }
    out
}

/// Adjusted route duration followed by the multiplier breakdown.
pub fn analysis(analysis: &RouteAnalysis) -> String {
    format!(
        "Duration: {}s -> {}s ({})\n{}",
        analysis.base_duration_seconds,
        analysis.adjusted_duration_seconds,
        analysis.adjusted_duration,
        adjustment(&analysis.adjustment),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use street_traffic::{Confidence, CongestionLevel, DateRange, StreetDetail};

    #[test]
    fn stats_without_data() {
        assert_eq!(stats(None), "No traffic data loaded");
    }

    #[test]
    fn stats_include_date_range_when_present() {
        let mut summary = DatasetStats {
            total_records: 4,
            unique_streets: 3,
            average_count: 8500,
            max_count: 20_000,
            min_count: 1000,
            date_range: None,
        };
        assert!(!stats(Some(&summary)).contains("Date range"));

        summary.date_range = Some(DateRange {
            earliest: NaiveDate::from_ymd_opt(2019, 1, 5).unwrap(),
            latest: NaiveDate::from_ymd_opt(2021, 6, 30).unwrap(),
        });
        let out = stats(Some(&summary));
        assert!(out.starts_with("Records:        4\n"));
        assert!(out.ends_with("Date range:     2019-01-05 to 2021-06-30"));
    }

    #[test]
    fn renders_known_and_unknown_streets() {
        let known = Classification::from_count(15_000.0);
        assert_eq!(
            classification("Main St", &known),
            "Main St: high (x1.15, count 15000)"
        );
        assert_eq!(
            classification("Nowhere Rd", &Classification::unknown()),
            "Nowhere Rd: unknown (x1.00, count -)"
        );
    }

    #[test]
    fn renders_search_table() {
        let results = vec![StreetSearchResult {
            street_name: "MAIN ST".to_string(),
            average_count: 15_000,
            level: CongestionLevel::High,
            sample_size: 2,
        }];
        let out = search_results(&results);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("STREET    AVG COUNT  LEVEL      SAMPLES"));
        assert_eq!(lines.next(), Some("MAIN ST       15000  high             2"));
        assert_eq!(search_results(&[]), "No matching streets");
    }

    #[test]
    fn renders_adjustment_details() {
        let adjustment = RouteAdjustment {
            multiplier: 1.05,
            confidence: Confidence::Medium,
            streets_matched: 2,
            street_details: vec![StreetDetail {
                street: "MAIN ST".to_string(),
                level: CongestionLevel::High,
                multiplier: 1.15,
                count: 15_000.0,
            }],
        };
        assert_eq!(
            super::adjustment(&adjustment),
            "Multiplier: x1.05 (medium confidence, 2 streets matched)\n  MAIN ST: high (x1.15, count 15000)"
        );
    }
}

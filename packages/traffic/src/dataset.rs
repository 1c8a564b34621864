//! Traffic count CSV loader.
//!
//! Reads the street-level traffic count dataset and cleans every row
//! into a [`TrafficRecord`]. Dirty values are coerced rather than
//! rejected: unparseable counts become `0`, unparseable dates become
//! missing. Only a missing file, an unreadable header, or missing
//! required columns fail the whole load.

use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use street_traffic_models::TrafficRecord;

use crate::TrafficError;
use crate::progress::ProgressCallback;

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = ["street_name", "total_count"];

/// Date formats accepted in the `date_count` column.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Datetime formats accepted in the `date_count` column. Only the date
/// part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    street_name: usize,
    total_count: usize,
    date_count: Option<usize>,
    limits: Option<usize>,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self, TrafficError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        match (position("street_name"), position("total_count")) {
            (Some(street_name), Some(total_count)) => Ok(Self {
                street_name,
                total_count,
                date_count: position("date_count"),
                limits: position("limits"),
            }),
            _ => Err(TrafficError::MissingColumns {
                found: headers.to_vec(),
            }),
        }
    }
}

/// Loads and cleans every record in the dataset at `path`.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be opened, has
/// no readable header row, or lacks one of [`REQUIRED_COLUMNS`].
pub fn load_records(
    path: &Path,
    progress: &dyn ProgressCallback,
) -> Result<Vec<TrafficRecord>, TrafficError> {
    if !path.exists() {
        return Err(TrafficError::NotFound(path.display().to_string()));
    }

    let file = std::fs::File::open(path).map_err(|e| TrafficError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    progress.set_message(format!("Reading {}", path.display()));
    let records = read_records(file, progress)?;

    log::info!(
        "Loaded {} traffic records from {}",
        records.len(),
        path.display()
    );

    Ok(records)
}

/// Loads the dataset at `path`, degrading to an empty record list on any
/// load failure.
///
/// The failure is logged, never returned: an empty dataset is a valid
/// state in which every lookup reports "unknown".
#[must_use]
pub fn load_or_empty(path: &Path, progress: &dyn ProgressCallback) -> Vec<TrafficRecord> {
    match load_records(path, progress) {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Traffic data unavailable, continuing without it: {e}");
            Vec::new()
        }
    }
}

/// Reads and cleans records from any CSV source.
///
/// # Errors
///
/// Returns an error if the header row cannot be read or lacks one of
/// [`REQUIRED_COLUMNS`]. Individual unreadable rows are skipped.
pub fn read_records(
    source: impl Read,
    progress: &dyn ProgressCallback,
) -> Result<Vec<TrafficRecord>, TrafficError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
        .collect();

    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    let mut coerced_counts = 0u64;
    let mut skipped_rows = 0u64;

    for (row, result) in reader.records().enumerate() {
        let row_record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping unreadable traffic row {}: {e}", row + 1);
                skipped_rows += 1;
                continue;
            }
        };

        let field = |idx: usize| row_record.get(idx).unwrap_or("").trim();

        let street_name = field(columns.street_name).to_uppercase();

        let raw_count = field(columns.total_count);
        let total_count = parse_count(raw_count).unwrap_or_else(|| {
            log::debug!("Coercing count {raw_count:?} to 0 for {street_name:?}");
            coerced_counts += 1;
            0.0
        });

        let date_count = columns.date_count.and_then(|idx| parse_date(field(idx)));

        let limits = columns
            .limits
            .map(|idx| field(idx).to_uppercase())
            .filter(|s| !s.is_empty());

        records.push(TrafficRecord {
            street_name,
            total_count,
            date_count,
            limits,
        });
        progress.inc(1);
    }

    if coerced_counts > 0 || skipped_rows > 0 {
        log::info!(
            "Cleaned traffic data: {coerced_counts} counts coerced to 0, {skipped_rows} unreadable rows skipped"
        );
    }

    Ok(records)
}

/// Parses a vehicle count. Returns `None` for anything that is not a
/// finite, non-negative number.
#[must_use]
pub fn parse_count(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Parses a count date in any of the accepted formats.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    fn read(csv: &str) -> Result<Vec<TrafficRecord>, TrafficError> {
        read_records(csv.as_bytes(), &NullProgress)
    }

    #[test]
    fn cleans_street_names_and_counts() {
        let records = read(
            "street_name,total_count,date_count,limits\n\
             \x20 main st ,5000,2019-03-01,1st av - 2nd av\n\
             elm av,abc,not a date,\n",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].street_name, "MAIN ST");
        assert!((records[0].total_count - 5000.0).abs() < f64::EPSILON);
        assert_eq!(
            records[0].date_count,
            Some(NaiveDate::from_ymd_opt(2019, 3, 1).unwrap())
        );
        assert_eq!(records[0].limits.as_deref(), Some("1ST AV - 2ND AV"));

        assert_eq!(records[1].street_name, "ELM AV");
        assert!(records[1].total_count.abs() < f64::EPSILON);
        assert_eq!(records[1].date_count, None);
        assert_eq!(records[1].limits, None);
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let records = read("total_count,street_name\n1200,Harbor Dr\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].street_name, "HARBOR DR");
        assert_eq!(records[0].date_count, None);
        assert_eq!(records[0].limits, None);
    }

    #[test]
    fn missing_required_columns_is_an_error() {
        let err = read("street,count\nMAIN ST,100\n").unwrap_err();
        assert!(matches!(err, TrafficError::MissingColumns { .. }));
    }

    #[test]
    fn short_rows_default_missing_fields() {
        let records = read("street_name,total_count,date_count\nMAIN ST\n").unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].total_count.abs() < f64::EPSILON);
    }

    #[test]
    fn parses_counts() {
        assert_eq!(parse_count("42"), Some(42.0));
        assert_eq!(parse_count(" 17.5 "), Some(17.5));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("NaN"), None);
    }

    #[test]
    fn parses_dates() {
        let expected = NaiveDate::from_ymd_opt(2021, 7, 4).unwrap();
        assert_eq!(parse_date("2021-07-04"), Some(expected));
        assert_eq!(parse_date("07/04/2021"), Some(expected));
        assert_eq!(parse_date("2021-07-04 08:30:00"), Some(expected));
        assert_eq!(parse_date("2021-07-04T08:30:00.000"), Some(expected));
        assert_eq!(parse_date("July 4th"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let path = std::env::temp_dir().join("street_traffic_missing_dataset.csv");
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            load_records(&path, &NullProgress),
            Err(TrafficError::NotFound(_))
        ));
        assert!(load_or_empty(&path, &NullProgress).is_empty());
    }

    #[test]
    fn loads_from_file() {
        let tmp = std::env::temp_dir().join("street_traffic_dataset_load");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("counts.csv");
        std::fs::write(
            &path,
            "street_name,total_count\nMAIN ST,100\nMAIN ST,300\n",
        )
        .unwrap();

        let records = load_or_empty(&path, &NullProgress);
        assert_eq!(records.len(), 2);

        let _ = std::fs::remove_dir_all(&tmp);
    }
}

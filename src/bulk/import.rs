use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::store::{NewTelemetry, SatelliteId, Store};

use super::error::{BulkError, RowError};

pub const REQUIRED_HEADERS: [&str; 4] = ["timestamp", "latitude", "longitude", "altitude"];

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub processed_count: usize,
    pub total_rows: usize,
}

/// Outcome of parsing every data row, before anything is stored.
#[derive(Debug)]
pub struct ParsedCsv {
    pub rows: Vec<Result<NewTelemetry, RowError>>,
}

impl ParsedCsv {
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn valid_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_ok()).count()
    }
}

/// Header positions. Later duplicates of a header win.
struct Columns {
    timestamp: usize,
    latitude: usize,
    longitude: usize,
    altitude: usize,
    azimuth: Option<usize>,
    declination: Option<usize>,
    right_ascension: Option<usize>,
    velocity: Option<usize>,
    visibility: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &[String]) -> Result<Self, BulkError> {
        let position = |name: &str| headers.iter().rposition(|h| h == name);

        let missing: Vec<String> = REQUIRED_HEADERS
            .into_iter()
            .filter(|h| position(*h).is_none())
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(BulkError::MissingHeaders(missing));
        }

        Ok(Columns {
            timestamp: position("timestamp").unwrap_or_default(),
            latitude: position("latitude").unwrap_or_default(),
            longitude: position("longitude").unwrap_or_default(),
            altitude: position("altitude").unwrap_or_default(),
            azimuth: position("azimuth"),
            declination: position("declination"),
            right_ascension: position("right_ascension"),
            velocity: position("velocity"),
            visibility: position("visibility"),
        })
    }
}

/// Parse CSV telemetry text without touching a store.
///
/// Blank lines are dropped, the first remaining line is the header row
/// (trimmed, lowercased). Every other line is one data row and is read as its
/// own RFC 4180 record, so quoted cells may contain commas but a stray quote
/// only spoils its own row. Fails only when a required header is missing.
pub fn parse_csv(raw: &str, satellite_id: Option<SatelliteId>) -> Result<ParsedCsv, BulkError> {
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());

    let headers: Vec<String> = match lines.next() {
        Some(line) => read_record(line)?
            .map(|record| record.iter().map(|h| h.to_lowercase()).collect())
            .unwrap_or_default(),
        None => Vec::new(),
    };
    let columns = Columns::from_headers(&headers)?;

    let rows = lines
        .map(|line| match read_record(line) {
            Ok(Some(record)) => parse_row(&record, &columns, satellite_id),
            Ok(None) => Err(RowError::Malformed("empty record".into())),
            Err(e) => Err(RowError::Malformed(e.to_string())),
        })
        .collect();

    Ok(ParsedCsv { rows })
}

/// [`parse_csv`] on the contents of a file.
pub fn parse_csv_file(path: impl AsRef<Path>) -> Result<ParsedCsv, BulkError> {
    let raw = std::fs::read_to_string(path)?;
    parse_csv(&raw, None)
}

/// Read a single line as one CSV record.
fn read_record(line: &str) -> Result<Option<csv::StringRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    reader.records().next().transpose()
}

/// Parse and store CSV telemetry for one satellite.
///
/// Rows that fail to parse or validate are logged and skipped; they still
/// count towards `total_rows`.
pub fn import_csv(
    store: &Store,
    raw: &str,
    satellite_id: SatelliteId,
) -> Result<ImportSummary, BulkError> {
    let parsed = parse_csv(raw, Some(satellite_id))?;
    let total_rows = parsed.total_rows();

    let mut processed_count = 0;
    for (i, row) in parsed.rows.into_iter().enumerate() {
        let stored = row.and_then(|t| store.create_telemetry(t).map_err(RowError::from));
        match stored {
            Ok(_) => processed_count += 1,
            Err(e) => log::warn!("Skipping CSV row {}: {}", i + 1, e),
        }
    }

    log::info!(
        "Imported {} of {} CSV rows for satellite {}",
        processed_count,
        total_rows,
        satellite_id
    );

    Ok(ImportSummary {
        processed_count,
        total_rows,
    })
}

fn parse_row(
    record: &csv::StringRecord,
    columns: &Columns,
    satellite_id: Option<SatelliteId>,
) -> Result<NewTelemetry, RowError> {
    let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).filter(|v| !v.is_empty());

    let timestamp_raw = cell(Some(columns.timestamp)).ok_or(RowError::Missing("timestamp"))?;
    let timestamp = parse_timestamp(timestamp_raw).ok_or_else(|| RowError::Invalid {
        column: "timestamp",
        value: timestamp_raw.to_string(),
    })?;

    let required = |column: &'static str, idx: usize| -> Result<f64, RowError> {
        let raw = cell(Some(idx)).ok_or(RowError::Missing(column))?;
        parse_real(column, raw)
    };
    let optional = |column: &'static str, idx: Option<usize>| -> Result<Option<f64>, RowError> {
        cell(idx).map(|raw| parse_real(column, raw)).transpose()
    };

    Ok(NewTelemetry {
        satellite_id,
        timestamp,
        latitude: required("latitude", columns.latitude)?,
        longitude: required("longitude", columns.longitude)?,
        altitude: required("altitude", columns.altitude)?,
        azimuth: optional("azimuth", columns.azimuth)?,
        declination: optional("declination", columns.declination)?,
        right_ascension: optional("right_ascension", columns.right_ascension)?,
        velocity: optional("velocity", columns.velocity)?,
        visibility: cell(columns.visibility).map(String::from),
    })
}

fn parse_real(column: &'static str, raw: &str) -> Result<f64, RowError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowError::Invalid {
            column,
            value: raw.to_string(),
        })
}

/// RFC 3339, RFC 2822, naive date-times (taken as UTC) or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn mixed_valid_and_bad_rows() {
        let store = Store::with_default_satellites();
        let csv = "timestamp,latitude,longitude,altitude\n2024-01-01T00:00:00Z,10,20,500\nBAD,x,y,z\n";

        let summary = import_csv(&store, csv, 1).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                processed_count: 1,
                total_rows: 2
            }
        );

        let stored = store.telemetry_for(1);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(stored[0].latitude, 10.0);
        assert_eq!(stored[0].altitude, 500.0);
    }

    #[test]
    fn missing_headers_store_nothing() {
        let store = Store::new();
        let csv = "timestamp,latitude,altitude\n2024-01-01T00:00:00Z,10,500\n";

        let err = import_csv(&store, csv, 1).unwrap_err();
        match err {
            BulkError::MissingHeaders(missing) => assert_eq!(missing, vec!["longitude"]),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.telemetry_count(), 0);
    }

    #[test]
    fn empty_input_is_missing_every_header() {
        let err = parse_csv("\n  \n", Some(1)).unwrap_err();
        match err {
            BulkError::MissingHeaders(missing) => assert_eq!(missing.len(), 4),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unparsable_latitude_rows_are_counted_but_skipped() {
        let store = Store::new();
        let mut csv = String::from("timestamp,latitude,longitude,altitude\n");
        for i in 0..10 {
            let lat = if i % 3 == 0 { "north".to_string() } else { format!("{}", i) };
            csv.push_str(&format!("2024-01-01T00:{:02}:00Z,{},20,500\n", i, lat));
        }

        let summary = import_csv(&store, &csv, 4).unwrap();
        assert_eq!(summary.total_rows, 10);
        assert_eq!(summary.processed_count, 6);
        assert_eq!(store.telemetry_for(4).len(), 6);
    }

    #[test]
    fn headers_are_case_and_space_insensitive_and_blank_lines_ignored() {
        let csv = " Timestamp , LATITUDE,Longitude ,altitude,Azimuth,right_ascension,visibility\r\n\r\n\
                   2024-01-01 10:00:00,1.5,2.5,400,180,12.25,eclipse\r\n\
                   \r\n\
                   2024-01-01,1,2,3,,,\r\n";

        let parsed = parse_csv(csv, Some(1)).unwrap();
        assert_eq!(parsed.total_rows(), 2);
        assert_eq!(parsed.valid_rows(), 2);

        let first = parsed.rows[0].as_ref().unwrap();
        assert_eq!(first.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(first.azimuth, Some(180.0));
        assert_eq!(first.right_ascension, Some(12.25));
        assert_eq!(first.visibility.as_deref(), Some("eclipse"));
        assert_eq!(first.declination, None);

        let second = parsed.rows[1].as_ref().unwrap();
        assert_eq!(second.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(second.azimuth, None);
        assert_eq!(second.visibility, None);
    }

    #[test]
    fn quoted_cells_keep_their_commas() {
        let csv = "timestamp,latitude,longitude,altitude,visibility\n\
                   2024-01-01T00:00:00Z,1,2,3,\"partly, eclipsed\"\n";
        let parsed = parse_csv(csv, None).unwrap();
        let row = parsed.rows[0].as_ref().unwrap();
        assert_eq!(row.visibility.as_deref(), Some("partly, eclipsed"));
        assert_eq!(row.satellite_id, None);
    }

    #[test]
    fn stray_quote_spoils_only_its_own_row() {
        let store = Store::new();
        let csv = "timestamp,latitude,longitude,altitude,visibility\n\
                   2024-01-01T00:00:00Z,1,2,3,\"oops\n\
                   2024-01-01T00:01:00Z,4,5,6,visible\n\
                   2024-01-01T00:02:00Z,7,8,9,eclipse\n";

        let summary = import_csv(&store, csv, 1).unwrap();
        assert_eq!(summary.total_rows, 3);

        let stored = store.telemetry_for(1);
        assert_eq!(stored.len(), summary.processed_count);
        let tail: Vec<_> = stored
            .iter()
            .filter(|p| p.latitude > 1.0)
            .map(|p| (p.latitude, p.visibility.as_deref()))
            .collect();
        assert_eq!(tail, vec![(4.0, Some("visible")), (7.0, Some("eclipse"))]);
        assert!(stored.iter().all(|p| !p.visibility.as_deref().unwrap_or("").contains('\n')));
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let err = parse_csv_file("/nonexistent/telemetry.csv").unwrap_err();
        assert!(matches!(err, BulkError::Io(_)));
    }

    #[test]
    fn bad_optional_value_skips_row() {
        let csv = "timestamp,latitude,longitude,altitude,velocity\n\
                   2024-01-01T00:00:00Z,1,2,3,fast\n\
                   2024-01-01T00:01:00Z,1,2,3,7.66\n";
        let parsed = parse_csv(csv, Some(1)).unwrap();
        assert!(matches!(
            parsed.rows[0],
            Err(RowError::Invalid { column: "velocity", .. })
        ));
        assert_eq!(parsed.rows[1].as_ref().unwrap().velocity, Some(7.66));
    }

    #[test]
    fn short_rows_are_missing_values() {
        let csv = "timestamp,latitude,longitude,altitude\n2024-01-01T00:00:00Z,1,2\n";
        let parsed = parse_csv(csv, Some(1)).unwrap();
        assert!(matches!(parsed.rows[0], Err(RowError::Missing("altitude"))));
    }

    #[test]
    fn out_of_range_rows_are_rejected_by_store() {
        let store = Store::new();
        let csv = "timestamp,latitude,longitude,altitude\n2024-01-01T00:00:00Z,95,20,500\n";
        let summary = import_csv(&store, csv, 1).unwrap();
        assert_eq!(summary.processed_count, 0);
        assert_eq!(summary.total_rows, 1);
    }

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        for raw in [
            "2024-01-01T12:30:00Z",
            "2024-01-01T13:30:00+01:00",
            "2024-01-01T12:30:00.000Z",
            "Mon, 01 Jan 2024 12:30:00 +0000",
            "2024-01-01 12:30:00",
            "2024-01-01T12:30:00",
        ] {
            assert_eq!(parse_timestamp(raw), Some(expected), "{}", raw);
        }
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::query::{telemetry, HoursWindow};
use crate::store::{Satellite, SatelliteId, Store, TelemetryPoint};

use super::error::BulkError;

pub const EXPORT_HEADER: [&str; 8] = [
    "timestamp",
    "latitude",
    "longitude",
    "altitude",
    "azimuth",
    "declination",
    "velocity",
    "visibility",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_param(raw: Option<&str>) -> Result<Self, BulkError> {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            Some(other) => Err(BulkError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryExport {
    pub satellite: Satellite,
    pub telemetry_data: Vec<TelemetryPoint>,
    pub export_time: DateTime<Utc>,
    pub data_points: usize,
}

#[derive(Debug, Clone)]
pub enum Export {
    Csv { filename: String, body: String },
    Json(TelemetryExport),
}

/// Export the telemetry history of one satellite. Read-only.
pub fn export_telemetry(
    store: &Store,
    satellite_id: SatelliteId,
    window: HoursWindow,
    format: ExportFormat,
    now: DateTime<Utc>,
) -> Result<Export, BulkError> {
    let satellite = store
        .satellite(satellite_id)
        .ok_or(BulkError::SatelliteNotFound(satellite_id))?;
    let points = telemetry::history(store, satellite_id, window, now);

    match format {
        ExportFormat::Csv => Ok(Export::Csv {
            filename: format!("{}_telemetry.csv", file_safe(&satellite.name)),
            body: to_csv(&points)?,
        }),
        ExportFormat::Json => Ok(Export::Json(TelemetryExport {
            data_points: points.len(),
            satellite,
            telemetry_data: points,
            export_time: now,
        })),
    }
}

/// CSV with [`EXPORT_HEADER`]; unset optional fields are empty cells.
pub fn to_csv(points: &[TelemetryPoint]) -> Result<String, BulkError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for p in points {
        writer.write_record([
            p.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            p.latitude.to_string(),
            p.longitude.to_string(),
            p.altitude.to_string(),
            optional(p.azimuth),
            optional(p.declination),
            optional(p.velocity),
            p.visibility.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || " -_().".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::bulk::import_csv;
    use crate::store::NewTelemetry;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    fn seeded() -> Store {
        let store = Store::with_default_satellites();
        store
            .create_telemetry(NewTelemetry {
                satellite_id: Some(1),
                timestamp: now() - Duration::minutes(2),
                latitude: 51.5,
                longitude: -0.1,
                altitude: 420.3,
                azimuth: Some(0.0),
                declination: None,
                right_ascension: Some(10.0),
                velocity: Some(7.66),
                visibility: Some("visible".into()),
            })
            .unwrap();
        store
            .create_telemetry(NewTelemetry {
                satellite_id: Some(1),
                timestamp: now() - Duration::minutes(1),
                latitude: 51.6,
                longitude: -0.05,
                altitude: 421.0,
                azimuth: None,
                declination: None,
                right_ascension: None,
                velocity: None,
                visibility: None,
            })
            .unwrap();
        store
            .create_telemetry(NewTelemetry {
                satellite_id: Some(1),
                timestamp: now() - Duration::hours(48),
                latitude: 0.0,
                longitude: 0.0,
                altitude: 400.0,
                azimuth: None,
                declination: None,
                right_ascension: None,
                velocity: None,
                visibility: None,
            })
            .unwrap();
        store
    }

    #[test]
    fn csv_layout() {
        let store = seeded();
        let export =
            export_telemetry(&store, 1, HoursWindow::default(), ExportFormat::Csv, now()).unwrap();
        let Export::Csv { filename, body } = export else {
            panic!("expected csv export");
        };

        assert_eq!(filename, "ISS (ZARYA)_telemetry.csv");
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines,
            vec![
                "timestamp,latitude,longitude,altitude,azimuth,declination,velocity,visibility",
                "2024-07-01T11:58:00.000Z,51.5,-0.1,420.3,0,,7.66,visible",
                "2024-07-01T11:59:00.000Z,51.6,-0.05,421,,,,",
            ]
        );
    }

    #[test]
    fn csv_export_reimports() {
        let source = seeded();
        let Export::Csv { body, .. } =
            export_telemetry(&source, 1, HoursWindow::default(), ExportFormat::Csv, now()).unwrap()
        else {
            panic!("expected csv export");
        };

        let target = Store::with_default_satellites();
        let summary = import_csv(&target, &body, 2).unwrap();
        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.processed_count, 2);

        let copied = target.telemetry_for(2);
        assert_eq!(copied[0].timestamp, now() - Duration::minutes(2));
        assert_eq!(copied[0].velocity, Some(7.66));
        assert_eq!(copied[1].altitude, 421.0);
    }

    #[test]
    fn json_export_carries_satellite_and_count() {
        let store = seeded();
        let export =
            export_telemetry(&store, 1, HoursWindow::new(72.0), ExportFormat::Json, now()).unwrap();
        let Export::Json(export) = export else {
            panic!("expected json export");
        };
        assert_eq!(export.satellite.norad_id, 25544);
        assert_eq!(export.data_points, 3);
        assert_eq!(export.telemetry_data.len(), 3);
        assert_eq!(export.export_time, now());

        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["dataPoints"], 3);
        assert!(value["telemetryData"].is_array());
    }

    #[test]
    fn export_does_not_mutate() {
        let store = seeded();
        for format in [ExportFormat::Csv, ExportFormat::Json] {
            export_telemetry(&store, 1, HoursWindow::default(), format, now()).unwrap();
        }
        assert_eq!(store.telemetry_count(), 3);
    }

    #[test]
    fn unknown_satellite_and_format() {
        let store = seeded();
        assert!(matches!(
            export_telemetry(&store, 42, HoursWindow::default(), ExportFormat::Csv, now()),
            Err(BulkError::SatelliteNotFound(42))
        ));
        assert!(matches!(
            ExportFormat::from_param(Some("xml")),
            Err(BulkError::UnknownFormat(_))
        ));
        assert_eq!(ExportFormat::from_param(Some("JSON")).unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::from_param(None).unwrap(), ExportFormat::Csv);
    }

    #[test]
    fn file_names_are_header_safe() {
        assert_eq!(file_safe("a\"b\r\nc"), "a_b__c");
    }
}

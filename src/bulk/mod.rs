mod error;
mod export;
mod import;

pub use error::BulkError;
pub use export::{export_telemetry, Export, ExportFormat, TelemetryExport};
pub use import::{import_csv, parse_csv_file};

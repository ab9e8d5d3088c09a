use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::passes::PassesQuery;
use super::api::satellites::ListSatellitesQuery;
use super::api::telemetry::{HoursQuery, TelemetryInput, TelemetrySnapshot};
use super::api::transfer::{ExportQuery, UploadRequest, UploadResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::satellites::list_satellites,
        super::api::satellites::get_satellite,
        super::api::satellites::create_satellite,
        super::api::satellites::update_satellite,
        super::api::telemetry::get_telemetry,
        super::api::telemetry::create_telemetry,
        super::api::telemetry::get_orbital_elements,
        super::api::telemetry::create_orbital_elements,
        super::api::passes::list_passes,
        super::api::passes::create_pass,
        super::api::live::live_position,
        super::api::transfer::upload_csv,
        super::api::transfer::export,
    ),
    components(
        schemas(
            ErrorResponse,
            ListSatellitesQuery,
            HoursQuery,
            PassesQuery,
            ExportQuery,
            TelemetryInput,
            TelemetrySnapshot,
            UploadRequest,
            UploadResponse,
            crate::store::Satellite,
            crate::store::NewSatellite,
            crate::store::SatelliteUpdate,
            crate::store::TelemetryPoint,
            crate::store::SatellitePass,
            crate::store::NewPass,
            crate::store::OrbitalElements,
            crate::store::NewOrbitalElements,
            crate::bulk::TelemetryExport,
        )
    ),
    info(
        title = "Sat-O-Scope Telemetry API",
        description = "Satellite catalogue, telemetry history, passes and live positions",
        version = "0.1.0"
    ),
    tags(
        (name = "satellites", description = "Satellite catalogue"),
        (name = "telemetry", description = "Telemetry history and orbital elements"),
        (name = "passes", description = "Upcoming passes"),
        (name = "live", description = "Live positions from the tracking provider"),
        (name = "transfer", description = "CSV import and export")
    )
)]
pub struct ApiDoc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::bulk::{export_telemetry, import_csv, Export, ExportFormat};
use crate::query::HoursWindow;
use crate::store::SatelliteId;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub csv_data: Option<String>,
    #[serde(default)]
    pub satellite_id: Option<SatelliteId>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub processed_count: usize,
    pub total_rows: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/telemetry/upload",
    tag = "transfer",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Import counts", body = UploadResponse),
        (status = 400, description = "Missing input or required CSV headers", body = ErrorResponse)
    )
)]
pub async fn upload_csv(
    State(state): State<AppState>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let Json(request) = payload?;
    let (Some(csv_data), Some(satellite_id)) = (
        request.csv_data.filter(|c| !c.trim().is_empty()),
        request.satellite_id,
    ) else {
        return Err(ApiError::Validation(
            "CSV data and satellite ID required".into(),
        ));
    };

    let summary = import_csv(&state.store, &csv_data, satellite_id)?;

    Ok(Json(UploadResponse {
        message: format!("Successfully processed {} records", summary.processed_count),
        processed_count: summary.processed_count,
        total_rows: summary.total_rows,
    }))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}/export",
    tag = "transfer",
    params(
        ("id" = u64, Path, description = "Satellite ID"),
        ("format" = Option<String>, Query, description = "csv (default) or json"),
        ("hours" = Option<String>, Query, description = "History window in hours (default 24)")
    ),
    responses(
        (status = 200, description = "CSV attachment or JSON export", body = crate::bulk::TelemetryExport),
        (status = 400, description = "Unknown format", body = ErrorResponse),
        (status = 404, description = "Satellite not found", body = ErrorResponse)
    )
)]
pub async fn export(
    State(state): State<AppState>,
    path: Result<Path<SatelliteId>, PathRejection>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Path(id) = path?;
    let Query(query) = query?;
    let format = ExportFormat::from_param(query.format.as_deref())?;
    let window = HoursWindow::from_param(query.hours.as_deref());

    match export_telemetry(&state.store, id, window, format, Utc::now())? {
        Export::Csv { filename, body } => Ok((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            body,
        )
            .into_response()),
        Export::Json(export) => Ok(Json(export).into_response()),
    }
}

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::query::{elements, telemetry, HoursWindow};
use crate::store::{NewOrbitalElements, NewTelemetry, OrbitalElements, SatelliteId, TelemetryPoint};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct HoursQuery {
    #[serde(default)]
    pub hours: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TelemetrySnapshot {
    pub latest: Option<TelemetryPoint>,
    pub history: Vec<TelemetryPoint>,
}

/// Manual telemetry entry. The timestamp defaults to the time of the request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryInput {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    #[serde(default)]
    pub azimuth: Option<f64>,
    #[serde(default)]
    pub declination: Option<f64>,
    #[serde(default)]
    pub right_ascension: Option<f64>,
    #[serde(default)]
    pub velocity: Option<f64>,
    #[serde(default)]
    pub visibility: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}/telemetry",
    tag = "telemetry",
    params(
        ("id" = u64, Path, description = "Satellite ID"),
        ("hours" = Option<String>, Query, description = "History window in hours (default 24)")
    ),
    responses(
        (status = 200, description = "Latest sample and windowed history", body = TelemetrySnapshot)
    )
)]
pub async fn get_telemetry(
    State(state): State<AppState>,
    path: Result<Path<SatelliteId>, PathRejection>,
    query: Result<Query<HoursQuery>, QueryRejection>,
) -> ApiResult<Json<TelemetrySnapshot>> {
    let Path(id) = path?;
    let Query(query) = query?;
    let window = HoursWindow::from_param(query.hours.as_deref());
    let store = &state.store;

    Ok(Json(TelemetrySnapshot {
        latest: telemetry::latest(store, id),
        history: telemetry::history(store, id, window, Utc::now()),
    }))
}

#[utoipa::path(
    post,
    path = "/api/satellites/{id}/telemetry",
    tag = "telemetry",
    params(
        ("id" = u64, Path, description = "Satellite ID")
    ),
    request_body = TelemetryInput,
    responses(
        (status = 201, description = "Stored sample", body = TelemetryPoint),
        (status = 400, description = "Invalid telemetry data", body = ErrorResponse)
    )
)]
pub async fn create_telemetry(
    State(state): State<AppState>,
    path: Result<Path<SatelliteId>, PathRejection>,
    payload: Result<Json<TelemetryInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let point = state.store.create_telemetry(NewTelemetry {
        satellite_id: Some(id),
        timestamp: input.timestamp.unwrap_or_else(Utc::now),
        latitude: input.latitude,
        longitude: input.longitude,
        altitude: input.altitude,
        azimuth: input.azimuth,
        declination: input.declination,
        right_ascension: input.right_ascension,
        velocity: input.velocity,
        visibility: input.visibility,
    })?;
    Ok((StatusCode::CREATED, Json(point)))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}/orbital",
    tag = "telemetry",
    params(
        ("id" = u64, Path, description = "Satellite ID")
    ),
    responses(
        (status = 200, description = "Newest orbital elements", body = OrbitalElements),
        (status = 404, description = "No orbital elements found", body = ErrorResponse)
    )
)]
pub async fn get_orbital_elements(
    State(state): State<AppState>,
    path: Result<Path<SatelliteId>, PathRejection>,
) -> ApiResult<Json<OrbitalElements>> {
    let Path(id) = path?;
    elements::latest(&state.store, id)
        .map(Json)
        .ok_or(ApiError::NotFound("orbital_elements_not_found"))
}

#[utoipa::path(
    post,
    path = "/api/satellites/{id}/orbital",
    tag = "telemetry",
    params(
        ("id" = u64, Path, description = "Satellite ID")
    ),
    request_body = NewOrbitalElements,
    responses(
        (status = 201, description = "Stored snapshot", body = OrbitalElements),
        (status = 400, description = "Invalid orbital elements", body = ErrorResponse)
    )
)]
pub async fn create_orbital_elements(
    State(state): State<AppState>,
    path: Result<Path<SatelliteId>, PathRejection>,
    payload: Result<Json<NewOrbitalElements>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(mut new) = payload?;
    new.satellite_id = Some(id);
    let snapshot = state.store.create_orbital_elements(new)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

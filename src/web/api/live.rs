use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::poller::Observer;
use crate::store::SatelliteId;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LiveQuery {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub alt: Option<f64>,
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}/live",
    tag = "live",
    params(
        ("id" = u64, Path, description = "Satellite ID"),
        ("lat" = Option<f64>, Query, description = "Observer latitude (default from config)"),
        ("lng" = Option<f64>, Query, description = "Observer longitude (default from config)"),
        ("alt" = Option<f64>, Query, description = "Observer altitude in metres (default from config)")
    ),
    responses(
        (status = 200, description = "Provider payload with the stored record as telemetryData"),
        (status = 400, description = "Invalid observer position", body = ErrorResponse),
        (status = 404, description = "Satellite or position not found", body = ErrorResponse),
        (status = 500, description = "Provider API key not configured", body = ErrorResponse),
        (status = 502, description = "Provider failed", body = ErrorResponse)
    )
)]
pub async fn live_position(
    State(state): State<AppState>,
    path: Result<Path<SatelliteId>, PathRejection>,
    query: Result<Query<LiveQuery>, QueryRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Path(id) = path?;
    let Query(query) = query?;
    let observer = state
        .poller
        .default_observer()
        .with_overrides(query.lat, query.lng, query.alt);
    check_observer(&observer)?;

    let reading = state.poller.poll(id, observer).await?;
    Ok(Json(reading.into_body()))
}

fn check_observer(observer: &Observer) -> ApiResult<()> {
    let Observer {
        latitude,
        longitude,
        altitude_m,
    } = *observer;
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ApiError::Validation(format!("lat {} outside [-90, 90]", latitude)));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ApiError::Validation(format!(
            "lng {} outside [-180, 180]",
            longitude
        )));
    }
    if !altitude_m.is_finite() {
        return Err(ApiError::Validation(format!("alt {} is not finite", altitude_m)));
    }
    Ok(())
}

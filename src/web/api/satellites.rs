use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::store::{NewSatellite, Satellite, SatelliteId, SatelliteUpdate};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListSatellitesQuery {
    #[serde(default)]
    pub include_inactive: Option<bool>,
    #[serde(default)]
    pub norad_id: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    tag = "satellites",
    params(
        ("includeInactive" = Option<bool>, Query, description = "Also list deactivated satellites"),
        ("noradId" = Option<u32>, Query, description = "Only the satellite with this NORAD catalog number")
    ),
    responses(
        (status = 200, description = "Satellites in creation order", body = Vec<Satellite>)
    )
)]
pub async fn list_satellites(
    State(state): State<AppState>,
    query: Result<Query<ListSatellitesQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let include_inactive = query.include_inactive.unwrap_or(false);
    let candidates = match query.norad_id {
        Some(norad_id) => state.store.satellite_by_norad_id(norad_id).into_iter().collect(),
        None => state.store.satellites(),
    };
    let satellites: Vec<Satellite> = candidates
        .into_iter()
        .filter(|s| include_inactive || s.is_active)
        .collect();
    Ok(Json(satellites))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}",
    tag = "satellites",
    params(
        ("id" = u64, Path, description = "Satellite ID")
    ),
    responses(
        (status = 200, description = "Satellite", body = Satellite),
        (status = 404, description = "Satellite not found", body = ErrorResponse)
    )
)]
pub async fn get_satellite(
    State(state): State<AppState>,
    path: Result<Path<SatelliteId>, PathRejection>,
) -> ApiResult<Json<Satellite>> {
    let Path(id) = path?;
    state
        .store
        .satellite(id)
        .map(Json)
        .ok_or(ApiError::NotFound("satellite_not_found"))
}

#[utoipa::path(
    post,
    path = "/api/satellites",
    tag = "satellites",
    request_body = NewSatellite,
    responses(
        (status = 201, description = "Satellite created", body = Satellite),
        (status = 400, description = "Invalid satellite data", body = ErrorResponse)
    )
)]
pub async fn create_satellite(
    State(state): State<AppState>,
    payload: Result<Json<NewSatellite>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(new) = payload?;
    let satellite = state.store.create_satellite(new)?;
    log::info!("Created satellite {} ({})", satellite.name, satellite.norad_id);
    Ok((StatusCode::CREATED, Json(satellite)))
}

#[utoipa::path(
    patch,
    path = "/api/satellites/{id}",
    tag = "satellites",
    params(
        ("id" = u64, Path, description = "Satellite ID")
    ),
    request_body = SatelliteUpdate,
    responses(
        (status = 200, description = "Updated satellite", body = Satellite),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Satellite not found", body = ErrorResponse)
    )
)]
pub async fn update_satellite(
    State(state): State<AppState>,
    path: Result<Path<SatelliteId>, PathRejection>,
    payload: Result<Json<SatelliteUpdate>, JsonRejection>,
) -> ApiResult<Json<Satellite>> {
    let Path(id) = path?;
    let Json(update) = payload?;
    state
        .store
        .update_satellite(id, update)?
        .map(Json)
        .ok_or(ApiError::NotFound("satellite_not_found"))
}

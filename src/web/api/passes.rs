use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::query::{passes, HoursWindow};
use crate::store::{NewPass, SatelliteId, SatellitePass};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassesQuery {
    #[serde(default)]
    pub satellite_id: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/passes",
    tag = "passes",
    params(
        ("satelliteId" = Option<u64>, Query, description = "Only passes of this satellite"),
        ("hours" = Option<String>, Query, description = "Look-ahead window in hours (default 24)")
    ),
    responses(
        (status = 200, description = "Upcoming passes, earliest first", body = Vec<SatellitePass>),
        (status = 400, description = "Invalid satellite ID", body = ErrorResponse)
    )
)]
pub async fn list_passes(
    State(state): State<AppState>,
    query: Result<Query<PassesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<SatellitePass>>> {
    let Query(query) = query?;
    let satellite = query
        .satellite_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<SatelliteId>()
                .map_err(|_| ApiError::Validation(format!("invalid satelliteId {:?}", s)))
        })
        .transpose()?;
    let window = HoursWindow::from_param(query.hours.as_deref());

    Ok(Json(passes::upcoming(
        &state.store,
        satellite,
        window,
        Utc::now(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/passes",
    tag = "passes",
    request_body = NewPass,
    responses(
        (status = 201, description = "Stored pass", body = SatellitePass),
        (status = 400, description = "Invalid pass", body = ErrorResponse)
    )
)]
pub async fn create_pass(
    State(state): State<AppState>,
    payload: Result<Json<NewPass>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(new) = payload?;
    let pass = state.store.create_pass(new)?;
    Ok((StatusCode::CREATED, Json(pass)))
}

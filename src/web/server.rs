use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::api::{live, passes, satellites, telemetry, transfer};
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Satellites
        .route(
            "/api/satellites",
            get(satellites::list_satellites).post(satellites::create_satellite),
        )
        .route(
            "/api/satellites/{id}",
            get(satellites::get_satellite).patch(satellites::update_satellite),
        )
        // Telemetry and orbital elements
        .route(
            "/api/satellites/{id}/telemetry",
            get(telemetry::get_telemetry).post(telemetry::create_telemetry),
        )
        .route(
            "/api/satellites/{id}/orbital",
            get(telemetry::get_orbital_elements).post(telemetry::create_orbital_elements),
        )
        .route("/api/satellites/{id}/live", get(live::live_position))
        // Passes
        .route(
            "/api/passes",
            get(passes::list_passes).post(passes::create_pass),
        )
        // Import / export
        .route("/api/telemetry/upload", post(transfer::upload_csv))
        .route("/api/satellites/{id}/export", get(transfer::export))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let state = AppState::from_config(config).map_err(std::io::Error::other)?;
    let bind_addr = state.config.web.bind.clone();
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

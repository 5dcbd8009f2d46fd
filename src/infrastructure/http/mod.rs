pub mod request_id;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{audio_mock, health, synthesize::SynthesizeController};
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, X_REQUEST_ID};

/// Build the application router
pub fn create_router(config: Arc<Config>, synthesize_controller: Arc<SynthesizeController>) -> Router {
    let synthesize_routes = Router::new()
        .route(
            "/api/synthesize",
            post(SynthesizeController::synthesize).fallback(SynthesizeController::method_not_allowed),
        )
        .with_state(synthesize_controller);

    let mock_routes = Router::new()
        .route("/api/audio-mock", get(audio_mock::audio_mock))
        .with_state(config);

    Router::new()
        .route("/health", get(health::health))
        .merge(synthesize_routes)
        .merge(mock_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    synthesize_controller: Arc<SynthesizeController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(config.clone(), synthesize_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

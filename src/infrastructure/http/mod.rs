pub mod request_id;

use axum::{
    http::Method,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::controllers::{health, tts::TtsController};
use crate::domain::tts::RateLimitedSynthesizer;
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Build the application router with all routes and layers
pub fn build_router(tts_controller: Arc<TtsController>, synthesizer: Arc<RateLimitedSynthesizer>) -> Router {
    let tts_routes = Router::new()
        .route("/synthesize", post(TtsController::synthesize))
        .with_state(tts_controller);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(synthesizer)
        .merge(tts_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    tts_controller: Arc<TtsController>,
    synthesizer: Arc<RateLimitedSynthesizer>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(tts_controller, synthesizer);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

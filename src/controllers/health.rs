use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::tts::RateLimitedSynthesizer;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(synthesizer): State<Arc<RateLimitedSynthesizer>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "tts": synthesizer.provider_name(),
            "cache_entries": synthesizer.cache_entries(),
            "rate_window_in_use": synthesizer.rate_window_in_use(),
        })),
    )
}

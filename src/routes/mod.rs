use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::RecommendationSource,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{DatasetStore, DetailGenerator, Translator},
};

pub mod recommend;
pub mod translate;

/// Shared application state, read-only after startup
pub struct AppState {
    pub dataset: Arc<DatasetStore>,
    pub details: DetailGenerator,
    pub translator: Translator,
    pub source: RecommendationSource,
    /// City used by discovery mode when a request names none
    pub default_location: String,
}

/// Creates the application router with all routes and layers
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/recommend", post(recommend::recommend))
        .route("/translate", post(translate::translate))
        .with_state(state)
        .layer(
            // Outermost first: the request id must exist before the trace span reads it.
            ServiceBuilder::new()
                .layer(CorsLayer::very_permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

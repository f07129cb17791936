use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{TranslateRequest, TranslateResponse},
    routes::AppState,
};

/// Handler for translating a recommendation
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<TranslateRequest>,
) -> AppResult<Json<TranslateResponse>> {
    tracing::info!(
        request_id = %request_id,
        language = %request.language,
        "Processing translation request"
    );

    let translated_text = state
        .translator
        .translate(&request.text, &request.language)
        .await?;

    Ok(Json(TranslateResponse { translated_text }))
}

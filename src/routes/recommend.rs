use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{
    config::RecommendationSource,
    error::AppResult,
    middleware::request_id::RequestId,
    models::{MoodRequest, RecommendResponse},
    routes::AppState,
    services::{
        details::{format_discovered_restaurant, format_restaurant_details, title_case},
        recommender::{self, DEFAULT_TOP_N},
    },
};

/// Handler for mood-based recommendations
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<MoodRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let mood = request.mood.to_lowercase();

    tracing::info!(
        request_id = %request_id,
        mood = %mood,
        source = ?state.source,
        "Processing recommendation request"
    );

    let response = match state.source {
        RecommendationSource::Dataset => from_dataset(&state, &mood).await?,
        RecommendationSource::Discovery => {
            let location = request
                .location
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or(state.default_location.as_str());
            let restaurant = state.details.discover(&mood, location).await?;
            RecommendResponse::Recommendation {
                recommendation: format_discovered_restaurant(&restaurant, &title_case(&mood)),
            }
        }
    };

    tracing::info!(
        request_id = %request_id,
        matched = matches!(response, RecommendResponse::Recommendation { .. }),
        "Recommendation completed"
    );

    Ok(Json(response))
}

async fn from_dataset(state: &AppState, mood: &str) -> AppResult<RecommendResponse> {
    let table = state.dataset.get().await?;

    let pick = {
        let mut rng = rand::thread_rng();
        recommender::recommend(&table, mood, DEFAULT_TOP_N, &mut rng)
    };

    let Some(pick) = pick else {
        return Ok(RecommendResponse::no_match());
    };

    let restaurant = &pick.record;
    let detail = state
        .details
        .describe(&restaurant.business_name, &restaurant.city, &restaurant.address)
        .await?;

    Ok(RecommendResponse::Recommendation {
        recommendation: format_restaurant_details(&detail, &title_case(mood)),
    })
}

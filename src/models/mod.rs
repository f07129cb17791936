use serde::{Deserialize, Serialize};

pub mod language;
pub mod restaurant;
pub mod review;

pub use language::Language;
pub use restaurant::{DiscoveredRestaurant, OutputSchema, RestaurantDetail};
pub use review::{ReviewRecord, ReviewTable, SAMPLE_SEED};

/// Message returned when no review carries the requested mood
pub const NO_MATCH_MESSAGE: &str = "No restaurants found for this mood!";

/// The review picked for a mood, with a display-sized excerpt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub record: ReviewRecord,
    pub short_review: String,
}

// ============================================================================
// HTTP request/response types
// ============================================================================

/// Request for a mood-based recommendation
#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    pub mood: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Request to translate a recommendation
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub language: String,
}

/// `/recommend` body: either the formatted recommendation or a no-match notice
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RecommendResponse {
    Recommendation { recommendation: String },
    NoMatch { error: String },
}

impl RecommendResponse {
    pub fn no_match() -> Self {
        RecommendResponse::NoMatch {
            error: NO_MATCH_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

use std::sync::{Arc, Mutex};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use moodbite_api::{
    config::RecommendationSource,
    error::{AppError, AppResult},
    models::{ReviewRecord, ReviewTable},
    routes::{create_router, AppState},
    services::{providers::LanguageModel, DatasetStore, DetailGenerator, Translator},
};

/// Model stub that replays queued responses and records every prompt
struct ScriptedModel {
    responses: Mutex<Vec<AppResult<String>>>,
    prompts: Mutex<Vec<(String, f32)>>,
}

impl ScriptedModel {
    fn with_responses(responses: Vec<AppResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().rev().collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<(String, f32)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str, temperature: f32) -> AppResult<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), temperature));
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(AppError::ExternalApi("no scripted response".to_string())))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn review(name: &str, user: &str, mood: &str, stars: f64) -> ReviewRecord {
    ReviewRecord {
        business_name: name.to_string(),
        address: format!("{} Market St", stars as u32),
        city: "Philadelphia".to_string(),
        user_id: user.to_string(),
        mood: mood.to_string(),
        review: "Wonderful evening with great service and food".to_string(),
        review_stars: stars,
    }
}

fn detail_json(name: &str) -> String {
    json!({
        "name": name,
        "phone": "(215) 555-0100",
        "address": "1 Market St, Philadelphia",
        "summary": "Candlelit trattoria",
        "moods": "romantic",
        "highlight": "Fresh pasta",
        "rating": "4.7",
        "hours": "5pm - 11pm",
        "price": "$$$",
        "popular_items": "Tiramisu"
    })
    .to_string()
}

fn create_test_server(
    model: Arc<ScriptedModel>,
    table: ReviewTable,
    source: RecommendationSource,
) -> TestServer {
    let state = Arc::new(AppState {
        dataset: Arc::new(DatasetStore::preloaded(table)),
        details: DetailGenerator::new(model.clone()),
        translator: Translator::new(model),
        source,
        default_location: "Philadelphia".to_string(),
    });
    TestServer::new(create_router(state)).unwrap()
}

fn romantic_table() -> ReviewTable {
    ReviewTable::new(vec![
        review("Bella Notte", "u1", "romantic", 5.0),
        review("Luna", "u1", "romantic", 5.0),
        review("Greasy Spoon", "u1", "romantic", 3.0),
        review("Summit", "u2", "adventurous", 4.0),
    ])
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(
        ScriptedModel::with_responses(vec![]),
        ReviewTable::default(),
        RecommendationSource::Dataset,
    );
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_recommend_from_dataset() {
    let model = ScriptedModel::with_responses(vec![Ok(detail_json("ignored"))]);
    let server = create_test_server(model.clone(), romantic_table(), RecommendationSource::Dataset);

    let response = server
        .post("/recommend")
        .json(&json!({ "mood": "Romantic" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let text = body["recommendation"].as_str().unwrap();
    assert!(text.starts_with("📝 Summary: Candlelit trattoria\n"));
    assert!(text.contains("😊 Moods: Romantic\n"));

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    let (prompt, temperature) = &prompts[0];
    assert!(
        prompt.contains("Give me the details of Bella Notte in Philadelphia on 5 Market St")
            || prompt.contains("Give me the details of Luna in Philadelphia on 5 Market St")
    );
    assert!(!prompt.contains("Greasy Spoon"));
    assert!((temperature - 0.3).abs() < 1e-6);
}

#[tokio::test]
async fn test_recommend_unknown_mood_returns_no_match() {
    let model = ScriptedModel::with_responses(vec![]);
    let server = create_test_server(model.clone(), romantic_table(), RecommendationSource::Dataset);

    let response = server
        .post("/recommend")
        .json(&json!({ "mood": "melancholic" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "No restaurants found for this mood!" }));
    assert!(model.prompts().is_empty());
}

#[tokio::test]
async fn test_recommend_schema_mismatch_is_server_error() {
    let model = ScriptedModel::with_responses(vec![Ok(r#"{"phone": "555"}"#.to_string())]);
    let server = create_test_server(model, romantic_table(), RecommendationSource::Dataset);

    let response = server
        .post("/recommend")
        .json(&json!({ "mood": "romantic" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_recommend_model_failure_is_server_error() {
    let model = ScriptedModel::with_responses(vec![Err(AppError::ExternalApi(
        "Gemini API returned status 503".to_string(),
    ))]);
    let server = create_test_server(model, romantic_table(), RecommendationSource::Dataset);

    let response = server
        .post("/recommend")
        .json(&json!({ "mood": "romantic" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_recommend_discovery_uses_default_location() {
    let model = ScriptedModel::with_responses(vec![Ok(detail_json("Taco Rocket"))]);
    let server = create_test_server(
        model.clone(),
        ReviewTable::default(),
        RecommendationSource::Discovery,
    );

    let response = server
        .post("/recommend")
        .json(&json!({ "mood": "Adventurous" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let text = body["recommendation"].as_str().unwrap();
    assert!(text.starts_with("🍴 Restaurant: Taco Rocket\n"));
    assert!(text.contains("😊 Moods: Adventurous\n"));

    let prompts = model.prompts();
    let (prompt, temperature) = &prompts[0];
    assert!(prompt.contains("in Philadelphia"));
    assert!(prompt.contains("feeling adventurous"));
    assert!((temperature - 0.9).abs() < 1e-6);
}

#[tokio::test]
async fn test_recommend_discovery_uses_request_location() {
    let model = ScriptedModel::with_responses(vec![Ok(detail_json("Harbor House"))]);
    let server = create_test_server(
        model.clone(),
        ReviewTable::default(),
        RecommendationSource::Discovery,
    );

    let response = server
        .post("/recommend")
        .json(&json!({ "mood": "cozy", "location": "Boston" }))
        .await;

    response.assert_status_ok();
    assert!(model.prompts()[0].0.contains("in Boston"));
}

#[tokio::test]
async fn test_translate() {
    let model = ScriptedModel::with_responses(vec![Ok(
        "Here's the translation in French:\n📝 Résumé : Trattoria".to_string(),
    )]);
    let server = create_test_server(model.clone(), ReviewTable::default(), RecommendationSource::Dataset);

    let response = server
        .post("/translate")
        .json(&json!({ "text": "📝 Summary: Trattoria", "language": "French" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({ "translated_text": "📝 Résumé : Trattoria" }));

    let prompts = model.prompts();
    let (prompt, temperature) = &prompts[0];
    assert!(prompt.contains("to French"));
    assert!((temperature - 0.1).abs() < 1e-6);
}

#[tokio::test]
async fn test_translate_unsupported_language() {
    let model = ScriptedModel::with_responses(vec![]);
    let server = create_test_server(model.clone(), ReviewTable::default(), RecommendationSource::Dataset);

    let response = server
        .post("/translate")
        .json(&json!({ "text": "Hello", "language": "Klingon" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Language Klingon not supported!" }));
    assert!(model.prompts().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(
        ScriptedModel::with_responses(vec![]),
        ReviewTable::default(),
        RecommendationSource::Dataset,
    );
    let id = "7f8d6c1e-2b4a-4c3d-9e5f-0a1b2c3d4e5f";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let server = create_test_server(
        ScriptedModel::with_responses(vec![]),
        ReviewTable::default(),
        RecommendationSource::Dataset,
    );

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://frontend.example"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("access-control-allow-origin"),
        "http://frontend.example"
    );
}

use std::sync::Arc;

use anyhow::Context;
use moodbite_api::{
    config::{Config, DatasetLoading},
    routes::{create_router, AppState},
    services::{
        providers::{gemini::GeminiClient, huggingface::HuggingFaceHub, LanguageModel},
        DatasetLoader, DatasetStore, DetailGenerator, RetryPolicy, Translator,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let model: Arc<dyn LanguageModel> = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
    ));

    let hub = HuggingFaceHub::new(
        config.hf_endpoint.clone(),
        config.hf_token.clone(),
        config.dataset_cache_dir.clone(),
    );

    let loader = DatasetLoader::new(
        Arc::new(hub),
        config.repo_id.clone(),
        config.file_name.clone(),
        config.max_rows,
        RetryPolicy {
            attempts: config.download_attempts,
            delay: config.retry_delay(),
        },
    );
    let dataset = Arc::new(DatasetStore::new(loader));

    if config.dataset_loading == DatasetLoading::Eager {
        let table = dataset
            .get()
            .await
            .context("Dataset failed to load")?;
        tracing::info!(rows = table.len(), "Dataset ready");
    }

    let state = Arc::new(AppState {
        dataset,
        details: DetailGenerator::new(Arc::clone(&model)),
        translator: Translator::new(model),
        source: config.recommendation_source,
        default_location: config.default_location.clone(),
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        address = %addr,
        loading = ?config.dataset_loading,
        source = ?config.recommendation_source,
        model = %config.gemini_model,
        "Server running"
    );

    axum::serve(listener, app).await?;

    Ok(())
}

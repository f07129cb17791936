use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

use crate::error::{AppError, AppResult};

/// When the review dataset is loaded
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatasetLoading {
    /// Load before the listener is bound; a failed load aborts startup
    Eager,
    /// Load on the first request that needs it
    Lazy,
}

/// Where `/recommend` gets its restaurant from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    /// Mood expert lookup over the review dataset, then identity-mode details
    Dataset,
    /// Ask the model to pick a restaurant for the mood and location
    Discovery,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Gemini API key
    pub gemini_api_key: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Hugging Face dataset repository id
    pub repo_id: String,

    /// Parquet file inside the dataset repository
    pub file_name: String,

    /// Row cap applied after download
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Hugging Face hub base URL
    #[serde(default = "default_hf_endpoint")]
    pub hf_endpoint: String,

    #[serde(default)]
    pub hf_token: Option<String>,

    /// Directory holding downloaded dataset files
    #[serde(default = "default_dataset_cache_dir")]
    pub dataset_cache_dir: PathBuf,

    #[serde(default = "default_download_attempts")]
    pub download_attempts: u32,

    #[serde(default = "default_download_retry_delay_secs")]
    pub download_retry_delay_secs: u64,

    #[serde(default = "default_dataset_loading")]
    pub dataset_loading: DatasetLoading,

    #[serde(default = "default_recommendation_source")]
    pub recommendation_source: RecommendationSource,

    /// City used by discovery mode when the request has no location
    #[serde(default = "default_location")]
    pub default_location: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_max_rows() -> usize {
    1000
}

fn default_hf_endpoint() -> String {
    "https://huggingface.co".to_string()
}

fn default_dataset_cache_dir() -> PathBuf {
    PathBuf::from(".cache/datasets")
}

fn default_download_attempts() -> u32 {
    3
}

fn default_download_retry_delay_secs() -> u64 {
    5
}

fn default_dataset_loading() -> DatasetLoading {
    DatasetLoading::Eager
}

fn default_recommendation_source() -> RecommendationSource {
    RecommendationSource::Dataset
}

fn default_location() -> String {
    "Philadelphia".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self::from_vars(std::env::vars())?)
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;

        if config.gemini_api_key.trim().is_empty() {
            return Err(AppError::Config(
                "GEMINI_API_KEY is missing! Check your .env file.".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.download_retry_delay_secs)
    }
}

/// External service abstractions
///
/// Two outbound dependencies sit behind traits so they can be swapped or mocked:
/// the generative language model used for details and translation, and the
/// remote hub the review dataset is downloaded from.
use std::path::PathBuf;

use crate::error::AppResult;

pub mod gemini;
pub mod huggingface;

/// Text-in/text-out generative model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends a single prompt and returns the model's text.
    ///
    /// `temperature` is chosen per call site: higher for creative picks,
    /// lower for extraction and translation.
    async fn generate(&self, prompt: &str, temperature: f32) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Source of dataset files
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// Makes `filename` from dataset `repo_id` available locally and returns its path
    async fn fetch(&self, repo_id: &str, filename: &str) -> AppResult<PathBuf>;

    fn name(&self) -> &'static str;
}

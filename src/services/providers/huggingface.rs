/// Hugging Face hub dataset downloads
///
/// Files are fetched from `{endpoint}/datasets/{repo_id}/resolve/main/{filename}`
/// and kept in a local cache directory. A cached file is returned as-is, so
/// only the first start (or a cleared cache) touches the network.
use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    services::providers::DatasetFetcher,
};
use reqwest::Client as HttpClient;

const REVISION: &str = "main";

#[derive(Clone)]
pub struct HuggingFaceHub {
    http_client: HttpClient,
    endpoint: String,
    token: Option<String>,
    cache_dir: PathBuf,
}

impl HuggingFaceHub {
    pub fn new(endpoint: String, token: Option<String>, cache_dir: PathBuf) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            cache_dir,
        }
    }

    fn file_url(&self, repo_id: &str, filename: &str) -> String {
        format!(
            "{}/datasets/{}/resolve/{}/{}",
            self.endpoint, repo_id, REVISION, filename
        )
    }

    /// `someone/reviews` + `data/train.parquet` → `<cache>/someone--reviews/data/train.parquet`
    fn cache_path(&self, repo_id: &str, filename: &str) -> PathBuf {
        self.cache_dir
            .join(repo_id.replace('/', "--"))
            .join(filename)
    }

    async fn download(&self, url: &str, target: &Path) -> AppResult<()> {
        let mut request = self.http_client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Hugging Face hub returned status {}: {}",
                status, body
            )));
        }

        let bytes = response.bytes().await?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write beside the target and rename, so a crash never leaves a
        // truncated file that later loads would treat as cached.
        let partial = target.with_extension("partial");
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, target).await?;

        tracing::info!(
            url = %url,
            bytes = bytes.len(),
            path = %target.display(),
            "Dataset file downloaded"
        );

        Ok(())
    }
}

#[async_trait::async_trait]
impl DatasetFetcher for HuggingFaceHub {
    async fn fetch(&self, repo_id: &str, filename: &str) -> AppResult<PathBuf> {
        let target = self.cache_path(repo_id, filename);

        if tokio::fs::try_exists(&target).await? {
            tracing::info!(path = %target.display(), "Using cached dataset file");
            return Ok(target);
        }

        let url = self.file_url(repo_id, filename);
        self.download(&url, &target).await?;

        Ok(target)
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}

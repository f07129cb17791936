use std::{fs::File, path::Path, sync::Arc, time::Duration};

use parquet::errors::ParquetError;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Field, Row};
use tokio::sync::OnceCell;

use crate::{
    error::{AppError, AppResult},
    models::{ReviewRecord, ReviewTable, SAMPLE_SEED},
    services::providers::DatasetFetcher,
};

/// Columns every review file must carry
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "business_name",
    "address",
    "city",
    "user_id",
    "mood",
    "review",
    "review_stars",
];

/// How often and how patiently the loader retries
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Downloads, decodes and caps the review dataset
pub struct DatasetLoader {
    fetcher: Arc<dyn DatasetFetcher>,
    repo_id: String,
    filename: String,
    max_rows: usize,
    retry: RetryPolicy,
}

impl DatasetLoader {
    pub fn new(
        fetcher: Arc<dyn DatasetFetcher>,
        repo_id: String,
        filename: String,
        max_rows: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            fetcher,
            repo_id,
            filename,
            max_rows,
            retry,
        }
    }

    /// Loads the dataset, retrying any failure with a fixed delay.
    ///
    /// Returns `AppError::DatasetUnavailable` once every attempt has failed.
    pub async fn load(&self) -> AppResult<ReviewTable> {
        let attempts = self.retry.attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            tracing::info!(
                attempt = attempt,
                attempts = attempts,
                repo_id = %self.repo_id,
                filename = %self.filename,
                provider = self.fetcher.name(),
                "Dataset download attempt"
            );

            match self.try_load().await {
                Ok(table) => {
                    tracing::info!(rows = table.len(), "Dataset loaded");
                    return Ok(table);
                }
                Err(e) => {
                    tracing::warn!(attempt = attempt, error = %e, "Dataset load attempt failed");
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }

        tracing::error!(attempts = attempts, "All attempts failed to load dataset");

        Err(AppError::DatasetUnavailable(format!(
            "{}/{} failed after {} attempts: {}",
            self.repo_id, self.filename, attempts, last_error
        )))
    }

    async fn try_load(&self) -> AppResult<ReviewTable> {
        let path = self.fetcher.fetch(&self.repo_id, &self.filename).await?;

        let table = tokio::task::spawn_blocking(move || read_reviews(&path))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(table.sample(self.max_rows, SAMPLE_SEED))
    }
}

/// Process-wide holder of the review table.
///
/// The first caller of [`DatasetStore::get`] runs the load; concurrent callers
/// wait for that same load instead of starting their own. A failed load leaves
/// the store empty, so the next call tries again.
pub struct DatasetStore {
    loader: Option<DatasetLoader>,
    table: OnceCell<Arc<ReviewTable>>,
}

impl DatasetStore {
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader: Some(loader),
            table: OnceCell::new(),
        }
    }

    /// A store that already holds `table` and never downloads
    pub fn preloaded(table: ReviewTable) -> Self {
        Self {
            loader: None,
            table: OnceCell::new_with(Some(Arc::new(table))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.table.initialized()
    }

    pub async fn get(&self) -> AppResult<Arc<ReviewTable>> {
        let table = self
            .table
            .get_or_try_init(|| async {
                let loader = self.loader.as_ref().ok_or_else(|| {
                    AppError::DatasetUnavailable("no dataset source configured".to_string())
                })?;
                loader.load().await.map(Arc::new)
            })
            .await?;

        Ok(Arc::clone(table))
    }
}

/// Reads review records from a parquet file.
///
/// Columns are matched by name and extra columns are ignored. A null review
/// body becomes an empty string; rows with nulls anywhere else are dropped.
pub fn read_reviews(path: &Path) -> AppResult<ReviewTable> {
    let file = File::open(path)?;
    let reader = SerializedFileReader::new(file)?;

    let present: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect();

    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|required| !present.iter().any(|name| name.as_str() == **required))
    {
        return Err(AppError::Dataset(ParquetError::General(format!(
            "column '{}' not found in {}",
            missing,
            path.display()
        ))));
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for row in reader.get_row_iter(None)? {
        match decode_row(&row?) {
            Some(record) => rows.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped = skipped, "Skipped review rows with missing values");
    }

    Ok(ReviewTable::new(rows))
}

fn decode_row(row: &Row) -> Option<ReviewRecord> {
    let mut business_name = None;
    let mut address = None;
    let mut city = None;
    let mut user_id = None;
    let mut mood = None;
    let mut review = None;
    let mut review_stars = None;

    for (name, field) in row.get_column_iter() {
        match name.as_str() {
            "business_name" => business_name = field_string(field),
            "address" => address = field_string(field),
            "city" => city = field_string(field),
            "user_id" => user_id = field_string(field),
            "mood" => mood = field_string(field),
            "review" => review = field_string(field),
            "review_stars" => review_stars = field_number(field),
            _ => {}
        }
    }

    Some(ReviewRecord {
        business_name: business_name?,
        address: address?,
        city: city?,
        user_id: user_id?,
        mood: mood?,
        review: review.unwrap_or_default(),
        review_stars: review_stars?,
    })
}

fn field_string(field: &Field) -> Option<String> {
    match field {
        Field::Str(s) => Some(s.clone()),
        Field::Bytes(bytes) => bytes.as_utf8().ok().map(str::to_string),
        Field::Int(i) => Some(i.to_string()),
        Field::Long(i) => Some(i.to_string()),
        _ => None,
    }
}

fn field_number(field: &Field) -> Option<f64> {
    match field {
        Field::Double(f) => Some(*f),
        Field::Float(f) => Some(f64::from(*f)),
        Field::Byte(i) => Some(f64::from(*i)),
        Field::Short(i) => Some(f64::from(*i)),
        Field::Int(i) => Some(f64::from(*i)),
        Field::Long(i) => Some(*i as f64),
        Field::UByte(i) => Some(f64::from(*i)),
        Field::UShort(i) => Some(f64::from(*i)),
        Field::UInt(i) => Some(f64::from(*i)),
        Field::ULong(i) => Some(*i as f64),
        Field::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seed used when capping the dataset, so every load keeps the same rows
pub const SAMPLE_SEED: u64 = 42;

/// A single customer review, tagged with the mood it was written in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub business_name: String,
    pub address: String,
    pub city: String,
    pub user_id: String,
    pub mood: String,
    pub review: String,
    pub review_stars: f64,
}

/// In-memory review dataset, read-only once loaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewTable {
    rows: Vec<ReviewRecord>,
}

impl ReviewTable {
    pub fn new(rows: Vec<ReviewRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ReviewRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps exactly `max_rows` rows chosen without replacement.
    ///
    /// The selection depends only on `seed` and the row count, so sampling the
    /// same source twice yields the same rows in the same order. Tables at or
    /// under the cap are returned untouched.
    pub fn sample(self, max_rows: usize, seed: u64) -> Self {
        if self.rows.len() <= max_rows {
            return self;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let picked = index::sample(&mut rng, self.rows.len(), max_rows);

        let mut slots: Vec<Option<ReviewRecord>> = self.rows.into_iter().map(Some).collect();
        let rows = picked
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();

        Self { rows }
    }
}

pub mod dataset;
pub mod details;
pub mod providers;
pub mod recommender;
pub mod translator;

pub use dataset::{DatasetLoader, DatasetStore, RetryPolicy};
pub use details::DetailGenerator;
pub use translator::Translator;

use thiserror::Error;

use crate::models::Document;

pub mod cache;
#[cfg(test)]
pub mod memory;

pub use cache::RedisJsonStore;

/// Cache errors. Never escape the store: they are reported and turned into
/// a no-op write or an empty read.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A key-value store holding JSON documents
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Store `document` under `key`. Failures are reported, not returned.
    async fn set(&mut self, key: &str, document: &Document);

    /// Load the document under `key`, or an empty one on a miss or failure
    async fn get(&mut self, key: &str) -> Document;
}

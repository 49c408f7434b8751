//! In-process [`DocumentStore`] for tests

use std::collections::HashMap;

use super::DocumentStore;
use crate::models::{empty_document, Document};

#[derive(Default)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
    /// When set, writes are dropped as if the backend were down
    pub fail_writes: bool,
    pub sets: usize,
    pub gets: usize,
}

impl DocumentStore for MemoryStore {
    async fn set(&mut self, key: &str, document: &Document) {
        self.sets += 1;
        if self.fail_writes {
            return;
        }
        // Stored serialized, like the real backend
        if let Ok(payload) = serde_json::to_string(document) {
            self.documents.insert(key.to_string(), payload);
        }
    }

    async fn get(&mut self, key: &str) -> Document {
        self.gets += 1;
        self.documents
            .get(key)
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_else(empty_document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_round_trip_is_structurally_equal() {
        let mut store = MemoryStore::default();
        let document = json!({
            "prices": [[1700000000000i64, 37000.5], [1700000300000i64, 37010.25]],
            "total_volumes": [[1700000000000i64, 1.5e10]]
        })
        .as_object()
        .cloned()
        .unwrap();

        store.set("bitcoin_data", &document).await;

        assert_eq!(store.get("bitcoin_data").await, document);
        assert!(store.get("other").await.is_empty());
    }
}

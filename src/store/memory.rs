//! In-process document store for tests and local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DatabaseError;
use crate::store::traits::DocumentStore;

/// `DocumentStore` backed by a `HashMap` behind an async `RwLock`.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<(String, String), serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all collections.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }

    async fn put(
        &self,
        collection: &str,
        id: &str,
        document: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        let mut documents = self.documents.write().await;
        documents.insert((collection.to_string(), id.to_string()), document.clone());
        Ok(())
    }
}

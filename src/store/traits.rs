//! `DocumentStore` trait — async interface for keyed JSON documents.

use async_trait::async_trait;

use crate::error::DatabaseError;

/// Backend-agnostic document store: one JSON document per `(collection, id)`.
///
/// `put` replaces the whole document and is all-or-nothing; concurrent writers
/// to the same key get last-writer-wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` if it does not exist.
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError>;

    /// Create or replace a document.
    async fn put(
        &self,
        collection: &str,
        id: &str,
        document: &serde_json::Value,
    ) -> Result<(), DatabaseError>;
}

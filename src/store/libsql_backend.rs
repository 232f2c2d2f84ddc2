//! libSQL backend — async `DocumentStore` implementation.
//!
//! Documents live in a single `documents` table keyed by `(collection, id)`
//! with the JSON body stored as text. Supports local file and in-memory
//! databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::DocumentStore;

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(backend.conn()).await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(backend.conn()).await?;
        Ok(backend)
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl DocumentStore for LibSqlBackend {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_document: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let body: String = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("get_document: {e}")))?;
                let value: serde_json::Value = serde_json::from_str(&body)
                    .map_err(|e| DatabaseError::Serialization(e.to_string()))?;
                debug!(collection, id, "Document loaded");
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_document: {e}"))),
        }
    }

    async fn put(
        &self,
        collection: &str,
        id: &str,
        document: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let body = serde_json::to_string(document)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO documents (collection, id, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT (collection, id) DO UPDATE SET body = ?3, updated_at = ?4",
            params![collection, id, body, now],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("put_document: {e}")))?;

        debug!(collection, id, "Document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    #[tokio::test]
    async fn document_crud() {
        let db = test_db().await;
        let doc = json!({"firstName": "Ada", "isTeamMember": -1});

        db.put("registrations", "u1", &doc).await.unwrap();
        let fetched = db.get("registrations", "u1").await.unwrap().unwrap();
        assert_eq!(fetched, doc);

        // Upsert replaces the body
        let updated = json!({"firstName": "Ada", "payment_status": "captured"});
        db.put("registrations", "u1", &updated).await.unwrap();
        let fetched = db.get("registrations", "u1").await.unwrap().unwrap();
        assert_eq!(fetched["payment_status"], "captured");
        assert!(fetched.get("isTeamMember").is_none());
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let db = test_db().await;
        assert!(db.get("registrations", "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn collection_isolation() {
        let db = test_db().await;
        db.put("registrations", "u1", &json!("a")).await.unwrap();
        db.put("teams", "u1", &json!("b")).await.unwrap();

        assert_eq!(db.get("registrations", "u1").await.unwrap().unwrap(), "a");
        assert_eq!(db.get("teams", "u1").await.unwrap().unwrap(), "b");
    }

    #[tokio::test]
    async fn corrupt_body_is_serialization_error() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO documents (collection, id, body) VALUES ('registrations', 'u1', '{not json')",
                (),
            )
            .await
            .unwrap();

        let err = db.get("registrations", "u1").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Serialization(_)));
    }

    #[tokio::test]
    async fn local_file_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("registrations.db");

        {
            let db = LibSqlBackend::new_local(&path).await.unwrap();
            db.put("registrations", "u1", &json!({"email": "ada@example.com"}))
                .await
                .unwrap();
        }
        assert!(path.exists());

        let db = LibSqlBackend::new_local(&path).await.unwrap();
        let doc = db.get("registrations", "u1").await.unwrap().unwrap();
        assert_eq!(doc["email"], "ada@example.com");
    }
}

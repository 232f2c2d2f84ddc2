//! Error types for the registration service.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Document store errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the registration session flow.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The store could not be reached or rejected the operation.
    #[error("Registration store unavailable: {0}")]
    StoreUnavailable(#[source] DatabaseError),

    /// The stored document could not be decoded into a record.
    #[error("Malformed registration record for user {user_id}: {reason}")]
    MalformedRecord { user_id: String, reason: String },

    /// The record could not be encoded for the store.
    #[error("Invalid registration record: {0}")]
    InvalidRecord(String),
}

impl RegistrationError {
    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

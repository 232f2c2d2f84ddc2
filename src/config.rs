//! Configuration types.

use std::path::PathBuf;

/// Default collection holding one registration document per user.
pub const DEFAULT_COLLECTION: &str = "registrations";

/// Service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// libSQL database file.
    pub db_path: PathBuf,
    /// HTTP listen port.
    pub port: u16,
    /// Document collection for registration records.
    pub collection: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/event-register.db"),
            port: 8080,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl AppConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let db_path = lookup("REGISTRATION_DB_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let port: u16 = lookup("REGISTRATION_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        let collection = lookup("REGISTRATION_COLLECTION")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.collection);

        Self {
            db_path,
            port,
            collection,
        }
    }
}

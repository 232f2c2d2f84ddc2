use std::sync::Arc;

use event_register::config::AppConfig;
use event_register::error::Result;
use event_register::registration::{
    RegistrationRouteState, RegistrationSessionController, registration_routes,
};
use event_register::store::{DocumentStore, LibSqlBackend};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env();

    eprintln!("Event Register v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!("   Collection: {}", config.collection);
    eprintln!("   API: http://0.0.0.0:{}/api/registration", config.port);

    // ── Store ────────────────────────────────────────────────────────────
    let store: Arc<dyn DocumentStore> = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);

    // ── Registration flow ───────────────────────────────────────────────
    let controller = Arc::new(RegistrationSessionController::new(
        store,
        config.collection.clone(),
    ));
    let app = registration_routes(RegistrationRouteState { controller });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Registration server started");
    axum::serve(listener, app).await?;

    Ok(())
}

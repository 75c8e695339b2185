pub mod router;
pub mod server;
pub mod tracing;

use std::sync::Arc;

use crate::config;
use crate::error::ReceiverError;
use crate::otlp::IngestState;
use crate::store::LogStore;

/// Application entry point. Initializes tracing, configuration, and runs the
/// transport server until a stop signal arrives.
pub async fn run() -> Result<(), ReceiverError> {
    tracing::init_tracing();

    let settings =
        config::get_configuration().map_err(|e| ReceiverError::Config(e.to_string()))?;
    ::tracing::info!("Loaded settings");

    let store = Arc::new(match settings.retained_log_cap {
        Some(cap) => LogStore::with_retention_cap(cap),
        None => LogStore::new(),
    });

    let app = router::build_router(IngestState { store });

    let mut server = server::TransportServer::bind(settings.otlp_http_port, app).await?;
    server.start();

    server::shutdown_signal().await;
    server.stop();
    server.await_shutdown().await?;

    ::tracing::info!("Server shutdown complete");
    Ok(())
}

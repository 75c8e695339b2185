//! Transport server lifecycle
//!
//! Binds the receiver's TCP listener and manages start, graceful stop and
//! block-until-shutdown. Shutdown is driven by a `CancellationToken`:
//! cancelling stops the accept loop while in-flight requests run to
//! completion.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::ReceiverError;

pub struct TransportServer {
    listener: Option<TcpListener>,
    app: Router,
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    serve_handle: Option<JoinHandle<Result<(), std::io::Error>>>,
}

impl TransportServer {
    /// Bind the listener on `port`. Fails if the port cannot be bound; the
    /// process must not proceed into serving state on failure.
    pub async fn bind(port: u16, app: Router) -> Result<Self, ReceiverError> {
        let bind_addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| ReceiverError::Bind {
                address: bind_addr.clone(),
                source: e,
            })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener: Some(listener),
            app,
            local_addr,
            shutdown: CancellationToken::new(),
            serve_handle: None,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Begin accepting connections on the bound listener.
    pub fn start(&mut self) {
        let Some(listener) = self.listener.take() else {
            warn!("start() called on a server that is already running");
            return;
        };

        let app = self.app.clone();
        let shutdown = self.shutdown.clone();
        self.serve_handle = Some(tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
        }));

        info!("Log export receiver listening on {}", self.local_addr);
        info!("  - POST   /v1/logs   (OTLP logs export)");
        info!("  - GET    /v1/logs   (snapshot)");
        info!("  - DELETE /v1/logs   (clear)");
        info!("  - GET    /v1/stats  (counters)");
        info!("  - GET    /v1/health (health check)");
    }

    /// Initiate graceful shutdown: stop accepting new connections and let
    /// in-flight requests finish. Safe to call before `start`.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Block until the serve task has fully stopped. Returns immediately if
    /// the server was never started.
    pub async fn await_shutdown(&mut self) -> Result<(), ReceiverError> {
        if let Some(handle) = self.serve_handle.take() {
            handle
                .await
                .map_err(|e| ReceiverError::Server(std::io::Error::other(e)))??;
        }
        Ok(())
    }
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) for graceful shutdown.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

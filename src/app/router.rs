use axum::Router;
use axum::routing::{get, post};

use crate::handler::admin::{clear_handler, snapshot_handler, stats_handler};
use crate::handler::health::health_handler;
use crate::otlp::{IngestState, export_logs};

/// Build the receiver HTTP router (export endpoint + health + operator
/// surface).
pub fn build_router(state: IngestState) -> Router {
    let v1_health_router = Router::new().route("/v1/health", get(health_handler));

    let v1_logs_router = Router::new()
        .route(
            "/v1/logs",
            post(export_logs).get(snapshot_handler).delete(clear_handler),
        )
        .route("/v1/stats", get(stats_handler))
        .with_state(state);

    Router::new().merge(v1_health_router).merge(v1_logs_router)
}

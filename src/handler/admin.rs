//! Operator endpoints over the receiver state
//!
//! Read side of the receiver: counters, a point-in-time snapshot of the
//! retained buffer, and a clear operation that leaves the cumulative
//! counters untouched.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::LogEntry;
use crate::otlp::IngestState;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_log_count: u64,
    pub largest_sequence_number: i64,
    pub retained: usize,
}

/// Handler for GET /v1/stats
pub async fn stats_handler(State(state): State<IngestState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        total_log_count: state.store.total_log_count(),
        largest_sequence_number: state.store.largest_sequence_number(),
        retained: state.store.retained(),
    })
}

/// Handler for GET /v1/logs
pub async fn snapshot_handler(State(state): State<IngestState>) -> Json<Vec<LogEntry>> {
    Json(state.store.snapshot())
}

/// Handler for DELETE /v1/logs
pub async fn clear_handler(State(state): State<IngestState>) -> StatusCode {
    state.store.clear();
    info!("Cleared retained log buffer");
    StatusCode::NO_CONTENT
}

//! OTLP log-export receiver implementation
//!
//! Accepts POST /v1/logs (OTLP HTTP/protobuf), walks each request's
//! resource → scope → record hierarchy in input order and flattens the leaf
//! records into the shared [`LogStore`]. Content-level anomalies (unknown
//! fields, empty groups, missing sequence attributes) never fail the call;
//! only undecodable bytes do.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use opentelemetry_proto::tonic::collector::logs::v1::{
    ExportLogsServiceRequest, ExportLogsServiceResponse,
};
use prost::Message;
use tracing::{debug, error, info, instrument, warn};

use crate::otlp::{convert, unknown_fields};
use crate::store::LogStore;

/// Application state for the export and operator handlers
#[derive(Clone)]
pub struct IngestState {
    pub store: Arc<LogStore>,
}

/// OTLP HTTP log-export receiver
///
/// Accepts: application/x-protobuf
/// Returns: application/x-protobuf
#[instrument(skip(state, body), fields(body_size = body.len()))]
pub async fn export_logs(State(state): State<IngestState>, body: Bytes) -> impl IntoResponse {
    // Decode protobuf request; malformed bytes never touch the store
    let request = match ExportLogsServiceRequest::decode(body.clone()) {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to decode OTLP logs request");
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/x-protobuf")],
                Bytes::new(),
            );
        }
    };

    // Forward-compatibility diagnostics over the raw body
    for finding in unknown_fields::scan(body) {
        warn!(
            message_type = finding.message,
            tag = finding.tag,
            wire_type = ?finding.wire_type,
            "Unknown field in export request"
        );
    }

    ingest(&state.store, &request);

    // Return empty-bodied success response
    let response = ExportLogsServiceResponse::default();
    let mut buf = Vec::with_capacity(response.encoded_len());
    let _ = response.encode(&mut buf);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/x-protobuf")],
        Bytes::from(buf),
    )
}

/// Walk the request hierarchy in input order and record every leaf log
/// record. Empty groups are valid and contribute nothing.
pub fn ingest(store: &LogStore, request: &ExportLogsServiceRequest) {
    info!(count = request.resource_logs.len(), "Resource logs count");

    for resource_logs in &request.resource_logs {
        if let Some(resource) = &resource_logs.resource {
            debug!(attributes = ?resource.attributes, "Resource attributes");
        }
        info!(count = resource_logs.scope_logs.len(), "Scope logs count");

        for scope_logs in &resource_logs.scope_logs {
            debug!(scope = ?scope_logs.scope, "Instrumentation scope");
            info!(count = scope_logs.log_records.len(), "Log records count");

            for record in &scope_logs.log_records {
                let entry = convert::log_entry(record);
                let current = entry.sequence_number();
                let (total, max_seen) = store.record(entry);
                info!(total, current, max_seen, "Ingested log record");
            }
        }
    }
}

//! OpenTelemetry Protocol (OTLP) log-export receiver module
//!
//! This module provides:
//! - the export handler for POST /v1/logs (OTLP HTTP/protobuf)
//! - wire record to domain model conversion
//! - allowlist-based unknown-field diagnostics

pub mod convert;
pub mod receiver;
pub mod unknown_fields;

pub use receiver::{IngestState, export_logs, ingest};

use std::collections::HashSet;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use logsink::app::router::build_router;
use logsink::domain::LogEntry;
use logsink::handler::admin::StatsResponse;
use logsink::otlp::IngestState;
use logsink::store::LogStore;
use opentelemetry_proto::tonic::collector::logs::v1::ExportLogsServiceRequest;
use opentelemetry_proto::tonic::common::v1::{AnyValue, InstrumentationScope, KeyValue, any_value};
use opentelemetry_proto::tonic::logs::v1::{LogRecord, ResourceLogs, ScopeLogs};
use opentelemetry_proto::tonic::resource::v1::Resource;
use prost::Message;

fn create_test_server(store: Arc<LogStore>) -> TestServer {
    let app = build_router(IngestState { store });
    TestServer::new(app).expect("Failed to create test server")
}

fn string_value(s: &str) -> AnyValue {
    AnyValue {
        value: Some(any_value::Value::StringValue(s.to_string())),
    }
}

fn log_record(seq: i64, body: &str) -> LogRecord {
    LogRecord {
        time_unix_nano: 1_700_000_000_000_000_000 + seq as u64,
        observed_time_unix_nano: 1_700_000_000_000_000_000 + seq as u64,
        severity_number: 9,
        severity_text: "INFO".to_string(),
        body: Some(string_value(body)),
        attributes: vec![
            KeyValue {
                key: "AUDIT-USER".to_string(),
                value: Some(string_value("bob")),
            },
            KeyValue {
                key: "logNo#".to_string(),
                value: Some(AnyValue {
                    value: Some(any_value::Value::IntValue(seq)),
                }),
            },
        ],
        ..Default::default()
    }
}

fn export_request(log_records: Vec<LogRecord>) -> ExportLogsServiceRequest {
    ExportLogsServiceRequest {
        resource_logs: vec![ResourceLogs {
            resource: Some(Resource {
                attributes: vec![KeyValue {
                    key: "service.name".to_string(),
                    value: Some(string_value("dice-server")),
                }],
                ..Default::default()
            }),
            scope_logs: vec![ScopeLogs {
                scope: Some(InstrumentationScope {
                    name: "AUDIT_JAVA_SERVICE".to_string(),
                    version: "1.0.0".to_string(),
                    ..Default::default()
                }),
                log_records,
                ..Default::default()
            }],
            ..Default::default()
        }],
    }
}

async fn post_export(server: &TestServer, body: Vec<u8>) -> axum_test::TestResponse {
    server
        .post("/v1/logs")
        .content_type("application/x-protobuf")
        .bytes(body.into())
        .await
}

#[tokio::test]
async fn test_single_request_counts_order_and_high_water_mark() {
    let store = Arc::new(LogStore::new());
    let server = create_test_server(store.clone());

    let request = export_request(vec![
        log_record(5, "first"),
        log_record(1, "second"),
        log_record(9, "third"),
    ]);
    let response = post_export(&server, request.encode_to_vec()).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(store.total_log_count(), 3);
    assert_eq!(store.largest_sequence_number(), 9);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 3);
    let seqs: Vec<i64> = snapshot.iter().map(LogEntry::sequence_number).collect();
    assert_eq!(seqs, vec![5, 1, 9]);
}

#[tokio::test]
async fn test_concurrent_exports_lose_no_records() {
    let store = Arc::new(LogStore::new());
    let server = create_test_server(store.clone());

    let batch_a = export_request((0..100).map(|i| log_record(i, &format!("a-{i}"))).collect());
    let batch_b = export_request(
        (100..200)
            .map(|i| log_record(i, &format!("b-{i}")))
            .collect(),
    );

    let (response_a, response_b) = tokio::join!(
        post_export(&server, batch_a.encode_to_vec()),
        post_export(&server, batch_b.encode_to_vec()),
    );

    response_a.assert_status(StatusCode::OK);
    response_b.assert_status(StatusCode::OK);

    assert_eq!(store.total_log_count(), 200);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 200);

    let bodies: HashSet<String> = snapshot
        .iter()
        .filter_map(|entry| entry.body_string().map(str::to_string))
        .collect();
    assert_eq!(bodies.len(), 200, "records were lost or duplicated");
    assert_eq!(store.largest_sequence_number(), 199);
}

#[tokio::test]
async fn test_empty_resource_logs_list_is_accepted() {
    let store = Arc::new(LogStore::new());
    let server = create_test_server(store.clone());

    let response = post_export(&server, ExportLogsServiceRequest::default().encode_to_vec()).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(store.total_log_count(), 0);
}

#[tokio::test]
async fn test_malformed_bytes_return_decode_error_and_touch_nothing() {
    let store = Arc::new(LogStore::new());
    let server = create_test_server(store.clone());

    let response = post_export(&server, vec![0xFF, 0xFF, 0xFF, 0xFF]).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(store.total_log_count(), 0);
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_unknown_field_request_is_accepted_and_ingested() {
    let store = Arc::new(LogStore::new());
    let server = create_test_server(store.clone());

    let mut body = export_request(vec![log_record(3, "x"), log_record(8, "y")]).encode_to_vec();
    // Append a top-level field outside the known schema: tag 13, varint 7
    body.extend_from_slice(&[0x68, 0x07]);

    let response = post_export(&server, body).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(store.total_log_count(), 2);
    assert_eq!(store.largest_sequence_number(), 8);
}

#[tokio::test]
async fn test_records_without_sequence_attribute_default_to_zero() {
    let store = Arc::new(LogStore::new());
    let server = create_test_server(store.clone());

    let record = LogRecord {
        severity_number: 9,
        severity_text: "INFO".to_string(),
        body: Some(string_value("no sequence")),
        ..Default::default()
    };
    let response = post_export(&server, export_request(vec![record]).encode_to_vec()).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(store.total_log_count(), 1);
    assert_eq!(store.largest_sequence_number(), 0);
}

#[tokio::test]
async fn test_multiple_groups_flatten_in_input_order() {
    let store = Arc::new(LogStore::new());
    let server = create_test_server(store.clone());

    let request = ExportLogsServiceRequest {
        resource_logs: vec![
            ResourceLogs {
                scope_logs: vec![
                    ScopeLogs {
                        log_records: vec![log_record(1, "r1-s1")],
                        ..Default::default()
                    },
                    ScopeLogs {
                        log_records: vec![log_record(2, "r1-s2")],
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
            ResourceLogs {
                scope_logs: vec![ScopeLogs {
                    log_records: vec![log_record(3, "r2-s1")],
                    ..Default::default()
                }],
                ..Default::default()
            },
        ],
    };
    let response = post_export(&server, request.encode_to_vec()).await;

    response.assert_status(StatusCode::OK);
    let seqs: Vec<i64> = store
        .snapshot()
        .iter()
        .map(LogEntry::sequence_number)
        .collect();
    assert_eq!(seqs, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_clear_empties_buffer_but_keeps_counters() {
    let store = Arc::new(LogStore::new());
    let server = create_test_server(store.clone());

    let request = export_request(vec![
        log_record(5, "first"),
        log_record(1, "second"),
        log_record(9, "third"),
    ]);
    post_export(&server, request.encode_to_vec())
        .await
        .assert_status(StatusCode::OK);

    let response = server.delete("/v1/logs").await;
    response.assert_status(StatusCode::NO_CONTENT);

    let snapshot: Vec<LogEntry> = server.get("/v1/logs").await.json();
    assert!(snapshot.is_empty());

    let stats: StatsResponse = server.get("/v1/stats").await.json();
    assert_eq!(stats.total_log_count, 3);
    assert_eq!(stats.largest_sequence_number, 9);
    assert_eq!(stats.retained, 0);
}

#[tokio::test]
async fn test_stats_and_snapshot_endpoints() {
    let store = Arc::new(LogStore::new());
    let server = create_test_server(store.clone());

    let request = export_request(vec![log_record(4, "roll"), log_record(2, "filler")]);
    post_export(&server, request.encode_to_vec())
        .await
        .assert_status(StatusCode::OK);

    let stats: StatsResponse = server.get("/v1/stats").await.json();
    assert_eq!(stats.total_log_count, 2);
    assert_eq!(stats.largest_sequence_number, 4);
    assert_eq!(stats.retained, 2);

    let snapshot: serde_json::Value = server.get("/v1/logs").await.json();
    let entries = snapshot.as_array().expect("snapshot is a JSON array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["body"]["String"], "roll");
    assert_eq!(entries[0]["severity_text"], "INFO");
    assert_eq!(entries[0]["attributes"][1]["key"], "logNo#");
    assert_eq!(entries[0]["attributes"][1]["value"]["Int"], 4);
}

#[tokio::test]
async fn test_health_endpoint_returns_healthy() {
    let store = Arc::new(LogStore::new());
    let server = create_test_server(store);

    let response = server.get("/v1/health").await;
    response.assert_status_ok();
    response.assert_text("Healthy");
}

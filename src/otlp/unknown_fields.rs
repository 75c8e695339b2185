//! Allowlist-based unknown-field detection
//!
//! Producers running a newer protocol revision may send fields this receiver
//! does not know. Decoding drops them silently, so the raw request body is
//! walked against a per-message field allowlist before ingestion, descending
//! request → resource group → resource → scope group → scope → log record.
//! Findings are diagnostics only and never reject a request.

use bytes::{Buf, Bytes};
use prost::DecodeError;
use prost::encoding::{DecodeContext, WireType, decode_key, decode_varint, skip_field};
use tracing::warn;

/// One unrecognized field, identified by the enclosing message type and tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnknownField {
    pub message: &'static str,
    pub tag: u32,
    pub wire_type: WireType,
}

struct FieldSchema {
    tag: u32,
    child: Option<&'static MessageSchema>,
}

struct MessageSchema {
    name: &'static str,
    fields: &'static [FieldSchema],
}

impl MessageSchema {
    fn field(&self, tag: u32) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.tag == tag)
    }
}

const fn scalar(tag: u32) -> FieldSchema {
    FieldSchema { tag, child: None }
}

const fn nested(tag: u32, child: &'static MessageSchema) -> FieldSchema {
    FieldSchema {
        tag,
        child: Some(child),
    }
}

static EXPORT_LOGS_REQUEST: MessageSchema = MessageSchema {
    name: "ExportLogsServiceRequest",
    fields: &[nested(1, &RESOURCE_LOGS)],
};

static RESOURCE_LOGS: MessageSchema = MessageSchema {
    name: "ResourceLogs",
    fields: &[
        nested(1, &RESOURCE),
        nested(2, &SCOPE_LOGS),
        scalar(3), // schema_url
    ],
};

static RESOURCE: MessageSchema = MessageSchema {
    name: "Resource",
    fields: &[
        scalar(1), // attributes
        scalar(2), // dropped_attributes_count
        scalar(3), // entity_refs
    ],
};

static SCOPE_LOGS: MessageSchema = MessageSchema {
    name: "ScopeLogs",
    fields: &[
        nested(1, &INSTRUMENTATION_SCOPE),
        nested(2, &LOG_RECORD),
        scalar(3), // schema_url
    ],
};

static INSTRUMENTATION_SCOPE: MessageSchema = MessageSchema {
    name: "InstrumentationScope",
    fields: &[
        scalar(1), // name
        scalar(2), // version
        scalar(3), // attributes
        scalar(4), // dropped_attributes_count
    ],
};

// Tag 4 was retired from LogRecord and is deliberately not listed.
static LOG_RECORD: MessageSchema = MessageSchema {
    name: "LogRecord",
    fields: &[
        scalar(1),  // time_unix_nano
        scalar(2),  // severity_number
        scalar(3),  // severity_text
        scalar(5),  // body
        scalar(6),  // attributes
        scalar(7),  // dropped_attributes_count
        scalar(8),  // flags
        scalar(9),  // trace_id
        scalar(10), // span_id
        scalar(11), // observed_time_unix_nano
        scalar(12), // event_name
    ],
};

/// Walks an encoded `ExportLogsServiceRequest` and reports every field
/// outside the known schema.
///
/// Best effort: a scan failure part-way through (truncated or garbled wire
/// data) is logged and the findings collected so far are returned, so this
/// path can never abort ingestion.
pub fn scan(body: Bytes) -> Vec<UnknownField> {
    let mut findings = Vec::new();
    let mut buf = body;
    if let Err(e) = scan_message(&mut buf, &EXPORT_LOGS_REQUEST, &mut findings) {
        warn!(error = %e, "Unknown-field scan failed, continuing with partial diagnostics");
    }
    findings
}

fn scan_message(
    buf: &mut Bytes,
    schema: &MessageSchema,
    findings: &mut Vec<UnknownField>,
) -> Result<(), DecodeError> {
    while buf.has_remaining() {
        let (tag, wire_type) = decode_key(buf)?;
        match schema.field(tag) {
            None => {
                findings.push(UnknownField {
                    message: schema.name,
                    tag,
                    wire_type,
                });
                skip_field(wire_type, tag, buf, DecodeContext::default())?;
            }
            Some(FieldSchema {
                child: Some(child), ..
            }) if wire_type == WireType::LengthDelimited => {
                let len = decode_varint(buf)? as usize;
                if len > buf.remaining() {
                    return Err(DecodeError::new("length delimiter exceeds buffer"));
                }
                let mut sub = buf.copy_to_bytes(len);
                scan_message(&mut sub, child, findings)?;
            }
            Some(_) => skip_field(wire_type, tag, buf, DecodeContext::default())?,
        }
    }
    Ok(())
}

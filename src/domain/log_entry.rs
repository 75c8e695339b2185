//! Flattened log record model
//!
//! One `LogEntry` per leaf record of an export request. The resource and
//! scope groupings of the wire format are traversal structure only and are
//! not retained.

use serde::{Deserialize, Serialize};

/// Attribute key carrying the producer-assigned sequence number.
pub const SEQUENCE_ATTRIBUTE_KEY: &str = "logNo#";

/// A single key/value pair. Keys are not guaranteed unique within a record;
/// lookups take the first match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: Option<AttributeValue>,
}

/// Mirror of the OTLP `AnyValue` variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    String(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    Bytes(#[serde(with = "hex")] Vec<u8>),
    Array(Vec<AttributeValue>),
    KvList(Vec<Attribute>),
}

/// One leaf unit of telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when the event occurred (nanoseconds since Unix epoch,
    /// producer-supplied, not validated against wall clock)
    pub timestamp: u64,

    /// Timestamp when the event was observed (nanoseconds since Unix epoch)
    pub observed_timestamp: u64,

    /// Severity number (1-24, see OTel spec)
    pub severity_number: i32,

    /// Severity text (e.g., "INFO", "ERROR")
    pub severity_text: String,

    /// Log body; only the string variant is interpreted, other variants
    /// pass through opaquely
    pub body: Option<AttributeValue>,

    /// Record attributes, in wire order
    pub attributes: Vec<Attribute>,
}

impl LogEntry {
    /// Sequence number assigned by the producer via the `"logNo#"` attribute.
    ///
    /// Returns 0 when the attribute is absent or its value is not
    /// integer-typed. The expected producer always sends an integer, so a
    /// mistyped value falls back to 0 rather than erroring.
    pub fn sequence_number(&self) -> i64 {
        match self
            .attributes
            .iter()
            .find(|attr| attr.key == SEQUENCE_ATTRIBUTE_KEY)
        {
            Some(Attribute {
                value: Some(AttributeValue::Int(n)),
                ..
            }) => *n,
            _ => 0,
        }
    }

    /// The body as a string, when the body is the string variant.
    pub fn body_string(&self) -> Option<&str> {
        match &self.body {
            Some(AttributeValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

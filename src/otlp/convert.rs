//! Converter from OpenTelemetry protocol records to the internal log model

use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};
use opentelemetry_proto::tonic::logs::v1::LogRecord;

use crate::domain::{Attribute, AttributeValue, LogEntry};

/// Flatten one wire log record into a [`LogEntry`]. Attribute order is
/// preserved; body variants other than strings pass through opaquely.
pub fn log_entry(record: &LogRecord) -> LogEntry {
    LogEntry {
        timestamp: record.time_unix_nano,
        observed_timestamp: record.observed_time_unix_nano,
        severity_number: record.severity_number,
        severity_text: record.severity_text.clone(),
        body: record.body.as_ref().and_then(attribute_value),
        attributes: record.attributes.iter().map(attribute).collect(),
    }
}

fn attribute(kv: &KeyValue) -> Attribute {
    Attribute {
        key: kv.key.clone(),
        value: kv.value.as_ref().and_then(attribute_value),
    }
}

fn attribute_value(value: &AnyValue) -> Option<AttributeValue> {
    match &value.value {
        Some(any_value::Value::StringValue(s)) => Some(AttributeValue::String(s.clone())),
        Some(any_value::Value::IntValue(i)) => Some(AttributeValue::Int(*i)),
        Some(any_value::Value::DoubleValue(d)) => Some(AttributeValue::Double(*d)),
        Some(any_value::Value::BoolValue(b)) => Some(AttributeValue::Bool(*b)),
        Some(any_value::Value::BytesValue(b)) => Some(AttributeValue::Bytes(b.clone())),
        Some(any_value::Value::ArrayValue(arr)) => Some(AttributeValue::Array(
            arr.values.iter().filter_map(attribute_value).collect(),
        )),
        Some(any_value::Value::KvlistValue(kv)) => {
            Some(AttributeValue::KvList(kv.values.iter().map(attribute).collect()))
        }
        None => None,
    }
}

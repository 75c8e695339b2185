pub mod log_entry;

pub use log_entry::{Attribute, AttributeValue, LogEntry, SEQUENCE_ATTRIBUTE_KEY};

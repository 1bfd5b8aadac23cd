use crate::level::Level;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One emitted log event: severity, message and an ordered field set.
///
/// A `Record` is immutable once constructed and owned by the call stack
/// that produced it; destinations receive the encoded bytes and never
/// retain a reference past the write call.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Caller metadata, already resolved by whoever built the record.
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Record {
    /// Build a record stamped with the current time and no caller info.
    pub fn new(
        level: Level,
        message: impl Into<String>,
        fields: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            fields,
            file: None,
            line: None,
        }
    }

    /// Attach caller metadata to the record.
    pub fn with_caller(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }
}

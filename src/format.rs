use crate::record::Record;
use serde_json::{Map, Value};
use std::time::Duration;

/// Output encoding selected at logger construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-oriented single line: bracketed timestamp and level,
    /// message, then fields inline as `key=value`.
    #[default]
    Text,
    /// One JSON object per record with stable key names.
    Json,
}

/// Stable JSON key names.
pub const MESSAGE_KEY: &str = "msg";
pub const LEVEL_KEY: &str = "level";
pub const TIME_KEY: &str = "ts";
pub const CALLER_KEY: &str = "file";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Encode one record as a newline-terminated byte sequence.
///
/// Exactly one record per call; line-oriented destinations rely on the
/// trailing newline.
pub fn encode(record: &Record, mode: OutputMode) -> Vec<u8> {
    match mode {
        OutputMode::Text => encode_text(record),
        OutputMode::Json => encode_json(record),
    }
}

/// Render a `Duration` as a millisecond integer field value.
pub fn duration_ms(d: Duration) -> Value {
    Value::from(d.as_millis() as u64)
}

fn caller(record: &Record) -> Option<String> {
    let file = record.file.as_deref()?;
    Some(match record.line {
        Some(line) => format!("{file}:{line}"),
        None => file.to_string(),
    })
}

fn encode_text(record: &Record) -> Vec<u8> {
    let mut line = format!(
        "[{}] [{}]",
        record.timestamp.format(TIME_FORMAT),
        record.level
    );
    if let Some(caller) = caller(record) {
        line.push(' ');
        line.push_str(&caller);
    }
    line.push(' ');
    line.push_str(&record.message);
    for (key, value) in &record.fields {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        match value {
            Value::String(s) => line.push_str(s),
            other => line.push_str(&other.to_string()),
        }
    }
    line.push('\n');
    line.into_bytes()
}

fn encode_json(record: &Record) -> Vec<u8> {
    let mut object = Map::new();
    for (key, value) in &record.fields {
        object.insert(key.clone(), value.clone());
    }
    // Reserved keys win over a colliding user field.
    object.insert(
        TIME_KEY.to_string(),
        Value::String(record.timestamp.format(TIME_FORMAT).to_string()),
    );
    object.insert(
        LEVEL_KEY.to_string(),
        Value::String(record.level.to_string()),
    );
    if let Some(caller) = caller(record) {
        object.insert(CALLER_KEY.to_string(), Value::String(caller));
    }
    object.insert(
        MESSAGE_KEY.to_string(),
        Value::String(record.message.clone()),
    );

    let mut bytes = serde_json::to_vec(&Value::Object(object))
        .unwrap_or_else(|_| b"{}".to_vec());
    bytes.push(b'\n');
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn sample() -> Record {
        let mut fields = BTreeMap::new();
        fields.insert("user".to_string(), Value::String("alice".to_string()));
        fields.insert("attempt".to_string(), Value::from(3));
        Record {
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
            level: Level::Warn,
            message: "login failed".to_string(),
            fields,
            file: Some("src/auth.rs".to_string()),
            line: Some(42),
        }
    }

    #[test]
    fn text_line_is_bracketed_and_newline_terminated() {
        let line = String::from_utf8(encode(&sample(), OutputMode::Text)).unwrap();
        assert_eq!(
            line,
            "[2024-05-06 07:08:09.000] [WARN] src/auth.rs:42 login failed attempt=3 user=alice\n"
        );
    }

    #[test]
    fn json_object_has_stable_keys() {
        let bytes = encode(&sample(), OutputMode::Json);
        assert_eq!(*bytes.last().unwrap(), b'\n');
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value[MESSAGE_KEY], "login failed");
        assert_eq!(value[LEVEL_KEY], "WARN");
        assert_eq!(value[TIME_KEY], "2024-05-06 07:08:09.000");
        assert_eq!(value[CALLER_KEY], "src/auth.rs:42");
        assert_eq!(value["user"], "alice");
        assert_eq!(value["attempt"], 3);
    }

    #[test]
    fn reserved_keys_win_over_user_fields() {
        let mut record = sample();
        record
            .fields
            .insert(MESSAGE_KEY.to_string(), Value::String("spoof".to_string()));
        let value: Value =
            serde_json::from_slice(&encode(&record, OutputMode::Json)).unwrap();
        assert_eq!(value[MESSAGE_KEY], "login failed");
    }

    #[test]
    fn durations_become_millisecond_integers() {
        assert_eq!(duration_ms(Duration::from_millis(1500)), Value::from(1500u64));
    }
}

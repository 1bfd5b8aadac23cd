use crate::level::Level;
use crate::logger::Logger;
use crate::record::Record;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that forwards events into a [`Logger`].
///
/// Events are turned into [`Record`]s with caller metadata taken from
/// the event's own metadata, then routed synchronously; the write chain
/// completes before the event macro returns. `TRACE` folds into
/// `Debug`, the remaining levels map one to one.
pub struct TierLayer {
    logger: Arc<Logger>,
}

impl TierLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

fn map_level(level: tracing::Level) -> Level {
    if level == tracing::Level::ERROR {
        Level::Error
    } else if level == tracing::Level::WARN {
        Level::Warn
    } else if level == tracing::Level::INFO {
        Level::Info
    } else {
        Level::Debug
    }
}

impl<S> Layer<S> for TierLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let meta = event.metadata();
        let record = Record {
            timestamp: Utc::now(),
            level: map_level(*meta.level()),
            message: message.unwrap_or_default(),
            fields,
            file: meta.file().map(|s| s.to_string()),
            line: meta.line(),
        };
        self.logger.emit_record(record);
    }
}

/// Collects event fields into JSON values, splitting out the implicit
/// `message` field.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, serde_json::Value>,
    pub message: &'a mut Option<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(format!("{:?}", value)),
            );
        }
    }
}

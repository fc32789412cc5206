//! JSONL tracing layer.
//!
//! One JSON object per event on the configured writer (stderr in the CLI).
//! `run_id` and `stage` are lifted to the top level, taken from the event
//! itself or else from the nearest enclosing span that recorded them.
//! Fields that could carry findings content or report prose are withheld.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

pub(crate) const WITHHELD: &str = "[withheld]";

const CONTEXT_KEYS: [&str; 2] = ["run_id", "stage"];

fn is_findings_content(name: &str) -> bool {
    matches!(name, "value" | "text" | "report" | "report_text")
}

/// Collects event or span fields as JSON values.
#[derive(Default)]
struct FieldMap {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl FieldMap {
    fn put(&mut self, field: &Field, value: Value) {
        let name = field.name();
        if name == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else if is_findings_content(name) {
            self.fields.insert(name.to_string(), Value::from(WITHHELD));
        } else {
            self.fields.insert(name.to_string(), value);
        }
    }
}

impl Visit for FieldMap {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::from(format!("{value:?}")));
    }
}

/// `run_id` / `stage` recorded on a span, stored in its extensions.
#[derive(Debug, Clone, Default)]
struct SpanTags(Map<String, Value>);

#[derive(Serialize)]
struct JsonlRecord<'a> {
    ts: String,
    level: String,
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    fields: Map<String, Value>,
}

/// Tracing layer writing JSON lines.
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> JsonlLayer<W> {
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut recorded = FieldMap::default();
        attrs.record(&mut recorded);
        let tags: Map<String, Value> = recorded
            .fields
            .into_iter()
            .filter(|(k, _)| CONTEXT_KEYS.contains(&k.as_str()))
            .collect();

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanTags(tags));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut recorded = FieldMap::default();
        event.record(&mut recorded);

        let mut run_id = recorded.fields.remove("run_id");
        let mut stage = recorded.fields.remove("stage");

        // Innermost span first
        for span in ctx.event_scope(event).into_iter().flatten() {
            if let Some(SpanTags(tags)) = span.extensions().get::<SpanTags>() {
                run_id = run_id.or_else(|| tags.get("run_id").cloned());
                stage = stage.or_else(|| tags.get("stage").cloned());
            }
        }

        let metadata = event.metadata();
        let record = JsonlRecord {
            ts: Utc::now().to_rfc3339(),
            level: metadata.level().as_str().to_ascii_lowercase(),
            event: metadata.target(),
            run_id,
            stage,
            message: recorded.message,
            fields: recorded.fields,
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> Value {
        let buf = SharedBuf::default();
        let subscriber = tracing_subscriber::registry().with(JsonlLayer::new(buf.clone()));
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buf.0.lock().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        serde_json::from_str(text.trim()).expect("one JSON line")
    }

    #[test]
    fn test_basic_record() {
        let parsed = capture(|| {
            tracing::info!(target: "run.started", "started");
        });
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["event"], "run.started");
        assert_eq!(parsed["message"], "started");
        assert!(parsed["ts"].is_string());
        assert!(parsed.get("fields").is_none());
    }

    #[test]
    fn test_event_context_lifted() {
        let parsed = capture(|| {
            tracing::warn!(
                target: "compose.branch_incomplete",
                run_id = "run-abc",
                stage = "compose",
                field_count = 3u64,
                "subtype missing"
            );
        });
        assert_eq!(parsed["run_id"], "run-abc");
        assert_eq!(parsed["stage"], "compose");
        assert_eq!(parsed["fields"]["field_count"], 3);
        assert!(parsed["fields"].get("run_id").is_none());
    }

    #[test]
    fn test_span_context_fills_gaps() {
        let parsed = capture(|| {
            let span = tracing::info_span!("run", run_id = "run-span", stage = "load");
            let _guard = span.enter();
            tracing::info!(target: "load.findings_loaded", stage = "classify", "loaded");
        });
        assert_eq!(parsed["run_id"], "run-span");
        assert_eq!(parsed["stage"], "classify");
    }

    #[test]
    fn test_findings_content_withheld() {
        let parsed = capture(|| {
            tracing::debug!(
                target: "load.field_assigned",
                field = "hans-cd10",
                value = "positive",
                "assigned"
            );
        });
        assert_eq!(parsed["fields"]["field"], "hans-cd10");
        assert_eq!(parsed["fields"]["value"], WITHHELD);
    }
}

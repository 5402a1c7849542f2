//! File span exporter writing one OTLP JSON document per line.
//!
//! Each exported batch becomes a complete `resourceSpans` document, so the
//! file can be fed line by line to any OTLP-aware viewer.

use super::rotating::RotatingWriter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, SpanKind, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Value as JsonValue};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Instrumentation scope name written into every document.
pub const SCOPE_NAME: &str = "Zsplash";

struct FileSpanExporter {
    writer: RotatingWriter,
    resource: Resource,
    is_shutdown: AtomicBool,
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(TraceError::from("exporter is shut down"))));
        }

        let line = format_batch(&self.resource, &batch).to_string();
        let result = self
            .writer
            .write_line(&line)
            .map_err(|e| TraceError::from(e.to_string()));
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource.clone();
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("is_shutdown", &self.is_shutdown)
            .finish_non_exhaustive()
    }
}

/// Builds a tracer provider that exports every span, unbatched, to
/// `file_path`.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter {
        writer: RotatingWriter::new(file_path),
        resource: resource.clone(),
        is_shutdown: AtomicBool::new(false),
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

/// Formats `batch` as one OTLP JSON document.
///
/// ```json
/// {
///   "resourceSpans": [{
///     "resource": {"attributes": [{"key": "service.name", "value": {"stringValue": "Zsplash"}}]},
///     "scopeSpans": [{"scope": {"name": "Zsplash"}, "spans": [...]}]
///   }]
/// }
/// ```
fn format_batch(resource: &Resource, batch: &[SpanData]) -> JsonValue {
    let resource_attrs: Vec<JsonValue> = resource
        .iter()
        .map(|(key, value)| json!({ "key": key.to_string(), "value": format_value(value) }))
        .collect();

    json!({
        "resourceSpans": [{
            "resource": { "attributes": resource_attrs },
            "scopeSpans": [{
                "scope": { "name": SCOPE_NAME },
                "spans": batch.iter().map(format_span).collect::<Vec<_>>()
            }]
        }]
    })
}

fn format_span(span: &SpanData) -> JsonValue {
    let (status_code, status_message) = match &span.status {
        Status::Unset => (0, String::new()),
        Status::Ok => (1, String::new()),
        Status::Error { description } => (2, description.to_string()),
    };

    let events: Vec<JsonValue> = span
        .events
        .iter()
        .map(|event| {
            json!({
                "timeUnixNano": unix_nanos(event.timestamp),
                "name": event.name,
                "attributes": format_attributes(&event.attributes),
            })
        })
        .collect();

    json!({
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": if span.parent_span_id == SpanId::INVALID {
            String::new()
        } else {
            format!("{:016x}", span.parent_span_id)
        },
        "name": span.name,
        "kind": span_kind_code(&span.span_kind),
        "startTimeUnixNano": unix_nanos(span.start_time),
        "endTimeUnixNano": unix_nanos(span.end_time),
        "attributes": format_attributes(&span.attributes),
        "events": events,
        "status": { "code": status_code, "message": status_message },
    })
}

const fn span_kind_code(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

fn format_attributes(attributes: &[KeyValue]) -> Vec<JsonValue> {
    attributes
        .iter()
        .map(|kv| json!({ "key": kv.key.to_string(), "value": format_value(&kv.value) }))
        .collect()
}

/// OTLP `AnyValue`; integers are strings per the OTLP JSON mapping.
fn format_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!({ "boolValue": b }),
        Value::I64(i) => json!({ "intValue": i.to_string() }),
        Value::F64(f) => json!({ "doubleValue": f }),
        Value::String(s) => json!({ "stringValue": s.to_string() }),
        Value::Array(_) => json!({ "stringValue": format!("{value:?}") }),
    }
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_use_otlp_json_mapping() {
        assert_eq!(format_value(&Value::I64(42)), json!({ "intValue": "42" }));
        assert_eq!(format_value(&Value::Bool(true)), json!({ "boolValue": true }));
        assert_eq!(format_value(&Value::from("cats")), json!({ "stringValue": "cats" }));
    }

    #[test]
    fn empty_batch_still_carries_resource() {
        let resource = Resource::new(vec![KeyValue::new("service.name", "Zsplash")]);
        let doc = format_batch(&resource, &[]);

        let scope = &doc["resourceSpans"][0]["scopeSpans"][0];
        assert_eq!(scope["scope"]["name"], "Zsplash");
        assert_eq!(scope["spans"], json!([]));
        assert_eq!(
            doc["resourceSpans"][0]["resource"]["attributes"][0]["value"]["stringValue"],
            "Zsplash"
        );
    }
}

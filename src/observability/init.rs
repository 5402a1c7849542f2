//! Tracing initialization and subscriber setup.

use super::exporter::{self, SCOPE_NAME};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the trace file inside the plugin data directory.
pub const TRACE_FILE: &str = "zsplash-otlp.json";

/// Initializes the tracing subscriber with file-based OTLP export.
///
/// The filter is `config.trace_level`, defaulting to `"info"`. Traces go to
/// `~/.local/share/zellij/zsplash/zsplash-otlp.json` (the sandbox sees it
/// under `/host`).
///
/// Tracing is optional: if the data directory cannot be created the plugin
/// runs without it. Only the first call per thread's process takes effect.
///
/// # Example
///
/// ```rust
/// use zsplash::observability::init_tracing;
/// use zsplash::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.clone().unwrap_or_else(|| "info".to_string());

    let data_dir = crate::infrastructure::paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SCOPE_NAME)]);
    let provider = exporter::create_tracer_provider(data_dir.join(TRACE_FILE), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SCOPE_NAME));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer)
        .try_init();
}

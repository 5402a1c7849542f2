//! OpenTelemetry-based observability with file-based trace export.
//!
//! A Zellij plugin has no stdout for logs and no network collector to talk
//! to, so spans are written as OTLP JSON lines to a rotating file in the
//! plugin data directory.
//!
//! ```text
//! tracing → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → RotatingWriter
//! ```
//!
//! - Traces land in `~/.local/share/zellij/zsplash/zsplash-otlp.json`
//! - The file rotates at 10MB into `.1`, `.2`, `.3` backups
//! - The level comes from the `trace_level` plugin option, default `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`exporter`]: Span exporter and OTLP JSON formatting
//! - [`rotating`]: Size-rotated file writer

mod exporter;
mod init;
mod rotating;

pub use init::{init_tracing, TRACE_FILE};

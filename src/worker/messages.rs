//! Worker thread message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the main
//! plugin thread and the background worker that owns the session file, and
//! carries tracing context across that boundary.

use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the active span.
    ///
    /// Returns `None` if the current span context is invalid, which is the
    /// case whenever tracing has not been initialized.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use zsplash::worker::TraceContext;
    ///
    /// if let Some(ctx) = TraceContext::from_current() {
    ///     println!("Trace ID: {}", ctx.trace_id);
    /// }
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("no valid span context to propagate");
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates `WorkerMessage` constructors that attach the current trace
/// context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_session(LoadSession {}),
    save_session(SaveSession { cookie: String }),
    clear_session(ClearSession {}),
}

/// Messages sent from the main thread to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the stored session cookie, sent once permissions are granted.
    LoadSession {
        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Replace the stored session cookie.
    SaveSession {
        /// `Cookie` header value to persist.
        cookie: String,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Forget the stored session (logout, or the backend expired every cookie).
    ClearSession {
        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadSession { trace_context }
            | Self::SaveSession { trace_context, .. }
            | Self::ClearSession { trace_context } => trace_context.as_ref(),
        }
    }

    /// Short name for spans; the cookie never reaches the trace.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LoadSession { .. } => "load_session",
            Self::SaveSession { .. } => "save_session",
            Self::ClearSession { .. } => "clear_session",
        }
    }
}

/// Responses sent from the worker thread back to the main thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The stored session, `None` when nothing is stored.
    SessionLoaded { cookie: Option<String> },

    SessionSaved,

    SessionCleared,

    /// An error occurred during the worker operation.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_without_tracing_carry_no_context() {
        let message = WorkerMessage::save_session("sid=abc".to_string());
        assert_eq!(message.trace_context(), None);
        assert_eq!(message.name(), "save_session");
    }

    #[test]
    fn messages_cross_the_thread_boundary_as_json() {
        let message = WorkerMessage::save_session("sid=abc".to_string());
        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("trace_context"));
        assert_eq!(serde_json::from_str::<WorkerMessage>(&json).unwrap(), message);

        let response = WorkerResponse::SessionLoaded { cookie: None };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(serde_json::from_str::<WorkerResponse>(&json).unwrap(), response);
    }
}

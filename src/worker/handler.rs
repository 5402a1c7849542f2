//! Worker thread implementation for session file operations.
//!
//! Runs on a thread spawned by Zellij so disk I/O never blocks rendering.
//! Spans created here are linked to the main-thread span that posted the
//! message.

use crate::domain::error::{Result, ZsplashError};
use crate::infrastructure::paths;
use crate::storage::{JsonStorage, Storage};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

/// Name of the session file under the plugin data directory.
pub const SESSION_FILE: &str = "session.json";

/// Worker thread state. The storage backend is opened on the first message.
#[derive(Serialize, Deserialize, Default)]
pub struct ZsplashWorker {
    #[serde(skip)]
    storage: Option<Box<dyn Storage>>,
}

impl ZsplashWorker {
    /// Opens the session file in the plugin data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let path = paths::get_data_dir().join(SESSION_FILE);
        Ok(Self::with_storage(Box::new(JsonStorage::new(path)?)))
    }

    /// Creates a worker over an already opened backend.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Self { storage: Some(storage) }
    }

    fn get_storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        self.storage
            .as_mut()
            .ok_or_else(|| ZsplashError::Worker("Storage not initialized".to_string()))
    }

    /// Maps a storage result to a response, logging the outcome.
    fn handle_storage_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Reconstructs the sender's OpenTelemetry context so worker spans join
    /// its trace. The guard must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the response for the plugin.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", message_type = message.name()).entered();

        match message {
            WorkerMessage::LoadSession { .. } => Self::handle_storage_result(
                "load session",
                self.get_storage().and_then(|storage| storage.load_session()),
                |record| WorkerResponse::SessionLoaded {
                    cookie: record.map(|record| record.cookie),
                },
            ),
            WorkerMessage::SaveSession { cookie, .. } => Self::handle_storage_result(
                "save session",
                self.get_storage().and_then(|storage| storage.save_session(&cookie)),
                |()| WorkerResponse::SessionSaved,
            ),
            WorkerMessage::ClearSession { .. } => Self::handle_storage_result(
                "clear session",
                self.get_storage().and_then(|storage| storage.clear_session()),
                |()| WorkerResponse::SessionCleared,
            ),
        }
    }
}

/// Sets up the same tracing pipeline as the main thread, writing to the
/// same file.
fn init_worker_tracing() {
    use crate::observability;
    use crate::Config;

    observability::init_tracing(&Config::default());
}

static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

fn reply(name: String, response: &WorkerResponse) {
    match serde_json::to_string(response) {
        Ok(payload) => post_message_to_plugin(PluginMessage {
            name,
            payload,
            worker_name: None,
        }),
        Err(e) => tracing::warn!(error = %e, "failed to serialize worker response"),
    }
}

impl ZellijWorker<'_> for ZsplashWorker {
    /// Handles a message posted by the plugin and posts the response back
    /// under the same message name.
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            init_worker_tracing();
        }

        if self.storage.is_none() {
            match Self::new() {
                Ok(worker) => self.storage = worker.storage,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to initialize storage");
                    reply(
                        message,
                        &WorkerResponse::Error {
                            message: format!("Failed to initialize storage: {e}"),
                        },
                    );
                    return;
                }
            }
        }

        let worker_message: WorkerMessage = match serde_json::from_str(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        let response = self.handle_message(worker_message);
        reply(message, &response);
    }
}

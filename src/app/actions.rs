//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler returns a `Vec<Action>` after each event; the shim in
//! `main.rs` executes them in order. Nothing in the library performs I/O
//! itself, which keeps `handle_event` testable without a Zellij host.
//!
//! # Example
//!
//! ```rust
//! use zsplash::app::Action;
//! use zsplash::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::load_session()),
//!     Action::OpenUrl("https://example.com/api/auth/github".to_string()),
//! ];
//! ```

use crate::api::HttpRequest;
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    ///
    /// Sent when the user explicitly requests to exit the plugin (e.g., pressing 'q').
    CloseFocus,

    /// Posts a message to the background worker thread.
    ///
    /// Used for session file reads and writes so disk I/O never blocks
    /// rendering.
    PostToWorker(WorkerMessage),

    /// Hands a prepared backend request to the host's `web_request`.
    ///
    /// The result comes back as a `WebRequestResult` event carrying the
    /// request's correlation context.
    WebRequest(HttpRequest),

    /// Opens a URL with the configured browser command.
    ///
    /// Used for the OAuth provider pages and for viewing an image.
    OpenUrl(String),
}

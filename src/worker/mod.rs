//! Background worker thread for session file operations.
//!
//! The plugin posts [`WorkerMessage`]s through Zellij's worker API and
//! receives [`WorkerResponse`]s as custom messages, with tracing context
//! carried across the thread boundary.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::ZsplashWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};

//! Storage layer for the persisted backend session.
//!
//! A terminal plugin has no browser cookie store, so the session cookies the
//! backend issues are kept in a small JSON file under the plugin data
//! directory and restored at startup.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `models`: Storage record types

pub mod backend;
pub mod json;
pub mod models;

pub use backend::Storage;
pub use json::JsonStorage;
pub use models::SessionRecord;

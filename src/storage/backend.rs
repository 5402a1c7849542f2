//! Storage backend abstraction.
//!
//! The trait covers exactly what the worker needs: reading the stored
//! session at startup, replacing it whenever the backend rotates cookies,
//! and dropping it on logout.

use crate::domain::error::Result;
use crate::storage::models::SessionRecord;

/// Abstraction over persistent storage backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use zsplash::storage::{JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/session.json"))?;
/// storage.save_session("sid=abc")?;
/// assert!(storage.load_session()?.is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Returns the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn load_session(&self) -> Result<Option<SessionRecord>>;

    /// Replaces the stored session with `cookie`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn save_session(&mut self, cookie: &str) -> Result<()>;

    /// Removes the stored session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn clear_session(&mut self) -> Result<()>;
}

//! Storage record models for the persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted backend session: the `Cookie` header value last sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Cookie header value, e.g. `connect.sid=s%3A...; token=...`.
    pub cookie: String,

    /// When the record was written.
    pub saved_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Creates a record stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use zsplash::storage::SessionRecord;
    ///
    /// let record = SessionRecord::new("sid=abc");
    /// assert_eq!(record.cookie, "sid=abc");
    /// ```
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            saved_at: Utc::now(),
        }
    }
}

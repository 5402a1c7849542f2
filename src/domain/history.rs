//! Per-user search history and global top searches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One past search of the signed-in user, as returned by `GET /history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HistoryRecord")]
pub struct HistoryEntry {
    /// `id` or Mongo's `_id`, empty when neither is sent.
    pub id: String,
    pub term: String,
    /// `None` when the backend sent no parseable RFC 3339 time.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Wire shape of [`HistoryEntry`].
#[derive(Deserialize)]
struct HistoryRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    term: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    timestamp: Option<DateTime<Utc>>,
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(record: HistoryRecord) -> Self {
        Self {
            id: record.id.or(record.mongo_id).unwrap_or_default(),
            term: record.term,
            timestamp: record.timestamp,
        }
    }
}

impl HistoryEntry {
    /// Formats the entry age relative to `now`.
    ///
    /// Under a minute reads `Just now`, then `Xm ago`, `Xh ago` and `Xd ago`
    /// up to a week. Older entries show the short month and day (`Mar 4`).
    /// Timestamps in the future count as `Just now`; an unknown time is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use zsplash::domain::HistoryEntry;
    ///
    /// let now = Utc::now();
    /// let entry = HistoryEntry {
    ///     id: "h1".into(),
    ///     term: "cats".into(),
    ///     timestamp: Some(now - Duration::minutes(5)),
    /// };
    /// assert_eq!(entry.relative_time(now), "5m ago");
    /// ```
    #[must_use]
    pub fn relative_time(&self, now: DateTime<Utc>) -> String {
        let Some(timestamp) = self.timestamp else {
            return String::new();
        };
        let elapsed = now.signed_duration_since(timestamp);
        let minutes = elapsed.num_minutes();
        let hours = elapsed.num_hours();
        let days = elapsed.num_days();

        if minutes < 1 {
            "Just now".to_string()
        } else if minutes < 60 {
            format!("{minutes}m ago")
        } else if hours < 24 {
            format!("{hours}h ago")
        } else if days < 7 {
            format!("{days}d ago")
        } else {
            timestamp.format("%b %-d").to_string()
        }
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|at| at.with_timezone(&Utc)))
}

/// A search term ranked across all users by `GET /top-searches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSearch {
    pub term: String,
    #[serde(default)]
    pub count: u64,
}

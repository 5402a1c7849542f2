//! JSON file-based storage backend.
//!
//! Uses atomic file writes (write-to-temp + rename) so a crash mid-write
//! never leaves a corrupt session file behind.

use crate::domain::error::{Result, ZsplashError};
use crate::storage::backend::Storage;
use crate::storage::models::SessionRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const STORAGE_VERSION: u32 = 1;

/// JSON storage container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    session: Option<SessionRecord>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            session: None,
        }
    }
}

/// JSON file storage backend.
///
/// The whole file is held in memory and rewritten on every change.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It's designed to be used from a single
/// worker thread, matching the Zellij plugin architecture.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "session": {
///     "cookie": "connect.sid=s%3Aabc",
///     "saved_at": "2024-03-20T12:00:00Z"
///   }
/// }
/// ```
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on creation.
    data: StorageData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(has_session = data.session.is_some(), "storage initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| ZsplashError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version != STORAGE_VERSION {
            tracing::warn!(version = data.version, "unknown storage version, reading anyway");
        }
        Ok(data)
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or renamed.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| ZsplashError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn load_session(&self) -> Result<Option<SessionRecord>> {
        let _span = tracing::debug_span!("json_load_session").entered();
        Ok(self.data.session.clone())
    }

    fn save_session(&mut self, cookie: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_save_session", cookie_len = cookie.len()).entered();

        if self.data.session.as_ref().is_some_and(|s| s.cookie == cookie) {
            tracing::trace!("session unchanged");
            return Ok(());
        }

        self.data.session = Some(SessionRecord::new(cookie));
        self.dirty = true;
        self.save_to_file()
    }

    fn clear_session(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("json_clear_session").entered();

        if self.data.session.take().is_some() {
            self.dirty = true;
        }
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> JsonStorage {
        JsonStorage::new(dir.path().join("nested").join("session.json")).unwrap()
    }

    #[test]
    fn empty_store_has_no_session() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        assert_eq!(storage.load_session().unwrap(), None);
        assert!(!dir.path().join("nested").join("session.json").exists());
    }

    #[test]
    fn saved_session_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut storage = storage_in(&dir);
            storage.save_session("sid=abc; token=xyz").unwrap();
        }

        let storage = storage_in(&dir);
        let record = storage.load_session().unwrap().unwrap();
        assert_eq!(record.cookie, "sid=abc; token=xyz");
        assert!(!dir.path().join("nested").join("session.tmp").exists());
    }

    #[test]
    fn clear_removes_session_on_disk() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_in(&dir);
        storage.save_session("sid=abc").unwrap();
        storage.clear_session().unwrap();
        storage.clear_session().unwrap();
        drop(storage);

        assert_eq!(storage_in(&dir).load_session().unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(JsonStorage::new(path), Err(ZsplashError::Storage(_))));
    }
}

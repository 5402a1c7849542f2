//! Size-rotated trace file.
//!
//! When the file passes the size limit it is shifted to `<name>.1`, older
//! backups move up by one, and anything past the last backup is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default size limit before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of numbered backups kept next to the live file.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe append-only writer with numbered backups.
///
/// The file is opened lazily on the first write, so constructing a writer
/// for an unwritable location succeeds and only the writes fail.
pub struct RotatingWriter {
    file_path: PathBuf,
    max_bytes: u64,
    file: Mutex<Option<File>>,
}

impl RotatingWriter {
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limit(file_path, MAX_FILE_SIZE_BYTES)
    }

    pub const fn with_limit(file_path: PathBuf, max_bytes: u64) -> Self {
        Self {
            file_path,
            max_bytes,
            file: Mutex::new(None),
        }
    }

    /// Appends `line` and a newline, rotating first if the file is full.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or a poisoned lock.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        if fs::metadata(&self.file_path).is_ok_and(|metadata| metadata.len() > self.max_bytes) {
            *file = None;
            self.rotate()?;
        }

        if file.is_none() {
            *file = Some(OpenOptions::new().create(true).append(true).open(&self.file_path)?);
        }
        let handle = file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "trace file not open"))?;

        writeln!(handle, "{line}")?;
        handle.flush()
    }

    fn rotate(&self) -> io::Result<()> {
        let oldest = backup_path(&self.file_path, MAX_BACKUP_FILES);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for index in (1..MAX_BACKUP_FILES).rev() {
            let from = backup_path(&self.file_path, index);
            if from.exists() {
                fs::rename(&from, backup_path(&self.file_path, index + 1))?;
            }
        }

        if self.file_path.exists() {
            fs::rename(&self.file_path, backup_path(&self.file_path, 1))?;
        }
        Ok(())
    }
}

/// `<file>.<index>`, e.g. `zsplash-otlp.json.2`.
fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

impl std::fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rotates_into_numbered_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.json");
        let writer = RotatingWriter::with_limit(path.clone(), 4);

        for line in ["first", "second", "third", "fourth", "fifth", "sixth"] {
            writer.write_line(line).unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "sixth\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap(), "fifth\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 3)).unwrap(), "third\n");
        assert!(!backup_path(&path, 4).exists());
    }

    #[test]
    fn small_files_are_appended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.json");
        let writer = RotatingWriter::new(path.clone());

        writer.write_line("a").unwrap();
        writer.write_line("b").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }
}

//! Task file storage.
//!
//! The task file is read whole, edited in memory and written back whole.
//! Every operation is a fresh `load → mutate → store` cycle; nothing is
//! cached between calls, so the file is the only source of truth. There is
//! no locking: if two processes edit the file at once, the last writer wins.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{HourglassError, Result, StorageError};
use crate::types::{parse_duration, TaskDocument, TaskRecord};

/// Handle to the task file at a resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a store for the task file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the task file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a fresh, empty task file.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::AlreadyExists` if a file is already present
    /// (it is left untouched), or `HourglassError::Storage` on I/O failure.
    pub async fn initialize(&self) -> Result<()> {
        let contents = encode(&self.path, &TaskDocument::new())?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    HourglassError::AlreadyExists(self.path.clone())
                }
                _ => StorageError::new(&self.path, e).into(),
            })?;

        file.write_all(contents.as_bytes())
            .await
            .map_err(|e| StorageError::new(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::new(&self.path, e))?;

        debug!(path = %self.path.display(), "task file created");
        Ok(())
    }

    /// Reads and parses the whole task file.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::Storage` if the file cannot be read, or
    /// `HourglassError::CorruptDocument` if it is not a task document.
    pub async fn load(&self) -> Result<TaskDocument> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::new(&self.path, e))?;

        let document = serde_json::from_str(&data).map_err(|source| {
            HourglassError::CorruptDocument {
                path: self.path.clone(),
                source,
            }
        })?;

        debug!(path = %self.path.display(), "task file loaded");
        Ok(document)
    }

    /// Replaces the task file with `document`.
    ///
    /// The document is written to a temporary file in the same directory and
    /// renamed over the task file, so the file on disk is always either the
    /// old document or the new one.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::Storage` if the file cannot be written.
    pub async fn store(&self, document: &TaskDocument) -> Result<()> {
        let contents = encode(&self.path, document)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, &contents))
            .await
            .map_err(io::Error::other)
            .and_then(|written| written)
            .map_err(|e| StorageError::new(&self.path, e))?;

        debug!(
            path = %self.path.display(),
            tasks = document.tasks.len(),
            "task file stored"
        );
        Ok(())
    }

    /// Sets the target duration of `name` from a time string.
    ///
    /// Any tracked average on the task is discarded.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::InvalidInput` for a malformed time string
    /// (before the file is touched), or a storage error.
    pub async fn set_target(&self, name: &str, duration: &str) -> Result<TaskRecord> {
        let millis = parse_duration(duration)?;

        let mut document = self.load().await?;
        let record = document.set_target(name, millis).clone();
        self.store(&document).await?;

        Ok(record)
    }

    /// Removes `name` from the task file.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::TaskNotFound` if the task does not exist, in
    /// which case the file is not rewritten.
    pub async fn remove_task(&self, name: &str) -> Result<TaskRecord> {
        let mut document = self.load().await?;
        let removed = document.remove(name)?;
        self.store(&document).await?;

        Ok(removed)
    }

    /// Folds a tracked session of `elapsed_millis` into `name`'s average,
    /// creating the task if needed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read or written.
    pub async fn record_tracked_sample(&self, name: &str, elapsed_millis: u64) -> Result<TaskRecord> {
        let mut document = self.load().await?;
        let record = document.record_sample(name, elapsed_millis).clone();
        self.store(&document).await?;

        Ok(record)
    }

    /// Returns all tasks when `names` is empty, otherwise exactly the
    /// requested ones.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::TaskNotFound` for the first missing name.
    pub async fn list_tasks<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<BTreeMap<String, TaskRecord>> {
        self.load().await?.select(names)
    }
}

/// Writes `contents` beside `path` and renames it into place, keeping the
/// permissions of the file it replaces.
fn replace_file(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    if let Ok(metadata) = std::fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn encode(path: &Path, document: &TaskDocument) -> Result<String> {
    let mut contents =
        serde_json::to_string_pretty(document).map_err(|source| HourglassError::CorruptDocument {
            path: path.to_path_buf(),
            source,
        })?;
    contents.push('\n');
    Ok(contents)
}

// ============================================================================
// Tests
// ============================================================================

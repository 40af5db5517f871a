//! Error types for hourglass.
//!
//! Every failure a command can hit is one of the variants below; the binary
//! prints it as a single `hourglass: <message>` line.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::sound::SoundError;
use crate::types::ParseDurationError;

/// What went wrong while touching the task file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// The file does not exist.
    NotFound,
    /// The file exists but may not be read or written.
    PermissionDenied,
    /// The path names a directory.
    IsADirectory,
    /// The file already exists where a fresh one was requested.
    AlreadyExists,
    /// Any other I/O failure.
    Other,
}

impl StorageErrorKind {
    /// Classifies an I/O error.
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::IsADirectory => Self::IsADirectory,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            _ => Self::Other,
        }
    }
}

/// An I/O failure on the task file, tagged with its path.
#[derive(Debug, Error)]
#[error("{}", describe(.path, .kind, .source))]
pub struct StorageError {
    /// The file being read or written
    pub path: PathBuf,
    /// Classified cause
    pub kind: StorageErrorKind,
    /// Underlying I/O error
    #[source]
    pub source: io::Error,
}

impl StorageError {
    /// Wraps an I/O error for `path`.
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            kind: StorageErrorKind::from_io(&source),
            source,
        }
    }
}

fn describe(path: &Path, kind: &StorageErrorKind, source: &io::Error) -> String {
    let path = path.display();
    match kind {
        StorageErrorKind::NotFound => format!(
            "{path}: No such file: Run \"hourglass init\" to create a new task file."
        ),
        StorageErrorKind::AlreadyExists => format!("{path}: File already exists."),
        StorageErrorKind::IsADirectory => format!("{path} is a directory."),
        StorageErrorKind::PermissionDenied => format!("{path}: Permission denied."),
        StorageErrorKind::Other => format!("{path}: {source}"),
    }
}

/// Errors produced by hourglass operations.
#[derive(Debug, Error)]
pub enum HourglassError {
    /// A malformed time string.
    #[error(transparent)]
    InvalidInput(#[from] ParseDurationError),

    /// `init` found an existing task file.
    #[error("{}: File already exists.", .0.display())]
    AlreadyExists(PathBuf),

    /// The named task is not in the task file.
    #[error("Task '{0}' not found.")]
    TaskNotFound(String),

    /// A fixed timer was started for a task without a target duration.
    #[error("Task '{0}' has no target time: Run \"hourglass set {0} <time>\" first.")]
    MissingConfiguration(String),

    /// Reading or writing the task file failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The task file is not a valid task document.
    #[error("{}: Invalid task file: {source}", .path.display())]
    CorruptDocument {
        /// The task file
        path: PathBuf,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The alarm could not be played.
    #[error(transparent)]
    Playback(#[from] SoundError),
}

impl HourglassError {
    /// Returns true if this error came from the task file's storage.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::AlreadyExists(_))
    }

    /// Returns the storage cause, if this is a storage error.
    #[must_use]
    pub fn storage_kind(&self) -> Option<StorageErrorKind> {
        match self {
            Self::Storage(err) => Some(err.kind),
            Self::AlreadyExists(_) => Some(StorageErrorKind::AlreadyExists),
            _ => None,
        }
    }
}

/// Result type for hourglass operations.
pub type Result<T> = std::result::Result<T, HourglassError>;

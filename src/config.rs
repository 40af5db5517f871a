//! Runtime configuration.
//!
//! The task file and alarm sound locations are resolved once, from the
//! command line or environment, and handed to the components that need them.

use std::path::PathBuf;

/// Environment variable naming the task file.
pub const TASK_FILE_ENV: &str = "HOURGLASS_TASKS";

/// Environment variable naming the alarm sound file.
pub const SOUND_FILE_ENV: &str = "HOURGLASS_SOUND";

/// File name of the task file in the home directory.
pub const DEFAULT_TASK_FILE_NAME: &str = ".hourglass";

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Location of the task file
    pub task_file: PathBuf,
    /// Custom alarm sound, if any
    pub sound_file: Option<PathBuf>,
}

impl AppConfig {
    /// Builds a configuration, falling back to the default task file when no
    /// path was given.
    pub fn new(task_file: Option<PathBuf>, sound_file: Option<PathBuf>) -> Self {
        Self {
            task_file: task_file.unwrap_or_else(default_task_file),
            sound_file,
        }
    }
}

/// Returns `~/.hourglass`, or `./.hourglass` when no home directory exists.
pub fn default_task_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_TASK_FILE_NAME)
}

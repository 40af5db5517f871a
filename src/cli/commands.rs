//! Command definitions for the hourglass CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, SOUND_FILE_ENV, TASK_FILE_ENV};

// ============================================================================
// CLI Structure
// ============================================================================

/// hourglass - time your tasks and learn how long they take
#[derive(Parser, Debug)]
#[command(
    name = "hourglass",
    version,
    about = "Task timer with alarms and tracked averages",
    long_about = "Set a target time per task and run a timer that rings when it is up,\n\
                  or track how long a task really takes and keep a running estimate.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Task file location (default: ~/.hourglass)
    #[arg(long, global = true, env = TASK_FILE_ENV, value_name = "PATH")]
    pub task_file: Option<PathBuf>,

    /// Alarm sound file (default: built-in beep)
    #[arg(long, global = true, env = SOUND_FILE_ENV, value_name = "PATH")]
    pub sound: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Resolves the runtime configuration from the parsed arguments.
    pub fn config(&self) -> AppConfig {
        AppConfig::new(self.task_file.clone(), self.sound.clone())
    }
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create an empty task file
    Init,

    /// Set the target time of a task (e.g. 25m, 90s, 2h, 500ms)
    Set {
        /// Task name
        #[arg(value_parser = validate_task_name)]
        task: String,
        /// Target time: an integer followed by h, m, s or ms
        time: String,
    },

    /// Remove a task
    Remove {
        /// Task name
        task: String,
    },

    /// Show tasks (all when none are named)
    View {
        /// Task names
        tasks: Vec<String>,
    },

    /// Measure a task until Ctrl-C and update its average
    Track {
        /// Task name
        #[arg(value_parser = validate_task_name)]
        task: String,
    },

    /// Run the timer for a task, then ring until Ctrl-C
    Start {
        /// Task name
        task: String,
        /// Do not draw the progress bar
        #[arg(short, long)]
        silent: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the task name.
///
/// - Must not be empty
/// - Must not exceed 100 characters
fn validate_task_name(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("task name must not be empty".to_string());
    }
    if s.chars().count() > 100 {
        return Err("task name must be at most 100 characters".to_string());
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================

//! Display utilities for the hourglass CLI.
//!
//! This module provides formatted output for:
//! - Progress announcements while a timer or alarm runs
//! - Task listings
//! - Error messages

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::app::TrackReport;
use crate::types::{format_duration, format_duration_f64, TaskMode, TaskRecord};

/// Prefix of every diagnostic written to stderr.
pub const PROGRAM_NAME: &str = "hourglass";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows where the task file was created.
    pub fn show_task_file_created(path: &Path) {
        println!("Created .hourglass file at {}", path.display());
    }

    /// Shows the new target of a task.
    pub fn show_task_set(name: &str, record: &TaskRecord) {
        println!("{}", Self::format_task(name, record));
    }

    /// Shows that a task was removed.
    pub fn show_task_removed(name: &str) {
        println!("Removed task '{}'.", name);
    }

    /// Shows one line per task.
    pub fn show_tasks(tasks: &BTreeMap<String, TaskRecord>) {
        if tasks.is_empty() {
            println!("No tasks.");
            return;
        }
        for (name, record) in tasks {
            println!("{}", Self::format_task(name, record));
        }
    }

    pub fn show_timer_started() {
        println!("Timer started. Press CTRL-C to cancel.");
    }

    pub fn show_alarm_started() {
        println!("Alarm started. Press CTRL-C to stop alarm.");
    }

    /// Shows how long the alarm rang.
    pub fn show_alarm_stopped(elapsed: Duration) {
        println!("Alarm stopped after {}.", Self::format_elapsed(elapsed));
    }

    pub fn show_tracking_started(name: &str) {
        println!("Tracking '{}'. Press CTRL-C to stop.", name);
    }

    /// Shows the measured session and the updated estimate.
    pub fn show_tracked(name: &str, report: &TrackReport) {
        println!(
            "Tracked '{}' for {}. {}",
            name,
            format_duration(report.elapsed_millis),
            Self::format_task(name, &report.record)
        );
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("{}", Self::format_error(message));
    }

    /// Formats a task as `name: <time>`.
    ///
    /// Tracked tasks show their average with a leading `~` and the number of
    /// sessions it was built from.
    fn format_task(name: &str, record: &TaskRecord) -> String {
        match record.mode() {
            TaskMode::Target { millis } => format!("{}: {}", name, format_duration(millis)),
            TaskMode::Tracked { average, samples } => format!(
                "{}: ~{} ({} {})",
                name,
                format_duration_f64(average),
                samples,
                if samples == 1 { "sample" } else { "samples" }
            ),
            TaskMode::Unset => format!("{}: (not set)", name),
        }
    }

    fn format_elapsed(elapsed: Duration) -> String {
        format_duration(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }

    fn format_error(message: &str) -> String {
        format!("{}: {}", PROGRAM_NAME, message)
    }
}

// ============================================================================
// Tests
// ============================================================================

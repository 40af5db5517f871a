//! Core data types for hourglass.
//!
//! This module defines the data structures used for:
//! - Task records and their two timing modes
//! - The persisted task document
//! - Time string conversion (see [`duration`])

pub mod duration;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HourglassError, Result};

pub use duration::{format_duration, format_duration_f64, parse_duration, ParseDurationError};

// ============================================================================
// TaskMode
// ============================================================================

/// How a task's duration is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskMode {
    /// Neither a target nor any tracked sample yet.
    Unset,
    /// A target duration configured with `set`.
    Target {
        /// Target duration in milliseconds
        millis: u64,
    },
    /// An estimate measured with `track`.
    Tracked {
        /// Running average in milliseconds
        average: f64,
        /// Number of sessions folded into the average
        samples: u32,
    },
}

// ============================================================================
// TaskRecord
// ============================================================================

/// A single task entry in the task document.
///
/// A record carries either a target duration or a tracked average, never
/// both. The fields are only changed through [`TaskRecord::set_target`] and
/// [`TaskRecord::record_sample`], which clear the other mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_millis: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tracked_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sample_count: Option<u32>,
}

impl TaskRecord {
    /// Creates a record with a target duration.
    pub fn with_target(millis: u64) -> Self {
        let mut record = Self::default();
        record.set_target(millis);
        record
    }

    /// Returns the configured target in milliseconds, if any.
    pub fn target_millis(&self) -> Option<u64> {
        self.target_millis
    }

    /// Returns the tracked average in milliseconds, if any.
    pub fn tracked_average(&self) -> Option<f64> {
        self.tracked_average
    }

    /// Returns the number of tracked samples, if any.
    pub fn sample_count(&self) -> Option<u32> {
        self.sample_count
    }

    /// Returns the timing mode of this record.
    pub fn mode(&self) -> TaskMode {
        match (self.target_millis, self.tracked_average, self.sample_count) {
            (_, Some(average), Some(samples)) => TaskMode::Tracked { average, samples },
            (Some(millis), _, _) => TaskMode::Target { millis },
            _ => TaskMode::Unset,
        }
    }

    /// Sets the target duration, discarding any tracked state.
    pub fn set_target(&mut self, millis: u64) {
        self.tracked_average = None;
        self.sample_count = None;
        self.target_millis = Some(millis);
    }

    /// Folds one tracked session into the running average.
    ///
    /// Any target is discarded. The first sample starts the average at
    /// `elapsed_millis`. Later samples increment the count and then apply
    /// `average += elapsed / count`. This is not an arithmetic mean; stored
    /// averages depend on this exact update, so it is kept as is.
    pub fn record_sample(&mut self, elapsed_millis: u64) {
        let elapsed = elapsed_millis as f64;
        self.target_millis = None;

        match (self.tracked_average, self.sample_count) {
            (Some(average), Some(count)) => {
                let count = count.saturating_add(1);
                self.sample_count = Some(count);
                self.tracked_average = Some(average + elapsed / f64::from(count));
            }
            _ => {
                self.sample_count = Some(1);
                self.tracked_average = Some(elapsed);
            }
        }
    }
}

// ============================================================================
// TaskDocument
// ============================================================================

/// The persisted task file: `{ "tasks": { name: record } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    /// Task records keyed by name
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskRecord>,
}

impl TaskDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `name`.
    pub fn get(&self, name: &str) -> Option<&TaskRecord> {
        self.tasks.get(name)
    }

    /// Sets the target of `name`, creating the task if needed.
    pub fn set_target(&mut self, name: &str, millis: u64) -> &TaskRecord {
        let record = self.tasks.entry(name.to_string()).or_default();
        record.set_target(millis);
        record
    }

    /// Records a tracked sample for `name`, creating the task if needed.
    pub fn record_sample(&mut self, name: &str, elapsed_millis: u64) -> &TaskRecord {
        let record = self.tasks.entry(name.to_string()).or_default();
        record.record_sample(elapsed_millis);
        record
    }

    /// Removes `name` from the document.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::TaskNotFound` if the task does not exist.
    pub fn remove(&mut self, name: &str) -> Result<TaskRecord> {
        self.tasks
            .remove(name)
            .ok_or_else(|| HourglassError::TaskNotFound(name.to_string()))
    }

    /// Returns every task when `names` is empty, otherwise exactly the
    /// requested tasks.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::TaskNotFound` for the first requested name
    /// that does not exist.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<BTreeMap<String, TaskRecord>> {
        if names.is_empty() {
            return Ok(self.tasks.clone());
        }

        let mut selected = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            let record = self
                .tasks
                .get(name)
                .ok_or_else(|| HourglassError::TaskNotFound(name.to_string()))?;
            selected.insert(name.to_string(), record.clone());
        }
        Ok(selected)
    }
}

// ============================================================================
// Tests
// ============================================================================

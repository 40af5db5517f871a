//! hourglass library
//!
//! This library provides the core functionality for the hourglass CLI.
//! It includes:
//! - Duration parsing and formatting (`25m`, `90s`, `2h`, `500ms`)
//! - A JSON task file holding target times and tracked averages
//! - Cancellable fixed and indefinite timers with a progress bar
//! - A repeating alarm played through rodio
//! - CLI command parsing and display utilities

pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod sound;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use app::{RunOptions, RunReport, TaskOperations, TrackReport};
pub use config::AppConfig;
pub use engine::{Alarm, Interrupts, Repeat, Timer, TimerPhase, WaitOutcome};
pub use error::{HourglassError, Result, StorageError, StorageErrorKind};
pub use store::TaskStore;
pub use types::{
    format_duration, parse_duration, ParseDurationError, TaskDocument, TaskMode, TaskRecord,
};

// Re-export sound types
pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource};

//! Built-in alarm tone.
//!
//! Used when no sound file is configured or the configured file is missing.
//! One cycle is a short double beep followed by a pause, so repeated cycles
//! read as a steady alarm.

use std::time::Duration;

/// Shape of the synthesized beep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    /// Pitch in hertz
    pub frequency: f32,
    /// Length of a single beep
    pub beep: Duration,
    /// Silence after each beep
    pub gap: Duration,
    /// Beeps per cycle
    pub beeps: u32,
    /// Output gain (0.0 - 1.0)
    pub volume: f32,
}

impl Default for ToneSpec {
    fn default() -> Self {
        Self {
            frequency: 880.0,
            beep: Duration::from_millis(150),
            gap: Duration::from_millis(100),
            beeps: 2,
            volume: 0.25,
        }
    }
}

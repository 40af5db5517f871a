//! Sound playback for the alarm.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │      Alarm       │ ← repeats cycles, watches for Ctrl-C
//! └────────┬─────────┘
//!          │ start()
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundPlayer    │────▶│   Sound file     │
//! │                  │     ├──────────────────┤
//! │                  │────▶│  Built-in tone   │
//! └────────┬─────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │     Playback     │ ← one cycle; finished / stop
//! └──────────────────┘
//! ```
//!
//! Decoding and output are delegated to rodio; this module only decides
//! what to queue.

mod error;
mod player;
mod source;
mod tone;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub use error::SoundError;
pub use player::RodioSoundPlayer;
pub use source::SoundSource;
pub use tone::ToneSpec;

/// A single cycle of sound that is currently playing.
pub trait Playback {
    /// Returns true once the cycle has played to the end or was stopped.
    fn is_finished(&self) -> bool;

    /// Stops the cycle immediately.
    fn stop(&self);
}

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., rodio-based, mock for testing).
pub trait SoundPlayer {
    /// Starts playing one cycle of `source` and returns without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the sound cannot be decoded or the output device
    /// rejects it.
    fn start(&self, source: &SoundSource) -> Result<Box<dyn Playback>, SoundError>;
}

/// Mock sound player for testing.
///
/// Each cycle "plays" for a fixed wall-clock duration.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    stop_count: Arc<AtomicUsize>,
    cycle: Duration,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    /// Creates a mock whose cycles last `cycle`.
    #[must_use]
    pub fn new(cycle: Duration) -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            stop_count: Arc::new(AtomicUsize::new(0)),
            cycle,
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls.lock().unwrap().clone()
    }

    /// Number of cycles cut short with `stop`.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new(Duration::from_millis(20))
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn start(&self, source: &SoundSource) -> Result<Box<dyn Playback>, SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(source.clone());
        Ok(Box::new(MockPlayback {
            ends_at: Instant::now() + self.cycle,
            stopped: AtomicBool::new(false),
            stop_count: Arc::clone(&self.stop_count),
        }))
    }
}

struct MockPlayback {
    ends_at: Instant,
    stopped: AtomicBool,
    stop_count: Arc<AtomicUsize>,
}

impl Playback for MockPlayback {
    fn is_finished(&self) -> bool {
        self.stopped.load(Ordering::SeqCst) || Instant::now() >= self.ends_at
    }

    fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.stop_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

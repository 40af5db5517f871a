//! Interrupt-aware timer.
//!
//! This module provides the waiting half of a timer run:
//! - State transitions (Idle → Waiting → Completed | Cancelled)
//! - Fixed waits that tick with tokio::time::interval and race a deadline
//! - Indefinite waits that end only on cancellation
//! - Optional progress bar rendering

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::{interval_at, sleep_until, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::types::format_duration;

/// Default time between progress ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

const PROGRESS_BAR_WIDTH: u16 = 80;

/// Deadline used when a target is too large to add to the clock.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current phase of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerPhase {
    /// No wait has started yet
    #[default]
    Idle,
    /// A wait is in progress
    Waiting,
    /// The last wait ran to its deadline
    Completed,
    /// The last wait was cancelled
    Cancelled,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Waiting => "waiting",
            TimerPhase::Completed => "completed",
            TimerPhase::Cancelled => "cancelled",
        }
    }
}

// ============================================================================
// WaitOutcome
// ============================================================================

/// How a wait ended. Cancellation is an ordinary outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full duration elapsed.
    Completed {
        /// Time spent waiting
        elapsed: Duration,
    },
    /// The wait was interrupted.
    Cancelled {
        /// Time spent waiting
        elapsed: Duration,
    },
}

impl WaitOutcome {
    /// Returns the time spent waiting.
    pub fn elapsed(&self) -> Duration {
        match self {
            WaitOutcome::Completed { elapsed } | WaitOutcome::Cancelled { elapsed } => *elapsed,
        }
    }

    /// Returns true if the wait was interrupted.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WaitOutcome::Cancelled { .. })
    }

    fn phase(&self) -> TimerPhase {
        match self {
            WaitOutcome::Completed { .. } => TimerPhase::Completed,
            WaitOutcome::Cancelled { .. } => TimerPhase::Cancelled,
        }
    }
}

// ============================================================================
// Timer
// ============================================================================

/// Waits out a duration, or until cancelled.
///
/// The wait methods take `&mut self`, so a timer runs one wait at a time.
#[derive(Debug)]
pub struct Timer {
    /// Task name shown on the progress bar
    label: String,
    /// Current phase
    phase: TimerPhase,
    /// Time between progress ticks
    tick_interval: Duration,
    /// Ticks counted during the current or last wait
    ticks: u64,
}

impl Timer {
    /// Creates an idle timer for the task `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            phase: TimerPhase::Idle,
            tick_interval: DEFAULT_TICK_INTERVAL,
            ticks: 0,
        }
    }

    /// Overrides the tick interval (useful for testing).
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        // tokio intervals panic on a zero period.
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Returns the current phase.
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Returns the ticks counted during the current or last wait.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Waits for `duration_ms`, or until `cancel` fires.
    ///
    /// A tick is counted once per tick interval. With `render_progress` the
    /// ticks advance a progress bar on the terminal; otherwise nothing is
    /// drawn.
    pub async fn wait_fixed(
        &mut self,
        duration_ms: u64,
        render_progress: bool,
        cancel: &CancellationToken,
    ) -> WaitOutcome {
        let target = Duration::from_millis(duration_ms);
        let total_ticks = u64::try_from(target.as_nanos() / self.tick_interval.as_nanos())
            .unwrap_or(u64::MAX);

        let bar = if render_progress {
            progress_bar(&self.label, duration_ms, total_ticks)
        } else {
            ProgressBar::hidden()
        };

        let start = self.begin(Some(target));
        let deadline = start.checked_add(target).unwrap_or_else(|| start + FAR_FUTURE);

        let mut ticker = interval_at(start + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let sleep = sleep_until(deadline);
        tokio::pin!(sleep);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    break WaitOutcome::Cancelled { elapsed: start.elapsed() };
                }
                _ = &mut sleep => {
                    break WaitOutcome::Completed { elapsed: start.elapsed() };
                }
                _ = ticker.tick() => {
                    self.ticks += 1;
                    bar.inc(1);
                }
            }
        };

        if outcome.is_cancelled() {
            bar.abandon();
        } else {
            bar.finish();
        }

        self.finish(outcome)
    }

    /// Waits until `cancel` fires and returns the time spent waiting.
    pub async fn wait_indefinitely(&mut self, cancel: &CancellationToken) -> WaitOutcome {
        let start = self.begin(None);

        cancel.cancelled().await;

        self.finish(WaitOutcome::Cancelled {
            elapsed: start.elapsed(),
        })
    }

    fn begin(&mut self, target: Option<Duration>) -> Instant {
        self.phase = TimerPhase::Waiting;
        self.ticks = 0;
        info!(task = %self.label, ?target, "timer started");
        Instant::now()
    }

    fn finish(&mut self, outcome: WaitOutcome) -> WaitOutcome {
        self.phase = outcome.phase();
        info!(
            task = %self.label,
            phase = self.phase.as_str(),
            elapsed_ms = outcome.elapsed().as_millis() as u64,
            "timer finished"
        );
        outcome
    }
}

/// Builds the bar `Task '<name>' -> 12s/5m [=====.....] 4%`.
fn progress_bar(label: &str, duration_ms: u64, total_ticks: u64) -> ProgressBar {
    let bar = ProgressBar::new(total_ticks);
    let template = format!(
        "Task '{{prefix}}' -> {{elapsed}}/{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}}}] {{percent}}%"
    );
    if let Ok(style) = ProgressStyle::with_template(&template) {
        bar.set_style(style.progress_chars("=>."));
    }
    bar.set_prefix(label.to_string());
    bar.set_message(format_duration(duration_ms));
    bar
}

// ============================================================================
// Tests
// ============================================================================

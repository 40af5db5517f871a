//! Repeating alarm.
//!
//! Plays the alarm sound cycle after cycle until the repetition count runs
//! out or the cancellation token fires.

use tokio::time::{sleep, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::sound::{Playback, SoundError, SoundPlayer, SoundSource};

/// How often a playing cycle is checked for completion.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How many cycles the alarm plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Until cancelled
    Forever,
    /// A fixed number of cycles (at least one is always played)
    Times(u32),
}

impl Repeat {
    /// Counts one finished cycle. Returns true if another cycle is due.
    fn next_cycle(&mut self) -> bool {
        match self {
            Repeat::Forever => true,
            Repeat::Times(left) => {
                *left = left.saturating_sub(1);
                *left > 0
            }
        }
    }
}

impl From<i32> for Repeat {
    /// Any negative count means forever.
    fn from(count: i32) -> Self {
        u32::try_from(count).map_or(Repeat::Forever, Repeat::Times)
    }
}

/// Plays a sound source repeatedly through a [`SoundPlayer`].
pub struct Alarm<'a, P: SoundPlayer + ?Sized> {
    player: &'a P,
    source: SoundSource,
    poll_interval: Duration,
}

impl<'a, P: SoundPlayer + ?Sized> Alarm<'a, P> {
    /// Creates an alarm playing `source` on `player`.
    pub fn new(player: &'a P, source: SoundSource) -> Self {
        Self {
            player,
            source,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the completion poll interval (useful for testing).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Rings until `repeat` is exhausted or `cancel` fires, returning the
    /// time from the first cycle's start to the stop.
    ///
    /// Cancellation stops the playing cycle at once.
    ///
    /// # Errors
    ///
    /// Returns the player's error if a cycle cannot be started; there is no
    /// retry.
    pub async fn ring(&self, repeat: Repeat, cancel: &CancellationToken) -> Result<Duration, SoundError> {
        let mut repeat = repeat;
        let mut cycles = 0u32;
        let start = Instant::now();

        info!(source = %self.source.name(), ?repeat, "alarm started");

        loop {
            let playback = self.player.start(&self.source)?;
            cycles += 1;

            if !self.play_to_end(playback.as_ref(), cancel).await {
                playback.stop();
                break;
            }
            if !repeat.next_cycle() || cancel.is_cancelled() {
                break;
            }
        }

        let elapsed = start.elapsed();
        info!(cycles, elapsed_ms = elapsed.as_millis() as u64, "alarm stopped");
        Ok(elapsed)
    }

    /// Returns false if `cancel` fired before the cycle finished.
    async fn play_to_end(&self, playback: &dyn Playback, cancel: &CancellationToken) -> bool {
        loop {
            if playback.is_finished() {
                return true;
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("alarm cycle interrupted");
                    return false;
                }
                _ = sleep(self.poll_interval) => {}
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

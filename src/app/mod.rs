//! Task operations.
//!
//! Composes the task store, timer, alarm and interrupt listener into the
//! user-facing actions. Each action is one independent run; the task file is
//! loaded fresh every time.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::cli::display::Display;
use crate::config::AppConfig;
use crate::engine::timer::DEFAULT_TICK_INTERVAL;
use crate::engine::{Alarm, Interrupts, Repeat, Timer, WaitOutcome};
use crate::error::{HourglassError, Result};
use crate::sound::{SoundPlayer, SoundSource};
use crate::store::TaskStore;
use crate::types::{TaskMode, TaskRecord};

/// Options for a fixed timer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Suppress the progress bar
    pub silent: bool,
}

/// Result of a fixed timer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// How the wait ended
    pub outcome: WaitOutcome,
    /// How long the alarm rang
    pub alarm_elapsed: Duration,
}

/// Result of a tracked session.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackReport {
    /// Measured session length in milliseconds
    pub elapsed_millis: u64,
    /// The task record after folding in the session
    pub record: TaskRecord,
}

/// The hourglass actions over one task file.
#[derive(Debug, Clone)]
pub struct TaskOperations {
    store: TaskStore,
    interrupts: Interrupts,
    sound: SoundSource,
    tick_interval: Duration,
}

impl TaskOperations {
    /// Creates the operations for `store`, interrupted through `interrupts`.
    pub fn new(store: TaskStore, interrupts: Interrupts) -> Self {
        Self {
            store,
            interrupts,
            sound: SoundSource::default(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Creates the operations described by `config`.
    pub fn from_config(config: &AppConfig, interrupts: Interrupts) -> Self {
        Self::new(TaskStore::new(&config.task_file), interrupts)
            .with_sound(SoundSource::from_config(config.sound_file.as_deref()))
    }

    /// Sets the alarm sound.
    pub fn with_sound(mut self, sound: SoundSource) -> Self {
        self.sound = sound;
        self
    }

    /// Overrides the progress tick interval (useful for testing).
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Returns the task store.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Returns the interrupt listener.
    pub fn interrupts(&self) -> &Interrupts {
        &self.interrupts
    }

    /// Creates an empty task file and returns its location.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::AlreadyExists` if the file exists.
    pub async fn create_task_file(&self) -> Result<PathBuf> {
        self.store.initialize().await?;
        info!(path = %self.store.path().display(), "task file initialized");
        Ok(self.store.path().to_path_buf())
    }

    /// Sets the target time of `name`.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::InvalidInput` for a malformed time string or
    /// a storage error.
    pub async fn set_task(&self, name: &str, time: &str) -> Result<TaskRecord> {
        self.store.set_target(name, time).await
    }

    /// Removes `name` from the task file.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::TaskNotFound` if the task does not exist.
    pub async fn remove_task(&self, name: &str) -> Result<TaskRecord> {
        self.store.remove_task(name).await
    }

    /// Returns the requested tasks, or all of them when `names` is empty.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::TaskNotFound` for the first missing name.
    pub async fn view_tasks<S: AsRef<str>>(&self, names: &[S]) -> Result<BTreeMap<String, TaskRecord>> {
        self.store.list_tasks(names).await
    }

    /// Returns the target time of `name` in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::TaskNotFound` if the task does not exist, or
    /// `HourglassError::MissingConfiguration` if it has only a tracked average.
    pub async fn target_of(&self, name: &str) -> Result<u64> {
        let document = self.store.load().await?;
        let record = document
            .get(name)
            .ok_or_else(|| HourglassError::TaskNotFound(name.to_string()))?;
        match record.mode() {
            TaskMode::Target { millis } => Ok(millis),
            TaskMode::Tracked { .. } | TaskMode::Unset => {
                Err(HourglassError::MissingConfiguration(name.to_string()))
            }
        }
    }

    /// Waits out the target time of `name`, then rings until interrupted.
    ///
    /// The alarm rings whether the wait completed or was interrupted.
    ///
    /// # Errors
    ///
    /// Returns `HourglassError::TaskNotFound` or
    /// `HourglassError::MissingConfiguration` before waiting, and
    /// `HourglassError::Playback` if the alarm cannot be played.
    pub async fn run_fixed_timer<P: SoundPlayer + ?Sized>(
        &self,
        name: &str,
        options: RunOptions,
        player: &P,
    ) -> Result<RunReport> {
        let target = self.target_of(name).await?;

        let mut timer = Timer::new(name).with_tick_interval(self.tick_interval);

        Display::show_timer_started();
        let cancel = self.interrupts.arm();
        let outcome = timer.wait_fixed(target, !options.silent, &cancel).await;

        Display::show_alarm_started();
        let cancel = self.interrupts.arm();
        let alarm_elapsed = Alarm::new(player, self.sound.clone())
            .ring(Repeat::Forever, &cancel)
            .await?;

        Ok(RunReport {
            outcome,
            alarm_elapsed,
        })
    }

    /// Measures time until the next interrupt and folds it into the running
    /// average of `name`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the task file cannot be read (checked
    /// before waiting) or written.
    pub async fn run_tracked_session(&self, name: &str) -> Result<TrackReport> {
        // Fail before the session rather than after it.
        self.store.load().await?;

        let mut timer = Timer::new(name);

        Display::show_tracking_started(name);
        let cancel = self.interrupts.arm();
        let outcome = timer.wait_indefinitely(&cancel).await;

        let elapsed_millis = u64::try_from(outcome.elapsed().as_millis()).unwrap_or(u64::MAX);
        let record = self
            .store
            .record_tracked_sample(name, elapsed_millis)
            .await?;

        Ok(TrackReport {
            elapsed_millis,
            record,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::MockSoundPlayer;

    async fn create_ops() -> (tempfile::TempDir, TaskOperations) {
        let dir = tempfile::tempdir().unwrap();
        let ops = TaskOperations::new(TaskStore::new(dir.path().join("tasks")), Interrupts::new())
            .with_tick_interval(Duration::from_millis(10));
        ops.create_task_file().await.unwrap();
        (dir, ops)
    }

    /// Delivers `count` interrupts, each as soon as something is armed after
    /// `delay`.
    fn interrupt_later(interrupts: Interrupts, delay: Duration, count: usize) {
        tokio::spawn(async move {
            for _ in 0..count {
                tokio::time::sleep(delay).await;
                while !interrupts.trigger() {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        });
    }

    #[tokio::test]
    async fn test_create_task_file_twice() {
        let (_dir, ops) = create_ops().await;
        let err = ops.create_task_file().await.unwrap_err();
        assert!(matches!(err, HourglassError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_set_view_remove() {
        let (_dir, ops) = create_ops().await;
        ops.set_task("a", "1m").await.unwrap();
        ops.set_task("b", "2s").await.unwrap();

        let tasks = ops.view_tasks(&["b"]).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks["b"].target_millis(), Some(2_000));

        ops.remove_task("a").await.unwrap();
        let tasks = ops.view_tasks::<&str>(&[]).await.unwrap();
        assert_eq!(tasks.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_run_fixed_timer_unknown_task() {
        let (_dir, ops) = create_ops().await;
        let player = MockSoundPlayer::default();

        let err = ops
            .run_fixed_timer("nope", RunOptions::default(), &player)
            .await
            .unwrap_err();

        assert!(matches!(err, HourglassError::TaskNotFound(_)));
        assert_eq!(player.play_count(), 0);
    }

    #[tokio::test]
    async fn test_run_fixed_timer_tracked_task_has_no_target() {
        let (_dir, ops) = create_ops().await;
        ops.store().record_tracked_sample("t", 1_000).await.unwrap();
        let player = MockSoundPlayer::default();

        let err = ops
            .run_fixed_timer("t", RunOptions { silent: true }, &player)
            .await
            .unwrap_err();

        assert!(matches!(err, HourglassError::MissingConfiguration(ref n) if n == "t"));
    }

    #[tokio::test]
    async fn test_target_of_ignores_target_beside_tracked_average() {
        let (_dir, ops) = create_ops().await;
        tokio::fs::write(
            ops.store().path(),
            r#"{"tasks":{"t":{"targetMillis":5,"trackedAverage":3.0,"sampleCount":1}}}"#,
        )
        .await
        .unwrap();

        let err = ops.target_of("t").await.unwrap_err();
        assert!(matches!(err, HourglassError::MissingConfiguration(ref n) if n == "t"));
    }

    #[tokio::test]
    async fn test_run_fixed_timer_completes_then_rings() {
        let (_dir, ops) = create_ops().await;
        ops.set_task("t", "30ms").await.unwrap();
        let player = MockSoundPlayer::new(Duration::from_millis(10));

        // Fires only once the alarm is armed, well after the 30ms wait.
        interrupt_later(ops.interrupts().clone(), Duration::from_millis(200), 1);

        let report = ops
            .run_fixed_timer("t", RunOptions { silent: true }, &player)
            .await
            .unwrap();

        assert!(!report.outcome.is_cancelled());
        assert!(report.outcome.elapsed() >= Duration::from_millis(30));
        assert!(player.play_count() >= 1);
        assert!(report.alarm_elapsed > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_run_fixed_timer_cancelled_wait_still_rings() {
        let (_dir, ops) = create_ops().await;
        ops.set_task("t", "1h").await.unwrap();
        let player = MockSoundPlayer::new(Duration::from_millis(10));

        interrupt_later(ops.interrupts().clone(), Duration::from_millis(30), 2);

        let report = tokio::time::timeout(
            Duration::from_secs(5),
            ops.run_fixed_timer("t", RunOptions { silent: true }, &player),
        )
        .await
        .expect("run should end after two interrupts")
        .unwrap();

        assert!(report.outcome.is_cancelled());
        assert!(player.play_count() >= 1);
    }

    #[tokio::test]
    async fn test_run_fixed_timer_playback_error() {
        let (_dir, ops) = create_ops().await;
        ops.set_task("t", "5ms").await.unwrap();
        let player = MockSoundPlayer::default();
        player.set_should_fail(true);

        let err = ops
            .run_fixed_timer("t", RunOptions { silent: true }, &player)
            .await
            .unwrap_err();

        assert!(matches!(err, HourglassError::Playback(_)));
    }

    #[tokio::test]
    async fn test_tracked_session_records_sample() {
        let (_dir, ops) = create_ops().await;
        ops.set_task("t", "5m").await.unwrap();

        interrupt_later(ops.interrupts().clone(), Duration::from_millis(50), 1);

        let report = tokio::time::timeout(Duration::from_secs(5), ops.run_tracked_session("t"))
            .await
            .expect("tracked session should end on interrupt")
            .unwrap();

        assert!(report.elapsed_millis >= 50);
        assert_eq!(report.record.sample_count(), Some(1));
        assert_eq!(report.record.target_millis(), None);
        assert_eq!(
            report.record.tracked_average(),
            Some(report.elapsed_millis as f64)
        );
    }

    #[tokio::test]
    async fn test_tracked_session_without_task_file() {
        let dir = tempfile::tempdir().unwrap();
        let ops = TaskOperations::new(TaskStore::new(dir.path().join("missing")), Interrupts::new());

        let err = ops.run_tracked_session("t").await.unwrap_err();
        assert!(err.is_storage_error());
    }
}

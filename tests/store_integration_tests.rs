//! Integration tests for the task file and task operations.
//!
//! These tests drive the public API against a task file in a temporary
//! directory:
//! - Duration strings round-trip through the formatter
//! - Task file creation, target times and tracked averages
//! - Removing and selecting tasks
//! - Cancelling a tracked session

use std::path::PathBuf;
use std::time::Duration;

use hourglass::{
    format_duration, parse_duration, HourglassError, Interrupts, StorageErrorKind, TaskMode,
    TaskOperations, TaskStore,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Creates an initialized task file in a fresh temporary directory.
async fn create_store() -> (tempfile::TempDir, TaskStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join(".hourglass"));
    store.initialize().await.unwrap();
    (dir, store)
}

async fn read_json(path: &std::path::Path) -> serde_json::Value {
    let data = tokio::fs::read_to_string(path).await.unwrap();
    serde_json::from_str(&data).unwrap()
}

// ============================================================================
// Duration Strings
// ============================================================================

#[test]
fn test_duration_round_trip_uses_largest_unit() {
    let cases = [
        ("2h", "2h"),
        ("120m", "2h"),
        ("90m", "1.5h"),
        ("45s", "45s"),
        ("90S", "1.5m"),
        ("1500ms", "1.5s"),
        ("999MS", "999"),
        ("60000ms", "1m"),
    ];

    for (input, expected) in cases {
        let millis = parse_duration(input).unwrap();
        assert_eq!(format_duration(millis), expected, "input {input}");
    }
}

#[test]
fn test_duration_rejects_malformed_input() {
    for input in ["", "ten", "5d", "5", "-5m", "5 m", "m", "5mm"] {
        let err = parse_duration(input).unwrap_err();
        assert_eq!(err.input, input);
    }
}

// ============================================================================
// Task File
// ============================================================================

#[tokio::test]
async fn test_initialize_writes_empty_document() {
    let (_dir, store) = create_store().await;

    let json = read_json(store.path()).await;
    assert_eq!(json, serde_json::json!({ "tasks": {} }));

    let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
    assert!(raw.ends_with('\n'));
}

#[tokio::test]
async fn test_second_initialize_fails_and_keeps_document() {
    let (_dir, store) = create_store().await;
    store.set_target("keep", "10s").await.unwrap();
    let before = tokio::fs::read_to_string(store.path()).await.unwrap();

    let err = store.initialize().await.unwrap_err();
    assert!(matches!(err, HourglassError::AlreadyExists(ref p) if p == store.path()));
    assert!(err.to_string().ends_with(": File already exists."));

    let after = tokio::fs::read_to_string(store.path()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_missing_file_points_to_init() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("absent"));

    let err = store.set_target("t", "1m").await.unwrap_err();

    assert_eq!(err.storage_kind(), Some(StorageErrorKind::NotFound));
    assert!(err
        .to_string()
        .ends_with(": No such file: Run \"hourglass init\" to create a new task file."));
}

#[tokio::test]
async fn test_directory_as_task_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path());

    let err = store.load().await.unwrap_err();
    assert!(err.is_storage_error());
}

#[tokio::test]
async fn test_corrupt_document() {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join(".hourglass");
    tokio::fs::write(&path, "not json").await.unwrap();

    let err = TaskStore::new(&path).load().await.unwrap_err();
    assert!(matches!(err, HourglassError::CorruptDocument { .. }));
}

// ============================================================================
// Target Times and Tracked Averages
// ============================================================================

#[tokio::test]
async fn test_set_target_writes_millis_only() {
    let (_dir, store) = create_store().await;

    store.set_target("t", "10s").await.unwrap();

    let json = read_json(store.path()).await;
    assert_eq!(json["tasks"]["t"], serde_json::json!({ "targetMillis": 10000 }));
}

#[tokio::test]
async fn test_invalid_time_leaves_document_untouched() {
    let (_dir, store) = create_store().await;
    let before = tokio::fs::read_to_string(store.path()).await.unwrap();

    let err = store.set_target("t", "10x").await.unwrap_err();
    assert!(matches!(err, HourglassError::InvalidInput(_)));

    let after = tokio::fs::read_to_string(store.path()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_tracked_samples_replace_target() {
    let (_dir, store) = create_store().await;
    store.set_target("t", "5m").await.unwrap();

    let first = store.record_tracked_sample("t", 4_000).await.unwrap();
    assert_eq!(first.target_millis(), None);
    assert_eq!(first.sample_count(), Some(1));
    assert_eq!(first.tracked_average(), Some(4_000.0));

    let json = read_json(store.path()).await;
    assert!(json["tasks"]["t"].get("targetMillis").is_none());
}

#[tokio::test]
async fn test_second_sample_uses_incremental_formula() {
    let (_dir, store) = create_store().await;

    store.record_tracked_sample("t", 4_000).await.unwrap();
    let second = store.record_tracked_sample("t", 2_000).await.unwrap();

    // average + elapsed / count, which is not the arithmetic mean (3000)
    assert_eq!(second.sample_count(), Some(2));
    assert_eq!(second.tracked_average(), Some(5_000.0));

    let third = store.record_tracked_sample("t", 3_000).await.unwrap();
    assert_eq!(third.sample_count(), Some(3));
    assert_eq!(third.tracked_average(), Some(6_000.0));
}

#[tokio::test]
async fn test_set_target_clears_tracked_average() {
    let (_dir, store) = create_store().await;
    store.record_tracked_sample("t", 4_000).await.unwrap();

    let record = store.set_target("t", "1h").await.unwrap();

    assert_eq!(record.mode(), TaskMode::Target { millis: 3_600_000 });
    let json = read_json(store.path()).await;
    assert_eq!(json["tasks"]["t"], serde_json::json!({ "targetMillis": 3600000 }));
}

// ============================================================================
// Removing and Selecting Tasks
// ============================================================================

#[tokio::test]
async fn test_remove_absent_task_leaves_document() {
    let (_dir, store) = create_store().await;
    store.set_target("a", "1m").await.unwrap();
    let before = tokio::fs::read_to_string(store.path()).await.unwrap();

    let err = store.remove_task("zzz").await.unwrap_err();
    assert!(matches!(err, HourglassError::TaskNotFound(ref n) if n == "zzz"));

    let after = tokio::fs::read_to_string(store.path()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_remove_deletes_only_that_task() {
    let (_dir, store) = create_store().await;
    store.set_target("a", "1m").await.unwrap();
    store.set_target("b", "2m").await.unwrap();
    store.record_tracked_sample("c", 1_000).await.unwrap();

    store.remove_task("b").await.unwrap();

    let document = store.load().await.unwrap();
    assert_eq!(document.tasks.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    assert_eq!(document.tasks["a"].target_millis(), Some(60_000));
    assert_eq!(document.tasks["c"].sample_count(), Some(1));
}

#[tokio::test]
async fn test_list_selected_and_all() {
    let (_dir, store) = create_store().await;
    for name in ["a", "b", "c"] {
        store.set_target(name, "1s").await.unwrap();
    }

    let selected = store.list_tasks(&["a", "c"]).await.unwrap();
    assert_eq!(selected.keys().collect::<Vec<_>>(), vec!["a", "c"]);

    let all = store.list_tasks::<&str>(&[]).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_list_unknown_task() {
    let (_dir, store) = create_store().await;
    store.set_target("a", "1s").await.unwrap();

    let err = store.list_tasks(&["a", "nope"]).await.unwrap_err();
    assert!(matches!(err, HourglassError::TaskNotFound(ref n) if n == "nope"));
}

// ============================================================================
// Tracked Sessions
// ============================================================================

#[tokio::test]
async fn test_cancelled_tracked_session_returns_promptly() {
    let (_dir, store) = create_store().await;
    let interrupts = Interrupts::new();
    let ops = TaskOperations::new(store.clone(), interrupts.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(40)).await;
        while !interrupts.trigger() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    });

    let report = tokio::time::timeout(Duration::from_secs(2), ops.run_tracked_session("new"))
        .await
        .expect("session should end soon after the interrupt")
        .unwrap();

    assert!(report.elapsed_millis > 0);
    let document = store.load().await.unwrap();
    assert_eq!(document.tasks["new"].sample_count(), Some(1));
}

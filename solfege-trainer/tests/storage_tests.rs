//! Session history persistence across trainer restarts

use solfege_trainer::generator::{DiatonicLevelGenerator, DiatonicNoteResolutionGenerator};
use solfege_trainer::practice::{CyclicPracticeManager, PracticeManager};
use solfege_trainer::preferences::{FilePreferences, PreferenceKey, Preferences};
use solfege_trainer::storage::FileSessionStorage;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// A manager wired like the binary wires it
fn manager(data_dir: &Path) -> CyclicPracticeManager {
    CyclicPracticeManager::new(
        Arc::new(FileSessionStorage::new(data_dir)),
        Arc::new(DiatonicLevelGenerator::new()),
        Arc::new(DiatonicNoteResolutionGenerator::new()),
        Arc::new(FilePreferences::open(data_dir)),
    )
}

fn sessions_file(data_dir: &Path, level_id: u32) -> std::path::PathBuf {
    data_dir
        .join("sessions")
        .join(format!("sessions_{}.txt", level_id))
}

#[tokio::test]
async fn test_history_and_cursor_survive_restart() {
    let dir = TempDir::new().unwrap();

    let first_run = manager(dir.path());
    first_run.prepare_to_practice().await.unwrap();
    first_run.move_to_next_level().await.unwrap();
    let level = first_run.move_to_next_level().await.unwrap();
    assert_eq!(level.id, 2);

    first_run.start_session().await.unwrap();
    let question = first_run.move_to_next_question().await.unwrap();
    first_run
        .log_correct_answer(question.answer, &question)
        .await
        .unwrap();
    let question = first_run.move_to_next_question().await.unwrap();
    first_run
        .log_wrong_answer(question.answer, &question)
        .await
        .unwrap();
    let stopped = first_run.stop_current_session().await.unwrap();
    assert_eq!(stopped.sessions.len(), 1);
    drop(first_run);

    let preferences = FilePreferences::open(dir.path());
    assert_eq!(preferences.int(PreferenceKey::LatestPracticeCursor), Some(1));

    let second_run = manager(dir.path());
    second_run.prepare_to_practice().await.unwrap();
    let resumed = second_run.move_to_next_level().await.unwrap();

    assert_eq!(resumed.id, 2);
    assert_eq!(resumed.sessions.len(), 1);

    let summary = resumed.sessions[0].summary();
    assert_eq!(summary.correct, 1);
    assert_eq!(summary.wrong, 1);
}

#[tokio::test]
async fn test_malformed_records_are_skipped() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("sessions")).unwrap();
    std::fs::write(
        sessions_file(dir.path(), 1),
        "1700000000.25;c:1:3:1,d:1:0:2\nnot a record\n1700000100;;\n",
    )
    .unwrap();

    let manager = manager(dir.path());
    manager.prepare_to_practice().await.unwrap();
    let level = manager.move_to_first_level().await.unwrap();

    assert_eq!(level.id, 1);
    assert_eq!(level.sessions.len(), 1);

    let summary = level.summary();
    let c = level.notes[0];
    assert_eq!(summary.average_per_note[&c], 0.75);
    assert_eq!(summary.average_per_note.len(), 2);
}

#[tokio::test]
async fn test_damaged_history_still_summarizes() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("sessions")).unwrap();
    std::fs::write(
        sessions_file(dir.path(), 1),
        "garbage;c:1:2:0,d:1:1:1\n1000;c:1:4294967295:1\n",
    )
    .unwrap();

    let manager = manager(dir.path());
    manager.prepare_to_practice().await.unwrap();
    let level = manager.move_to_first_level().await.unwrap();

    assert_eq!(level.sessions.len(), 2);
    assert_eq!(level.sessions[0].timestamp.timestamp(), 0);

    let summary = level.summary();
    let c = level.notes[0];
    assert!(summary.average_per_note[&c] > 0.99);
    assert_eq!(summary.average_per_note.len(), 2);
}

#[tokio::test]
async fn test_empty_session_is_never_written() {
    let dir = TempDir::new().unwrap();

    let manager = manager(dir.path());
    manager.prepare_to_practice().await.unwrap();
    manager.move_to_first_level().await.unwrap();
    manager.start_session().await.unwrap();

    let level = manager.stop_current_session().await.unwrap();

    assert!(level.sessions.is_empty());
    assert!(!sessions_file(dir.path(), 1).exists());
}

#[tokio::test]
async fn test_appends_keep_earlier_sessions() {
    let dir = TempDir::new().unwrap();
    let manager = manager(dir.path());
    manager.prepare_to_practice().await.unwrap();
    manager.move_to_first_level().await.unwrap();

    for _ in 0..3 {
        manager.start_session().await.unwrap();
        let question = manager.move_to_next_question().await.unwrap();
        manager
            .log_correct_answer(question.answer, &question)
            .await
            .unwrap();
        manager.stop_current_session().await.unwrap();
    }

    let content = std::fs::read_to_string(sessions_file(dir.path(), 1)).unwrap();
    assert_eq!(content.lines().count(), 3);

    let reloaded = manager.move_to_first_level().await.unwrap();
    assert_eq!(reloaded.sessions.len(), 3);
}

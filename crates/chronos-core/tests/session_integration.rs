//! Integration tests for full fasting sessions.
//!
//! These drive the session controller with a manual clock over a real
//! (in-memory) SQLite store and check the persisted records afterwards.

use chrono::Duration;
use chronos_core::storage::{FAST_START_KEY, PROGRESS_KEY};
use chronos_core::{
    resolve_phase, Database, Event, KvStore, ManualClock, ProgressStore, SessionController,
    UserProgress, PHASES,
};

const T0: i64 = 1_735_689_600_000;

fn run_session(db: &Database, seconds: i64) -> Event {
    let mut controller = SessionController::new(db, ManualClock::at_millis(T0));
    controller.start().expect("fresh controller starts");
    controller.clock().advance(Duration::seconds(seconds));
    controller.tick();
    controller.stop().expect("running controller stops")
}

fn stored_progress(db: &Database) -> UserProgress {
    serde_json::from_str(&db.get(PROGRESS_KEY).unwrap().unwrap()).unwrap()
}

#[test]
fn test_eight_hours_completes_first_phase() {
    let db = Database::open_memory().unwrap();
    run_session(&db, 8 * 3600);

    let progress = stored_progress(&db);
    assert_eq!(progress.streak(1), 1);
    assert_eq!(progress.total_fasts, 1);
    for id in 2..=4 {
        assert_eq!(progress.streak(id), 0);
    }
}

#[test]
fn test_one_second_short_of_second_phase() {
    let db = Database::open_memory().unwrap();
    run_session(&db, 17 * 3600 + 59 * 60 + 59);

    let progress = stored_progress(&db);
    assert_eq!(progress.streak(1), 1);
    assert_eq!(progress.streak(2), 0);
}

#[test]
fn test_thirty_hours_exactly_completes_three_phases() {
    let db = Database::open_memory().unwrap();
    let event = run_session(&db, 30 * 3600);

    match event {
        Event::FastStopped {
            completed_phase_ids,
            ..
        } => assert_eq!(completed_phase_ids, vec![1, 2, 3]),
        other => panic!("expected FastStopped, got {other:?}"),
    }
    let progress = stored_progress(&db);
    assert_eq!(progress.streak(3), 1);
    assert_eq!(progress.streak(4), 0);
}

#[test]
fn test_phase_boundaries() {
    assert_eq!(resolve_phase(0.0).id, 1);
    assert_eq!(resolve_phase(47.999).id, 4);
    assert_eq!(resolve_phase(48.0).id, 4);
}

#[test]
fn test_partial_record_is_merged() {
    let db = Database::open_memory().unwrap();
    db.set(PROGRESS_KEY, r#"{"streaks":{"1":3,"2":1},"badges":[],"totalFasts":3}"#)
        .unwrap();

    let loaded = ProgressStore::new(&db).load();
    let streaks: Vec<_> = loaded.streaks.into_iter().collect();
    assert_eq!(streaks, vec![(1, 3), (2, 1), (3, 0), (4, 0)]);
}

#[test]
fn test_streaks_accumulate_across_sessions() {
    let db = Database::open_memory().unwrap();
    for _ in 0..7 {
        run_session(&db, 9 * 3600);
    }

    let controller = SessionController::new(&db, ManualClock::at_millis(T0));
    assert_eq!(controller.progress().streak(1), 7);
    assert_eq!(controller.progress().total_fasts, 7);
    let badges: Vec<_> = controller
        .progress()
        .unlocked_badges()
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(badges, vec!["bronze_7"]);
}

#[test]
fn test_session_survives_restart() {
    let db = Database::open_memory().unwrap();
    {
        let mut controller = SessionController::new(&db, ManualClock::at_millis(T0));
        controller.start();
    }

    let later = ManualClock::at_millis(T0 + 20 * 3600 * 1000);
    let mut controller = SessionController::new(&db, later);
    assert!(controller.is_running());
    assert_eq!(controller.current_phase().id, 3);

    controller.stop();
    assert!(db.get(FAST_START_KEY).unwrap().is_none());
    assert_eq!(stored_progress(&db).streak(2), 1);
}

#[test]
fn test_reset_mid_session_leaves_progress() {
    let db = Database::open_memory().unwrap();
    run_session(&db, 10 * 3600);
    let before = stored_progress(&db);

    let mut controller = SessionController::new(&db, ManualClock::at_millis(T0));
    controller.start();
    controller.clock().advance(Duration::hours(40));
    controller.tick();
    controller.reset();

    assert!(!controller.is_running());
    assert_eq!(stored_progress(&db), before);
    assert_eq!(controller.progress(), &before);
    assert_eq!(PHASES.len(), before.streaks.len());
}

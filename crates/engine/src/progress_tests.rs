use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use streamvault_core::FakeClock;

fn tracker() -> ProgressTracker<FakeClock> {
    ProgressTracker::new(FakeClock::new(0))
}

#[test]
fn add_and_get_round_trips() {
    let t = tracker();
    let id = TaskId::generate();
    t.add(id.clone(), "mp4_remux", false);
    let task = t.get(&id).expect("task present");
    assert_eq!(task.state, TaskState::Pending);
    assert_eq!(task.progress, 0);
}

#[test]
fn status_change_moves_entry_to_completed_map() {
    let t = tracker();
    let id = TaskId::generate();
    t.add(id.clone(), "mp4_remux", false);
    t.update_status(&id, TaskState::Running, None);
    assert_eq!(t.stats().active, 1);
    t.update_status(&id, TaskState::Completed, None);
    let stats = t.stats();
    assert_eq!(stats.active, 0);
    assert_eq!(stats.completed, 1);
    assert_eq!(t.get(&id).unwrap().progress, 100);
}

#[test]
fn progress_notifies_only_past_five_point_threshold() {
    let t = tracker();
    let id = TaskId::generate();
    t.add(id.clone(), "mp4_remux", false);
    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notifications);
    t.register_progress_callback(move |event| {
        if matches!(event, ProgressEvent::ProgressChanged { .. }) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    for pct in 0..=100u8 {
        t.update_progress(&id, pct);
    }

    // At most ceil(100/5)+1 = 21 messages (P11).
    assert!(notifications.load(Ordering::SeqCst) <= 21);
    assert!(notifications.load(Ordering::SeqCst) > 0);
}

#[test]
fn external_flag_is_counted_separately_from_queue_tasks() {
    let t = tracker();
    t.add(TaskId::generate(), "capture", true);
    t.add(TaskId::generate(), "mp4_remux", false);
    let stats = t.stats();
    assert_eq!(stats.active, 1);
    assert_eq!(stats.external, 1);
}

#[test]
fn sweep_removes_completed_entries_past_retention() {
    let clock = FakeClock::new(0);
    let t = ProgressTracker::new(clock.clone());
    let id = TaskId::generate();
    t.add(id.clone(), "cleanup", false);
    t.update_status(&id, TaskState::Completed, None);
    clock.advance_ms((COMPLETED_RETENTION.num_milliseconds() as u64) + 1);
    t.sweep();
    assert!(t.get(&id).is_none());
}

use super::*;

#[test]
fn pending_step_is_not_complete() {
    let state = RecordingProcessingState::pending(RecordingId::new(1), StepName::Thumbnail, Utc::now());
    assert_eq!(state.attempts, 0);
    assert!(!state.is_complete());
}

#[test]
fn completed_and_skipped_both_satisfy_the_idempotency_gate() {
    let mut state = RecordingProcessingState::pending(RecordingId::new(1), StepName::Cleanup, Utc::now());
    state.status = ProcessingStepStatus::Completed;
    assert!(state.is_complete());
    state.status = ProcessingStepStatus::Skipped;
    assert!(state.is_complete());
    state.status = ProcessingStepStatus::Failed;
    assert!(!state.is_complete());
}

#[test]
fn all_six_steps_are_distinct() {
    let set: std::collections::HashSet<_> = StepName::ALL.iter().copied().collect();
    assert_eq!(set.len(), 6);
}

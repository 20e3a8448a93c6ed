use super::*;
use chrono::Utc;
use streamvault_core::Payload;

fn node(id: &str, deps: &[&str], priority: Priority) -> DagNode {
    DagNode::new(
        DependencyTask {
            id: TaskId::new(id),
            payload: Payload::Cleanup {
                recording_id: streamvault_core::RecordingId::new(1),
            },
            depends_on: deps.iter().map(|d| TaskId::new(*d)).collect(),
            status: DependencyStatus::Pending,
            created_at: Utc::now(),
        },
        priority,
    )
}

#[test]
fn task_with_no_dependencies_is_immediately_ready() {
    let mut mgr = DependencyManager::new();
    mgr.add_task(node("a", &[], Priority::Normal)).unwrap();
    let ready = mgr.get_ready_tasks();
    assert_eq!(ready, vec![TaskId::new("a")]);
}

#[test]
fn task_waits_for_all_dependencies_before_becoming_ready() {
    let mut mgr = DependencyManager::new();
    mgr.add_task(node("a", &[], Priority::Normal)).unwrap();
    mgr.add_task(node("b", &["a"], Priority::Normal)).unwrap();

    assert_eq!(mgr.get_ready_tasks(), vec![TaskId::new("a")]);
    mgr.mark_running(&TaskId::new("a"));
    let effect = mgr.mark_completed(&TaskId::new("a"));
    assert_eq!(effect.newly_ready, vec![TaskId::new("b")]);
}

#[test]
fn forward_reference_is_rejected() {
    let mut mgr = DependencyManager::new();
    let err = mgr.add_task(node("b", &["a"], Priority::Normal));
    assert!(err.is_err());
}

#[test]
fn exhausted_retries_propagate_failure_to_dependents() {
    let mut mgr = DependencyManager::new();
    mgr.add_task(node("metadata", &[], Priority::Normal)).unwrap();
    mgr.add_task(node("remux", &["metadata"], Priority::Normal)).unwrap();
    mgr.add_task(node("validate", &["remux"], Priority::Normal)).unwrap();

    let id = TaskId::new("metadata");
    mgr.mark_running(&id);
    mgr.mark_failed(&id, "boom", false);
    mgr.mark_running(&id);
    mgr.mark_failed(&id, "boom", false);
    mgr.mark_running(&id);
    let effect = mgr.mark_failed(&id, "boom", false);

    assert_eq!(mgr.get(&id).unwrap().task.status, DependencyStatus::Failed);
    assert!(effect.newly_failed.contains(&TaskId::new("remux")));
    assert!(effect.newly_failed.contains(&TaskId::new("validate")));
}

#[test]
fn retry_with_attempts_left_returns_to_pending_without_propagation() {
    let mut mgr = DependencyManager::new();
    mgr.add_task(node("a", &[], Priority::Normal)).unwrap();
    let id = TaskId::new("a");
    mgr.mark_running(&id);
    let effect = mgr.mark_failed(&id, "transient", false);
    assert_eq!(mgr.get(&id).unwrap().task.status, DependencyStatus::Pending);
    assert!(effect.newly_failed.is_empty());
}

#[test]
fn caller_reported_exhaustion_propagates_on_the_first_failure() {
    let mut mgr = DependencyManager::new();
    mgr.add_task(node("metadata", &[], Priority::Normal)).unwrap();
    mgr.add_task(node("remux", &["metadata"], Priority::Normal)).unwrap();

    let id = TaskId::new("metadata");
    mgr.mark_running(&id);
    let effect = mgr.mark_failed(&id, "worker pool exhausted retries", true);

    assert_eq!(mgr.get(&id).unwrap().task.status, DependencyStatus::Failed);
    assert_eq!(effect.newly_failed, vec![TaskId::new("remux")]);
}

#[test]
fn ready_tasks_are_ordered_by_priority_then_creation_time() {
    let mut mgr = DependencyManager::new();
    mgr.add_task(node("low", &[], Priority::Low)).unwrap();
    mgr.add_task(node("critical", &[], Priority::Critical)).unwrap();
    mgr.add_task(node("normal", &[], Priority::Normal)).unwrap();
    let ready = mgr.get_ready_tasks();
    assert_eq!(ready, vec![TaskId::new("critical"), TaskId::new("normal"), TaskId::new("low")]);
}

#[test]
fn cancel_propagates_to_every_dependent() {
    let mut mgr = DependencyManager::new();
    mgr.add_task(node("a", &[], Priority::Normal)).unwrap();
    mgr.add_task(node("b", &["a"], Priority::Normal)).unwrap();
    mgr.add_task(node("c", &["b"], Priority::Normal)).unwrap();

    let effect = mgr.cancel(&TaskId::new("a"));
    assert_eq!(effect.newly_cancelled.len(), 3);
    assert_eq!(mgr.get(&TaskId::new("c")).unwrap().task.status, DependencyStatus::Cancelled);
}

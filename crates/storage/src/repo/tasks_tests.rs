use super::*;
use chrono::Utc;
use streamvault_core::RecordingId;

async fn test_gateway() -> Gateway {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for storage integration tests");
    let gateway = Gateway::connect(&url).await.expect("connect");
    gateway.migrate().await.expect("migrate");
    gateway
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn next_pending_respects_priority_then_fifo() {
    let gateway = test_gateway().await;
    let repo = QueueTaskRepo::new(&gateway);
    let queue_key = StreamId::new(1);
    let low = QueueTask {
        id: TaskId::generate(),
        payload: Payload::OrphanRecoveryCheck { stream_id: queue_key },
        priority: Priority::Low,
        status: QueueTaskStatus::Pending,
        attempts: 0,
        max_attempts: 5,
        created_at: Utc::now(),
        last_error: None,
    };
    let critical = QueueTask {
        priority: Priority::Critical,
        id: TaskId::generate(),
        ..low.clone()
    };
    repo.enqueue(&low, queue_key).await.unwrap();
    repo.enqueue(&critical, queue_key).await.unwrap();

    let next = repo.next_pending(queue_key).await.unwrap().unwrap();
    assert_eq!(next.id, critical.id);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn dependency_task_is_not_returned_once_completed() {
    let gateway = test_gateway().await;
    let repo = DependencyTaskRepo::new(&gateway);
    let task = DependencyTask {
        id: TaskId::generate(),
        payload: Payload::MetadataGeneration {
            recording_id: RecordingId::new(1),
        },
        depends_on: vec![],
        status: DependencyStatus::Pending,
        created_at: Utc::now(),
    };
    repo.insert(&task).await.unwrap();
    repo.update_status(&task.id, DependencyStatus::Completed).await.unwrap();

    let incomplete = repo.list_incomplete().await.unwrap();
    assert!(!incomplete.iter().any(|t| t.id == task.id));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn count_in_flight_and_list_stale_key_off_payload_task_type() {
    let gateway = test_gateway().await;
    let repo = QueueTaskRepo::new(&gateway);
    let queue_key = StreamId::new(2);
    let old_check = QueueTask {
        id: TaskId::generate(),
        payload: Payload::OrphanRecoveryCheck { stream_id: queue_key },
        priority: Priority::Low,
        status: QueueTaskStatus::Pending,
        attempts: 0,
        max_attempts: 3,
        created_at: Utc::now() - chrono::Duration::minutes(5),
        last_error: None,
    };
    repo.enqueue(&old_check, queue_key).await.unwrap();

    let count = repo.count_in_flight("OrphanRecoveryCheck").await.unwrap();
    assert!(count >= 1);

    let stale = repo.list_stale("OrphanRecoveryCheck", Utc::now() - chrono::Duration::minutes(2)).await.unwrap();
    assert!(stale.iter().any(|t| t.id == old_check.id));

    let too_recent = repo.list_stale("OrphanRecoveryCheck", Utc::now() - chrono::Duration::hours(1)).await.unwrap();
    assert!(!too_recent.iter().any(|t| t.id == old_check.id));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn list_by_queue_key_returns_every_status_for_that_stream_only() {
    let gateway = test_gateway().await;
    let repo = QueueTaskRepo::new(&gateway);
    let queue_key = StreamId::new(3);
    let other_key = StreamId::new(4);
    let mine = QueueTask {
        id: TaskId::generate(),
        payload: Payload::OrphanRecoveryCheck { stream_id: queue_key },
        priority: Priority::Low,
        status: QueueTaskStatus::Pending,
        attempts: 0,
        max_attempts: 3,
        created_at: Utc::now(),
        last_error: None,
    };
    let not_mine = QueueTask {
        id: TaskId::generate(),
        payload: Payload::OrphanRecoveryCheck { stream_id: other_key },
        ..mine.clone()
    };
    repo.enqueue(&mine, queue_key).await.unwrap();
    repo.enqueue(&not_mine, other_key).await.unwrap();

    let listed = repo.list_by_queue_key(queue_key).await.unwrap();
    assert!(listed.iter().any(|t| t.id == mine.id));
    assert!(!listed.iter().any(|t| t.id == not_mine.id));
}

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};
use streamvault_core::{FakeClock, Priority, RecordingId};

fn queue_task() -> QueueTask {
    QueueTask {
        id: streamvault_core::TaskId::generate(),
        payload: Payload::Cleanup {
            recording_id: RecordingId::new(1),
        },
        priority: Priority::Normal,
        status: QueueTaskStatus::Pending,
        attempts: 0,
        max_attempts: 3,
        created_at: chrono::Utc::now(),
        last_error: None,
    }
}

struct AlwaysSucceeds;

#[async_trait]
impl TaskHandler for AlwaysSucceeds {
    async fn execute(&self, _payload: &Payload, progress: &ProgressFn<'_>) -> Result<(), EngineError> {
        progress(100);
        Ok(())
    }
}

struct AlwaysFailsRetryable {
    calls: AtomicU32,
}

#[async_trait]
impl TaskHandler for AlwaysFailsRetryable {
    async fn execute(&self, _payload: &Payload, _progress: &ProgressFn<'_>) -> Result<(), EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EngineError::Io(std::io::Error::other("disk busy")))
    }
}

struct AlwaysFailsNonRetryable;

#[async_trait]
impl TaskHandler for AlwaysFailsNonRetryable {
    async fn execute(&self, _payload: &Payload, _progress: &ProgressFn<'_>) -> Result<(), EngineError> {
        Err(EngineError::InvalidDag("bad dag".to_string()))
    }
}

fn pool() -> WorkerPool<FakeClock> {
    WorkerPool::new(FakeClock::new(0), Arc::new(crate::progress::ProgressTracker::new(FakeClock::new(0))))
}

#[tokio::test]
async fn successful_handler_marks_task_completed() {
    let mut pool = pool();
    pool.register("cleanup", Arc::new(AlwaysSucceeds));
    let result = pool.execute(queue_task(), |_| {}).await;
    assert_eq!(result.status, QueueTaskStatus::Completed);
}

#[tokio::test]
async fn retryable_failure_is_retried_until_max_attempts() {
    let mut pool = pool();
    pool.register(
        "cleanup",
        Arc::new(AlwaysFailsRetryable {
            calls: AtomicU32::new(0),
        }),
    );
    let mut task = queue_task();
    task.max_attempts = 2;
    let result = pool.execute(task, |_| {}).await;
    assert_eq!(result.status, QueueTaskStatus::Failed);
    assert_eq!(result.attempts, 2);
}

#[tokio::test]
async fn non_retryable_failure_fails_on_first_attempt() {
    let mut pool = pool();
    pool.register("cleanup", Arc::new(AlwaysFailsNonRetryable));
    let result = pool.execute(queue_task(), |_| {}).await;
    assert_eq!(result.status, QueueTaskStatus::Failed);
    assert_eq!(result.attempts, 1);
}

#[tokio::test]
async fn completion_callback_always_fires() {
    let mut pool = pool();
    pool.register("cleanup", Arc::new(AlwaysFailsNonRetryable));
    let fired = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&fired);
    pool.execute(queue_task(), move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn backoff_delay_caps_at_sixty_seconds() {
    assert_eq!(WorkerPool::<FakeClock>::backoff_delay(0), Duration::from_secs(1));
    assert_eq!(WorkerPool::<FakeClock>::backoff_delay(10), Duration::from_secs(60));
}

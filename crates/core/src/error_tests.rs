use super::*;

#[test]
fn only_retryable_is_retryable() {
    assert!(Severity::Retryable.is_retryable());
    assert!(!Severity::NonRetryable.is_retryable());
    assert!(!Severity::RecoverableAtBoot.is_retryable());
    assert!(!Severity::OperatorVisible.is_retryable());
}

#[test]
fn failure_reason_carries_tag_and_message() {
    let fr = FailureReason::new("capture_tool_missing", "streamlink binary not found");
    assert_eq!(fr.tag, "capture_tool_missing");
    assert_eq!(fr.message, "streamlink binary not found");
}

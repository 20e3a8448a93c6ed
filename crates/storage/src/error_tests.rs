use super::*;

#[test]
fn not_found_and_constraint_are_non_retryable() {
    assert_eq!(StorageError::NotFound.severity(), Severity::NonRetryable);
    assert_eq!(
        StorageError::Constraint("unique_violation on streams.external_stream_id".into()).severity(),
        Severity::NonRetryable
    );
}

#[test]
fn row_not_found_from_the_driver_is_non_retryable() {
    let err = StorageError::Database(sqlx::Error::RowNotFound);
    assert_eq!(err.severity(), Severity::NonRetryable);
}

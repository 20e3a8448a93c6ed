use super::*;

fn token(expires_at: DateTime<Utc>) -> ShareToken {
    ShareToken {
        token: "abc123".into(),
        stream_id: StreamId::new(1),
        expires_at,
        created_at: Utc::now(),
    }
}

#[test]
fn valid_strictly_before_expiry() {
    let now = Utc::now();
    assert!(token(now + chrono::Duration::seconds(1)).is_valid(now));
    assert!(!token(now - chrono::Duration::seconds(1)).is_valid(now));
    assert!(!token(now).is_valid(now));
}

use super::*;
use chrono::Utc;

async fn test_gateway() -> Gateway {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for storage integration tests");
    let gateway = Gateway::connect(&url).await.expect("connect");
    gateway.migrate().await.expect("migrate");
    gateway
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn delete_expired_removes_only_lapsed_tokens() {
    let gateway = test_gateway().await;
    let repo = ShareTokenRepo::new(&gateway);
    let now = Utc::now();
    repo.insert(&ShareToken {
        token: "expired".into(),
        stream_id: StreamId::new(1),
        expires_at: now - chrono::Duration::seconds(1),
        created_at: now,
    })
    .await
    .unwrap();
    repo.insert(&ShareToken {
        token: "still-valid".into(),
        stream_id: StreamId::new(1),
        expires_at: now + chrono::Duration::hours(1),
        created_at: now,
    })
    .await
    .unwrap();

    let removed = repo.delete_expired(now).await.unwrap();
    assert_eq!(removed, 1);
    assert!(repo.get("still-valid").await.is_ok());
    assert!(repo.get("expired").await.is_err());
}

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
async fn delete_idle_removes_only_sessions_past_the_window() {
    let gateway = test_gateway().await;
    let repo = SessionRepo::new(&gateway);
    let now = Utc::now();

    repo.insert(&AuthSession {
        token: "stale".into(),
        user_id: "operator".into(),
        created_at: now - chrono::Duration::hours(48),
        last_seen_at: now - chrono::Duration::hours(25),
    })
    .await
    .unwrap();
    repo.insert(&AuthSession {
        token: "fresh".into(),
        user_id: "operator".into(),
        created_at: now,
        last_seen_at: now,
    })
    .await
    .unwrap();

    let removed = repo.delete_idle(now, chrono::Duration::hours(24)).await.unwrap();
    assert_eq!(removed, 1);
    assert!(repo.get("fresh").await.is_ok());
    assert!(repo.get("stale").await.is_err());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn touch_extends_last_seen_at() {
    let gateway = test_gateway().await;
    let repo = SessionRepo::new(&gateway);
    let now = Utc::now();
    repo.insert(&AuthSession {
        token: "tok".into(),
        user_id: "operator".into(),
        created_at: now,
        last_seen_at: now,
    })
    .await
    .unwrap();

    let later = now + chrono::Duration::minutes(10);
    repo.touch("tok", later).await.unwrap();

    let session = repo.get("tok").await.unwrap();
    assert_eq!(session.last_seen_at, later);
}

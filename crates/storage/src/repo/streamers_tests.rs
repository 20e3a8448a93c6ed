use super::*;

async fn test_gateway() -> Gateway {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for storage integration tests");
    let gateway = Gateway::connect(&url).await.expect("connect");
    gateway.migrate().await.expect("migrate");
    gateway
}

fn sample(external_id: &str) -> Streamer {
    Streamer::new(StreamerId::new(0), external_id, "shroud")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn upsert_then_get_roundtrips() {
    let gateway = test_gateway().await;
    let repo = StreamerRepo::new(&gateway);
    let mut streamer = sample("123456");
    streamer.id = StreamerId::new(1);
    repo.upsert(&streamer).await.unwrap();

    let fetched = repo.get(StreamerId::new(1)).await.unwrap();
    assert_eq!(fetched.username, "shroud");
    assert_eq!(fetched.external_id, "123456");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn get_missing_id_returns_not_found() {
    let gateway = test_gateway().await;
    let repo = StreamerRepo::new(&gateway);
    let err = repo.get(StreamerId::new(999_999)).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

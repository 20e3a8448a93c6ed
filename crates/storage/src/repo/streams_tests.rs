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
async fn insert_then_get_roundtrips() {
    let gateway = test_gateway().await;
    let streamer_repo = crate::repo::streamers::StreamerRepo::new(&gateway);
    let mut streamer = streamvault_core::Streamer::new(StreamerId::new(0), "123456", "shroud");
    let existing = streamer_repo.find_by_external_id("123456").await.unwrap();
    if existing.is_none() {
        streamer.id = StreamerId::new(1);
        streamer_repo.upsert(&streamer).await.unwrap();
    }

    let repo = StreamRepo::new(&gateway);
    let stream = Stream {
        id: StreamId::new(0),
        streamer_id: StreamerId::new(1),
        external_stream_id: Some("abc".into()),
        title: "late night coding".into(),
        category_name: None,
        language: Some("en".into()),
        started_at: Utc::now(),
        ended_at: None,
        episode_number: Some(1),
        recording_path: None,
    };
    let id = repo.insert(&stream).await.unwrap();
    let fetched = repo.get(id).await.unwrap();
    assert_eq!(fetched.title, "late night coding");
    assert!(fetched.is_live());
}

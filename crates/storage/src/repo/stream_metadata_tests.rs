use super::*;

async fn test_gateway() -> Gateway {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for storage integration tests");
    let gateway = Gateway::connect(&url).await.expect("connect");
    gateway.migrate().await.expect("migrate");
    gateway
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn upsert_then_get_roundtrips_segments_removed_flag() {
    let gateway = test_gateway().await;
    let repo = StreamMetadataRepo::new(&gateway);
    let stream_id = StreamId::new(1);
    let mut metadata = StreamMetadata::empty(stream_id);
    metadata.segments_removed = true;
    repo.upsert(&metadata).await.unwrap();

    let fetched = repo.get(stream_id).await.unwrap();
    assert!(fetched.segments_removed);
}

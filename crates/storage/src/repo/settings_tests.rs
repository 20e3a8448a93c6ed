use super::*;

async fn test_gateway() -> Gateway {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for storage integration tests");
    let gateway = Gateway::connect(&url).await.expect("connect");
    gateway.migrate().await.expect("migrate");
    gateway
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn bootstrap_is_idempotent() {
    let gateway = test_gateway().await;
    let repo = SettingsRepo::new(&gateway);

    repo.bootstrap("first-key", "best").await.unwrap();
    repo.bootstrap("second-key", "worst").await.unwrap();

    let settings = repo.get_global().await.unwrap().unwrap();
    assert_eq!(settings.encryption_key, "first-key");
    assert_eq!(settings.default_quality, "best");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn upsert_streamer_overwrites_existing_row() {
    let gateway = test_gateway().await;
    let repo = SettingsRepo::new(&gateway);
    let streamer_id = StreamerId::new(1);

    repo.upsert_streamer(&StreamerRecordingSettings {
        streamer_id,
        quality: Some("best".into()),
        auto_record: true,
        priority: None,
    })
    .await
    .unwrap();
    repo.upsert_streamer(&StreamerRecordingSettings {
        streamer_id,
        quality: Some("720p".into()),
        auto_record: false,
        priority: Some(5),
    })
    .await
    .unwrap();

    let settings = repo.get_streamer(streamer_id).await.unwrap().unwrap();
    assert_eq!(settings.quality.as_deref(), Some("720p"));
    assert!(!settings.auto_record);
    assert_eq!(settings.priority, Some(5));
}

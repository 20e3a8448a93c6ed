use super::*;

fn sample(ended_at: Option<DateTime<Utc>>) -> Stream {
    Stream {
        id: StreamId::new(1),
        streamer_id: StreamerId::new(1),
        external_stream_id: Some("abc".into()),
        title: "late night coding".into(),
        category_name: Some("Software and Game Development".into()),
        language: Some("en".into()),
        started_at: Utc::now(),
        ended_at,
        episode_number: Some(3),
        recording_path: None,
    }
}

#[test]
fn is_live_iff_no_end_time() {
    assert!(sample(None).is_live());
    assert!(!sample(Some(Utc::now())).is_live());
}

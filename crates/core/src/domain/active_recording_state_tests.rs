use super::*;

fn sample(last_heartbeat: DateTime<Utc>) -> ActiveRecordingState {
    ActiveRecordingState {
        stream_id: StreamId::new(1),
        recording_id: RecordingId::new(1),
        os_pid: 4242,
        process_identifier: "capture-4242".into(),
        streamer_name: "shroud".into(),
        started_at: last_heartbeat,
        ts_output_path: "/data/shroud/2026-07/shroud_2026-07-28.ts".into(),
        forced: false,
        quality: "best".into(),
        status: ActiveRecordingStatus::Active,
        last_heartbeat,
        config: serde_json::json!({}),
    }
}

#[test]
fn stale_when_heartbeat_older_than_grace() {
    let now = Utc::now();
    let state = sample(now - chrono::Duration::seconds(30));
    assert!(state.is_stale(now, chrono::Duration::seconds(15)));
    assert!(!state.is_stale(now, chrono::Duration::seconds(60)));
}

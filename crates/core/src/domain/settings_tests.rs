use super::*;

#[test]
fn proxy_settings_default_to_unset() {
    let proxy = ProxySettings::default();
    assert!(proxy.http_proxy.is_none());
    assert!(proxy.https_proxy.is_none());
}

#[test]
fn streamer_settings_carry_optional_overrides() {
    let settings = StreamerRecordingSettings {
        streamer_id: StreamerId::new(1),
        quality: None,
        auto_record: true,
        priority: None,
    };
    assert!(settings.auto_record);
    assert!(settings.quality.is_none());
}

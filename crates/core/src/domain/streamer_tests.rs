use super::*;

#[test]
fn new_defaults_display_name_to_username_and_is_offline() {
    let s = Streamer::new(StreamerId::new(1), "123456", "shroud");
    assert_eq!(s.display_name, "shroud");
    assert!(!s.is_live);
    assert!(!s.is_test_data);
    assert!(s.category_name.is_none());
}

use super::*;

#[test]
fn process_id_for_stream_matches_the_documented_convention() {
    assert_eq!(ProcessId::for_stream(42).0, "stream_42");
}

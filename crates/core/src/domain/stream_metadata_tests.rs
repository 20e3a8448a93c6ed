use super::*;

#[test]
fn empty_has_no_paths_and_segments_not_removed() {
    let m = StreamMetadata::empty(StreamId::new(1));
    assert!(m.vtt_path.is_none());
    assert!(m.nfo_path.is_none());
    assert!(!m.segments_removed);
}

use super::*;
use chrono::TimeZone;

fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 20, 0, 0).unwrap()
}

#[test]
fn builds_season_directory_and_base_name() {
    let paths = RecordingPaths::build(Path::new("/rec"), "alice", "Hello", ts(2025, 2, 3), 1);
    assert_eq!(
        paths.ts_path(),
        Path::new("/rec/alice/Season 2025-02/alice - S202502E01 - Hello.ts")
    );
    assert_eq!(
        paths.mp4_path(),
        Path::new("/rec/alice/Season 2025-02/alice - S202502E01 - Hello.mp4")
    );
}

#[test]
fn sanitizes_unsafe_characters_in_components() {
    let paths = RecordingPaths::build(Path::new("/rec"), "al/ice", "Ti:tle", ts(2025, 2, 3), 2);
    let ts_path = paths.ts_path().to_string_lossy().to_string();
    assert!(!ts_path.contains('/') || ts_path.starts_with("/rec/"));
    assert!(ts_path.contains("al_ice"));
    assert!(ts_path.contains("Ti_tle"));
}

#[test]
fn episode_number_is_zero_padded() {
    let paths = RecordingPaths::build(Path::new("/rec"), "alice", "X", ts(2025, 12, 1), 9);
    assert!(paths.mp4_path().to_string_lossy().contains("E09"));
}

#[test]
fn segment_part_number_parses_zero_padded_suffix() {
    assert_eq!(segment_part_number("show_part001.ts"), Some(1));
    assert_eq!(segment_part_number("show_part012.ts"), Some(12));
    assert_eq!(segment_part_number("show.ts"), None);
}

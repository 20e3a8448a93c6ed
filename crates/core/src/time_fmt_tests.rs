use super::*;

#[test]
fn formats_seconds() {
    assert_eq!(format_elapsed(5), "5s");
    assert_eq!(format_elapsed(59), "59s");
}

#[test]
fn formats_minutes() {
    assert_eq!(format_elapsed(120), "2m");
}

#[test]
fn formats_hours_with_and_without_minutes() {
    assert_eq!(format_elapsed(3600), "1h");
    assert_eq!(format_elapsed(3600 + 30 * 60), "1h30m");
}

#[test]
fn formats_days() {
    assert_eq!(format_elapsed(3 * 86400), "3d");
}

#[test]
fn formats_milliseconds() {
    assert_eq!(format_elapsed_ms(90_000), "1m");
}

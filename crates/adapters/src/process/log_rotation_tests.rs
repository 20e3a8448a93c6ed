use super::*;
use tempfile::tempdir;

#[test]
fn rotates_once_max_bytes_exceeded() {
    let dir = tempdir().unwrap();
    let mut writer = RotatingLogWriter::open_with_limits(dir.path(), "alice", 20, 3).unwrap();
    for _ in 0..5 {
        writer.write_line("0123456789").unwrap();
    }
    assert!(dir.path().join("alice.log").exists());
    assert!(dir.path().join("alice.log.1").exists());
}

#[test]
fn keeps_at_most_max_files_generations() {
    let dir = tempdir().unwrap();
    let mut writer = RotatingLogWriter::open_with_limits(dir.path(), "alice", 5, 2).unwrap();
    for _ in 0..20 {
        writer.write_line("0123456789").unwrap();
    }
    assert!(!dir.path().join("alice.log.3").exists());
}

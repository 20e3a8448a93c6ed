use super::*;

#[test]
fn defaults_apply_when_env_unset() {
    std::env::remove_var("STREAMVAULT_CAPTURE_TERM_GRACE_MS");
    assert_eq!(capture_termination_grace(), Duration::from_secs(15));
}

use super::*;

#[test]
fn strips_traversal_and_separators() {
    assert_eq!(sanitize_component("../../etc/passwd"), "etcpasswd");
    assert_eq!(sanitize_component("a/b\\c"), "a_b_c");
}

#[test]
fn strips_control_chars_and_reserved_chars() {
    let input = "title\n\twith:bad*chars?\"<>|";
    let out = sanitize_component(input);
    assert!(!out.contains(['\n', '\t', ':', '*', '?', '"', '<', '>', '|']));
}

#[test]
fn empty_after_sanitization_falls_back_to_placeholder() {
    assert_eq!(sanitize_component("///"), "_");
    assert_eq!(sanitize_component("   "), "_");
}

#[test]
fn truncates_to_200_bytes_on_a_char_boundary() {
    let long = "a".repeat(500);
    let out = sanitize_component(&long);
    assert_eq!(out.len(), 200);

    let long_multibyte = "é".repeat(250); // 2 bytes each -> 500 bytes
    let out2 = sanitize_component(&long_multibyte);
    assert!(out2.len() <= 200);
    assert!(out2.is_char_boundary(out2.len()));
}

#[test]
fn prefers_mp4_over_ts() {
    assert_eq!(preferred_extension(&["ts", "mp4"]), Some("mp4"));
    assert_eq!(preferred_extension(&["ts"]), Some("ts"));
    assert_eq!(preferred_extension(&[]), None);
}

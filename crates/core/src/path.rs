// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem-safe path handling (C1; REDESIGN FLAG: "Cross-process path
//! handling mixes OS conventions").
//!
//! The recordings root is treated as a typed filesystem container: every
//! component derived from user/operator/platform-supplied strings
//! (streamer username, stream title) is sanitized before being used to
//! build a path. Components are never concatenated unsanitized.

const MAX_COMPONENT_BYTES: usize = 200;

/// Strip control characters, path separators, and `..` traversal segments
/// from a single path component, then length-limit it to 200 bytes
/// (truncating on a UTF-8 boundary).
///
/// This is applied to every user/platform-supplied string that ends up in a
/// filename or directory name (streamer username, stream title) — never to
/// a path as a whole, since a legitimate path contains directory
/// separators this function would otherwise strip.
pub fn sanitize_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_control() {
            continue;
        }
        match c {
            '/' | '\\' => out.push('_'),
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => out.push('_'),
            _ => out.push(c),
        }
    }

    // Collapse any traversal sequences left behind by the separator
    // substitution above (e.g. ".._.." can't reintroduce a real `..`
    // component since separators are gone, but a literal ".." textual run
    // is still stripped defensively).
    let out = out.replace("..", "");

    let trimmed = out.trim();
    if trimmed.is_empty() {
        return "_".to_string();
    }

    truncate_to_byte_limit(trimmed, MAX_COMPONENT_BYTES)
}

fn truncate_to_byte_limit(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

/// Known video container extensions, ordered by the §4.7 tie-break
/// preference: prefer `.mp4` over `.ts` when both are present.
pub const VIDEO_EXTENSION_PREFERENCE: &[&str] = &["mp4", "ts"];

/// Given a set of candidate extensions found on disk for a base filename,
/// pick the one the media server should be pointed at per §4.7's
/// path-resolution tie-break rule.
pub fn preferred_extension<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    for pref in VIDEO_EXTENSION_PREFERENCE {
        if let Some(found) = candidates.iter().find(|c| c.eq_ignore_ascii_case(pref)) {
            return Some(found);
        }
    }
    candidates.first().copied()
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;

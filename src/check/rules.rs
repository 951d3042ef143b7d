// SPDX-License-Identifier: PMPL-1.0-or-later

//! String-level consistency rules
//!
//! Each rule compares one source text with one translated form and
//! returns a description of the mismatch, or `None` when they agree.

use crate::placeholder::{has_count_marker, positional_numbers};
use regex::Regex;
use std::sync::OnceLock;

static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();

/// Count keyboard accelerators (`&File`). `&&` is a literal ampersand and
/// HTML entities such as `&nbsp;` are not accelerators.
pub fn count_accelerators(text: &str) -> usize {
    let regex = ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#x[0-9A-Fa-f]+);").unwrap()
    });
    let stripped = regex.replace_all(text, "");

    let mut count = 0;
    let mut chars = stripped.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            continue;
        }
        match chars.peek() {
            Some('&') => {
                chars.next();
            }
            Some(next) if next.is_alphanumeric() => count += 1,
            _ => {}
        }
    }
    count
}

pub fn accelerator_mismatch(source: &str, translation: &str) -> Option<String> {
    let in_source = count_accelerators(source) > 0;
    let in_translation = count_accelerators(translation) > 0;
    match (in_source, in_translation) {
        (true, false) => Some("accelerator possibly missing in translation".to_string()),
        (false, true) => Some("accelerator possibly superfluous in translation".to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Period,
    Question,
    Exclamation,
    Colon,
    Semicolon,
    Ellipsis,
}

/// Ending punctuation class, treating full-width and Arabic-script marks
/// as equivalent to their ASCII counterparts.
pub fn ending(text: &str) -> Option<Ending> {
    let trimmed = text.trim_end();
    if trimmed.ends_with("...") || trimmed.ends_with('…') {
        return Some(Ending::Ellipsis);
    }
    match trimmed.chars().last()? {
        '.' | '。' | '۔' => Some(Ending::Period),
        '?' | '？' | '؟' => Some(Ending::Question),
        '!' | '！' => Some(Ending::Exclamation),
        ':' | '：' => Some(Ending::Colon),
        ';' | '；' | '؛' => Some(Ending::Semicolon),
        _ => None,
    }
}

pub fn punctuation_mismatch(source: &str, translation: &str) -> Option<String> {
    let expected = ending(source);
    let actual = ending(translation);
    if expected == actual {
        return None;
    }
    Some(match (expected, actual) {
        (Some(e), None) => format!("translation does not end with {:?} like the source", e),
        (None, Some(a)) => format!("translation ends with {:?} but the source does not", a),
        (e, a) => format!("ending punctuation differs: source {:?}, translation {:?}", e, a),
    })
}

pub fn place_marker_mismatch(source: &str, translation: &str) -> Option<String> {
    let expected = positional_numbers(source);
    let actual = positional_numbers(translation);
    if expected == actual {
        return None;
    }
    let missing: Vec<String> = expected.difference(&actual).map(|n| format!("%{}", n)).collect();
    let extra: Vec<String> = actual.difference(&expected).map(|n| format!("%{}", n)).collect();
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing {}", missing.join(", ")));
    }
    if !extra.is_empty() {
        parts.push(format!("unexpected {}", extra.join(", ")));
    }
    Some(format!(
        "place markers differ from the source ({})",
        parts.join("; ")
    ))
}

pub fn count_marker_missing(source: &str, form: &str) -> bool {
    has_count_marker(source) && !has_count_marker(form)
}

fn leading_whitespace(text: &str) -> &str {
    let end = text.len() - text.trim_start().len();
    &text[..end]
}

fn trailing_whitespace(text: &str) -> &str {
    &text[text.trim_end().len()..]
}

pub fn whitespace_mismatch(source: &str, translation: &str) -> Option<String> {
    if leading_whitespace(source) != leading_whitespace(translation) {
        return Some("leading whitespace differs from the source".to_string());
    }
    if trailing_whitespace(source) != trailing_whitespace(translation) {
        return Some("trailing whitespace differs from the source".to_string());
    }
    None
}

// SPDX-License-Identifier: PMPL-1.0-or-later

//! Positional (`%1` .. `%99`) and count (`%n`) placeholders.
//!
//! Positional placeholders are numbered so a translation can reorder
//! them freely: the lowest number present receives the first argument,
//! the next lowest the second, and so on, no matter where they sit in
//! the string. An `L` between `%` and the number or `n` requests
//! locale-aware digit grouping.

use std::collections::BTreeSet;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Positional { number: u8, localized: bool },
    Count { localized: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub placeholder: Placeholder,
    pub span: Range<usize>,
}

/// Runtime value for a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Text(String),
    Int(i64),
}

impl Arg {
    fn render(&self, localized: bool, separator: char) -> String {
        match self {
            Arg::Text(text) => text.clone(),
            Arg::Int(value) if localized => group_digits(*value, separator),
            Arg::Int(value) => value.to_string(),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(i64::from(value))
    }
}

impl From<u32> for Arg {
    fn from(value: u32) -> Self {
        Arg::Int(i64::from(value))
    }
}

/// Find every placeholder in `text`, left to right.
pub fn scan(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let start = i;
        let mut j = i + 1;
        let localized = bytes.get(j) == Some(&b'L');
        if localized {
            j += 1;
        }
        match bytes.get(j) {
            Some(b'n') => {
                tokens.push(Token {
                    placeholder: Placeholder::Count { localized },
                    span: start..j + 1,
                });
                i = j + 1;
            }
            Some(d) if d.is_ascii_digit() && *d != b'0' => {
                let mut end = j + 1;
                if bytes.get(end).is_some_and(|b| b.is_ascii_digit()) {
                    end += 1;
                }
                // Two ASCII digits at most, so this parse cannot fail.
                let number = text[j..end].parse::<u8>().unwrap_or(0);
                tokens.push(Token {
                    placeholder: Placeholder::Positional { number, localized },
                    span: start..end,
                });
                i = end;
            }
            _ => i += 1,
        }
    }
    tokens
}

/// Distinct positional numbers used in `text`.
pub fn positional_numbers(text: &str) -> BTreeSet<u8> {
    scan(text)
        .into_iter()
        .filter_map(|t| match t.placeholder {
            Placeholder::Positional { number, .. } => Some(number),
            Placeholder::Count { .. } => None,
        })
        .collect()
}

pub fn has_count_marker(text: &str) -> bool {
    scan(text)
        .iter()
        .any(|t| matches!(t.placeholder, Placeholder::Count { .. }))
}

/// Replace `%n` with `n` and `%Ln` with `n` grouped by `separator`.
pub fn replace_count(text: &str, n: i64, separator: char) -> String {
    splice(text, |placeholder| match placeholder {
        Placeholder::Count { localized: false } => Some(n.to_string()),
        Placeholder::Count { localized: true } => Some(group_digits(n, separator)),
        Placeholder::Positional { .. } => None,
    })
}

/// Substitute positional placeholders in a single pass.
///
/// The i-th lowest placeholder number present receives `args[i]`.
/// Placeholders without a matching argument are kept as written and
/// surplus arguments are ignored. Substituted text is never rescanned.
pub fn substitute(text: &str, args: &[Arg], separator: char) -> String {
    let numbers: Vec<u8> = positional_numbers(text).into_iter().collect();
    splice(text, |placeholder| match placeholder {
        Placeholder::Positional { number, localized } => numbers
            .iter()
            .position(|&n| n == number)
            .and_then(|index| args.get(index))
            .map(|arg| arg.render(localized, separator)),
        Placeholder::Count { .. } => None,
    })
}

fn splice<F>(text: &str, mut replacement: F) -> String
where
    F: FnMut(Placeholder) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for token in scan(text) {
        if let Some(value) = replacement(token.placeholder) {
            out.push_str(&text[last..token.span.start]);
            out.push_str(&value);
            last = token.span.end;
        }
    }
    out.push_str(&text[last..]);
    out
}

/// Format an integer with a thousands separator.
pub fn group_digits(value: i64, separator: char) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

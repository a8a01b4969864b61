// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SQL text normalization
//!
//! Normalization drops comments, collapses whitespace outside quoted literals,
//! trims the text, drops trailing semicolons and removes stray `AND NULL`
//! tails left behind by string concatenation in the host code. The clean-ups are applied until the
//! text stops changing, so normalizing twice is the same as normalizing once.

use std::fmt;
use std::ops::Deref;

use crate::scanner::{Scanner, match_keyword_at};

/// Keywords that may follow a stray `AND NULL` which is then dropped
const STRAY_TAIL_FOLLOWERS: &[&str] = &["GROUP BY", "HAVING", "ORDER BY", "LIMIT", "OFFSET"];

/// SQL text that went through [`normalize`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedSql(String);

impl NormalizedSql {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for NormalizedSql {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedSql {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize SQL text (idempotent)
pub fn normalize(input: &str) -> String {
    let mut current = clean_step(input);
    loop {
        let next = clean_step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_step(input: &str) -> String {
    let collapsed = collapse_whitespace(input);
    let trimmed = strip_trailing_semicolons(&collapsed);
    match remove_stray_and_null(trimmed) {
        Some(cleaned) => cleaned,
        None => trimmed.to_string(),
    }
}

/// Collapse whitespace runs outside quotes into one space and trim
///
/// Comments count as whitespace and are dropped.
fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for sc in Scanner::new(input) {
        if sc.comment || (!sc.quoted && sc.ch.is_whitespace()) {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(sc.ch);
    }
    out
}

fn strip_trailing_semicolons(input: &str) -> &str {
    input.trim_end_matches(|c: char| c == ';' || c.is_whitespace())
}

/// Remove the first `AND NULL` that is followed by nothing, a closing
/// parenthesis or a clause keyword
fn remove_stray_and_null(input: &str) -> Option<String> {
    for sc in Scanner::new(input) {
        if !sc.is_code() {
            continue;
        }
        let Some(end) = match_keyword_at(input, sc.offset, "AND NULL") else {
            continue;
        };
        let rest = input[end..].trim_start();
        let is_tail = rest.is_empty()
            || rest.starts_with(')')
            || STRAY_TAIL_FOLLOWERS
                .iter()
                .any(|kw| match_keyword_at(rest, 0, kw).is_some());
        if is_tail {
            let head = input[..sc.offset].trim_end();
            let mut out = String::with_capacity(input.len());
            out.push_str(head);
            if !rest.is_empty() && !rest.starts_with(')') {
                out.push(' ');
            }
            out.push_str(rest);
            return Some(out);
        }
    }
    None
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # WHERE Condition Splitting
//!
//! Splits a WHERE body into an ordered list of [`Condition`]s at top-level
//! `AND`/`OR` boundaries, recording the operator that introduced each one.
//!
//! ## Split Points
//!
//! Only `AND`/`OR` outside quotes and at parenthesis depth 0 split. Two more
//! exceptions apply:
//!
//! - the `AND` of `BETWEEN x AND y`
//! - any `AND`/`OR` between `CASE` and its `END`
//!
//! ## Precedence
//!
//! Builder chains fold left: `where(a)->orWhere(b)->andWhere(c)` reads as
//! `(a OR b) AND c`, whereas SQL binds `AND` tighter than `OR`. After a split
//! every `AND` condition that follows an earlier `OR` is merged back into the
//! condition before it:
//!
//! ```text
//! a = 1 OR b = 2 AND c = 3
//! => [("a = 1", None), ("b = 2 AND c = 3", Some(Or))]
//! ```

use sql_fluent_ir::{Condition, LogicalOp};

use crate::normalize::normalize;
use crate::params::{ParameterCounter, renumber};
use crate::scanner::{Scanner, is_fully_parenthesized, match_keyword_at};

/// Split a WHERE body into conditions, renumbering its placeholders
pub fn split_where(where_text: &str, counter: &mut ParameterCounter) -> Vec<Condition> {
    let text = renumber(&normalize(where_text), counter);
    if text.is_empty() {
        return Vec::new();
    }
    if is_fully_parenthesized(&text) {
        return vec![Condition::first(text)];
    }

    let pieces = split_logical(&text);
    if pieces.len() < 2 {
        return vec![Condition::first(text)];
    }
    fold_precedence(pieces)
}

/// Raw split at top-level AND/OR
fn split_logical(text: &str) -> Vec<(Option<LogicalOp>, &str)> {
    let mut pieces = Vec::new();
    let mut operator = None;
    let mut start = 0;
    let mut case_depth = 0usize;
    let mut pending_between = false;
    let mut skip_until = 0;

    for sc in Scanner::new(text) {
        if sc.offset < skip_until || !sc.is_top_level() {
            continue;
        }

        if match_keyword_at(text, sc.offset, "CASE").is_some() {
            case_depth += 1;
            continue;
        }
        if case_depth > 0 {
            if match_keyword_at(text, sc.offset, "END").is_some() {
                case_depth -= 1;
            }
            continue;
        }
        if match_keyword_at(text, sc.offset, "BETWEEN").is_some() {
            pending_between = true;
            continue;
        }

        let (op, end) = if let Some(end) = match_keyword_at(text, sc.offset, "AND") {
            if pending_between {
                pending_between = false;
                continue;
            }
            (LogicalOp::And, end)
        } else if let Some(end) = match_keyword_at(text, sc.offset, "OR") {
            (LogicalOp::Or, end)
        } else {
            continue;
        };

        let piece = text[start..sc.offset].trim();
        if !piece.is_empty() {
            pieces.push((operator, piece));
        }
        operator = Some(op);
        start = end;
        skip_until = end;
    }

    let piece = text[start..].trim();
    if !piece.is_empty() {
        pieces.push((operator, piece));
    }

    // A leading operator without a left side is not a split point
    if let Some(first) = pieces.first_mut() {
        first.0 = None;
    }
    pieces
}

/// Merge every AND that follows an earlier OR into the previous condition
fn fold_precedence(pieces: Vec<(Option<LogicalOp>, &str)>) -> Vec<Condition> {
    let mut conditions: Vec<Condition> = Vec::with_capacity(pieces.len());
    let mut seen_or = false;

    for (operator, text) in pieces {
        match (operator, conditions.last_mut()) {
            (Some(LogicalOp::And), Some(last)) if seen_or => {
                last.text = format!("{} AND {}", last.text, text);
            }
            _ => {
                if operator == Some(LogicalOp::Or) {
                    seen_or = true;
                }
                conditions.push(Condition::new(text, operator));
            }
        }
    }
    conditions
}

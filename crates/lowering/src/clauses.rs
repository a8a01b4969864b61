// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Clause Extraction
//!
//! Slices normalized SQL into raw clause bodies. A clause body runs from its
//! keyword to the earliest top-level terminator keyword:
//!
//! ```text
//! SELECT a, b FROM users u WHERE u.id = ? ORDER BY a LIMIT 10
//!        ^^^^      ^^^^^^^       ^^^^^^^^          ^     ^^
//!       select       from         where          order  limit
//! ```
//!
//! Extractors return `None` when their keyword is absent. Bodies are raw text:
//! placeholders are renumbered later, in textual order, by the statement
//! lowering.

use sql_fluent_ir::{Bound, ParamRef};

use crate::scanner::{Scanner, find_keyword_span, match_keyword_at, split_top_level, tokens};

/// Keywords that end a FROM clause in a SELECT or DELETE
const FROM_TERMINATORS: &[&str] = &[
    "WHERE",
    "GROUP BY",
    "HAVING",
    "WINDOW",
    "ORDER BY",
    "LIMIT",
    "OFFSET",
    "UNION",
    "FOR UPDATE",
    "LOCK IN SHARE MODE",
];

const WHERE_TERMINATORS: &[&str] = &[
    "GROUP BY",
    "HAVING",
    "WINDOW",
    "ORDER BY",
    "LIMIT",
    "OFFSET",
    "UNION",
    "FOR UPDATE",
    "LOCK IN SHARE MODE",
];

const GROUP_BY_TERMINATORS: &[&str] = &[
    "HAVING",
    "WINDOW",
    "ORDER BY",
    "LIMIT",
    "OFFSET",
    "UNION",
    "FOR UPDATE",
    "LOCK IN SHARE MODE",
];

const HAVING_TERMINATORS: &[&str] = &[
    "WINDOW",
    "ORDER BY",
    "LIMIT",
    "OFFSET",
    "UNION",
    "FOR UPDATE",
    "LOCK IN SHARE MODE",
];

const ORDER_BY_TERMINATORS: &[&str] = &[
    "LIMIT",
    "OFFSET",
    "UNION",
    "FOR UPDATE",
    "LOCK IN SHARE MODE",
];

const LIMIT_TERMINATORS: &[&str] = &["OFFSET", "UNION", "FOR UPDATE", "LOCK IN SHARE MODE"];

const OFFSET_TERMINATORS: &[&str] = &["UNION", "FOR UPDATE", "LOCK IN SHARE MODE"];

/// Keywords that end the SELECT list when no FROM follows
const SELECT_LIST_TERMINATORS: &[&str] = &[
    "FROM", "WHERE", "GROUP BY", "HAVING", "ORDER BY", "LIMIT", "OFFSET", "UNION",
];

const SET_TERMINATORS: &[&str] = &["WHERE", "ORDER BY", "LIMIT"];

const INSERT_MODIFIERS: &[&str] = &["LOW_PRIORITY", "DELAYED", "HIGH_PRIORITY", "IGNORE"];
const UPDATE_MODIFIERS: &[&str] = &["LOW_PRIORITY", "IGNORE"];
const DELETE_MODIFIERS: &[&str] = &["LOW_PRIORITY", "QUICK", "IGNORE"];

/// Body between `keyword` and the earliest top-level terminator
///
/// The body is trimmed; an empty body is still `Some("")` so callers can tell
/// "keyword without content" from "no keyword".
pub fn clause_body<'a>(sql: &'a str, keyword: &str, terminators: &[&str]) -> Option<&'a str> {
    let (_, body_start) = find_keyword_span(sql, keyword, 0)?;
    let body_end = terminators
        .iter()
        .filter_map(|t| find_keyword_span(sql, t, body_start).map(|(start, _)| start))
        .min()
        .unwrap_or(sql.len());
    Some(sql[body_start..body_end].trim())
}

/// SELECT list, with a leading `DISTINCT`/`ALL` split off
///
/// Returns `(distinct, list)`.
pub fn extract_select_list(sql: &str) -> Option<(bool, &str)> {
    let body = clause_body(sql, "SELECT", SELECT_LIST_TERMINATORS)?;
    if let Some(end) = match_keyword_at(body, 0, "DISTINCT") {
        return Some((true, body[end..].trim()));
    }
    if let Some(end) = match_keyword_at(body, 0, "ALL") {
        return Some((false, body[end..].trim()));
    }
    Some((false, body))
}

/// FROM clause of a SELECT or DELETE, joins included
pub fn extract_from(sql: &str) -> Option<&str> {
    clause_body(sql, "FROM", FROM_TERMINATORS)
}

pub fn extract_where(sql: &str) -> Option<&str> {
    clause_body(sql, "WHERE", WHERE_TERMINATORS)
}

pub fn extract_group_by(sql: &str) -> Option<&str> {
    clause_body(sql, "GROUP BY", GROUP_BY_TERMINATORS)
}

pub fn extract_having(sql: &str) -> Option<&str> {
    clause_body(sql, "HAVING", HAVING_TERMINATORS)
}

pub fn extract_order_by(sql: &str) -> Option<&str> {
    clause_body(sql, "ORDER BY", ORDER_BY_TERMINATORS)
}

pub fn extract_limit(sql: &str) -> Option<&str> {
    clause_body(sql, "LIMIT", LIMIT_TERMINATORS)
}

pub fn extract_offset(sql: &str) -> Option<&str> {
    clause_body(sql, "OFFSET", OFFSET_TERMINATORS)
}

/// SET list of an UPDATE
pub fn extract_set(sql: &str) -> Option<&str> {
    clause_body(sql, "SET", SET_TERMINATORS)
}

/// Target of an UPDATE: table references between the modifiers and `SET`
pub fn extract_update_target(sql: &str) -> Option<&str> {
    let (_, after_update) = find_keyword_span(sql, "UPDATE", 0)?;
    let start = skip_modifiers(sql, after_update, UPDATE_MODIFIERS);
    let end = find_keyword_span(sql, "SET", start)
        .map(|(s, _)| s)
        .unwrap_or(sql.len());
    Some(sql[start..end].trim())
}

/// Byte offset after any run of `modifiers` starting at `from`
fn skip_modifiers(sql: &str, from: usize, modifiers: &[&str]) -> usize {
    let mut pos = from;
    loop {
        let rest = &sql[pos..];
        let at = pos + (rest.len() - rest.trim_start().len());
        match modifiers.iter().find_map(|m| match_keyword_at(sql, at, m)) {
            Some(end) => pos = end,
            None => return pos,
        }
    }
}

/// Where the values of an INSERT come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertBody<'a> {
    /// Text after `VALUES`/`VALUE`
    Values(&'a str),
    /// Text after `SET`
    Set(&'a str),
    /// `SELECT ...` source, keyword included
    Select(&'a str),
    /// Nothing recognizable after the target
    Missing,
}

/// Structural pieces of an INSERT statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertParts<'a> {
    pub table: &'a str,
    /// Column list including its parentheses
    pub columns: Option<&'a str>,
    pub body: InsertBody<'a>,
}

/// Split `INSERT [modifiers] [INTO] table [(cols)] {VALUES|SET|SELECT} ...`
pub fn extract_insert(sql: &str) -> Option<InsertParts<'_>> {
    let (_, after_insert) = find_keyword_span(sql, "INSERT", 0)?;
    let mut pos = skip_modifiers(sql, after_insert, INSERT_MODIFIERS);
    pos = skip_modifiers(sql, pos, &["INTO"]);

    let rest = sql[pos..].trim_start();
    let table_len = identifier_len(rest);
    if table_len == 0 {
        return None;
    }
    let table = &rest[..table_len];
    let mut rest = rest[table_len..].trim_start();

    let mut columns = None;
    if rest.starts_with('(') && match_keyword_at(rest[1..].trim_start(), 0, "SELECT").is_none() {
        let close = closing_paren(rest)?;
        columns = Some(&rest[..=close]);
        rest = rest[close + 1..].trim_start();
    }

    let body = if let Some(end) = match_keyword_at(rest, 0, "VALUES")
        .or_else(|| match_keyword_at(rest, 0, "VALUE"))
    {
        InsertBody::Values(rest[end..].trim())
    } else if let Some(end) = match_keyword_at(rest, 0, "SET") {
        InsertBody::Set(rest[end..].trim())
    } else if match_keyword_at(rest, 0, "SELECT").is_some()
        || (rest.starts_with('(') && match_keyword_at(rest[1..].trim_start(), 0, "SELECT").is_some())
    {
        InsertBody::Select(rest)
    } else {
        InsertBody::Missing
    };

    Some(InsertParts {
        table,
        columns,
        body,
    })
}

/// Structural pieces of a DELETE statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteParts<'a> {
    /// Tables named between `DELETE` and `FROM` (multi-table form)
    pub targets: Vec<String>,
    /// FROM clause body, joins included
    pub from: Option<&'a str>,
}

/// Split `DELETE [modifiers] [targets] FROM ...`
pub fn extract_delete(sql: &str) -> Option<DeleteParts<'_>> {
    let (_, after_delete) = find_keyword_span(sql, "DELETE", 0)?;
    let start = skip_modifiers(sql, after_delete, DELETE_MODIFIERS);
    let from_start = find_keyword_span(sql, "FROM", start).map(|(s, _)| s);

    let targets = match from_start {
        Some(s) => split_top_level(&sql[start..s], ','),
        None => Vec::new(),
    };
    let from = from_start.and_then(|_| clause_body(sql, "FROM", FROM_TERMINATORS));

    Some(DeleteParts { targets, from })
}

/// Parse a LIMIT/OFFSET value: digits or a single renumbered placeholder
pub fn parse_bound(text: &str) -> Option<Bound> {
    let text = text.trim();
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().ok().map(Bound::Literal);
    }
    ParamRef::parse(text).map(Bound::Param)
}

/// Split a renumbered LIMIT body into `(offset, count)`
///
/// Handles both `LIMIT count` and the MySQL `LIMIT offset, count` form. `None`
/// means the body was not understood.
pub fn parse_limit(text: &str) -> Option<(Option<Bound>, Bound)> {
    let parts = split_top_level(text, ',');
    match parts.as_slice() {
        [count] => Some((None, parse_bound(count)?)),
        [offset, count] => Some((Some(parse_bound(offset)?), parse_bound(count)?)),
        _ => None,
    }
}

/// Length of the identifier at the start of `text`
///
/// Stops at top-level whitespace or an opening parenthesis.
fn identifier_len(text: &str) -> usize {
    Scanner::new(text)
        .find(|sc| sc.is_code() && (sc.ch.is_whitespace() || sc.ch == '(' || sc.ch == ')'))
        .map(|sc| sc.offset)
        .unwrap_or(text.len())
}

/// Offset of the parenthesis closing the group `text` starts with
fn closing_paren(text: &str) -> Option<usize> {
    Scanner::new(text)
        .skip(1)
        .find(|sc| sc.ch == ')' && sc.is_top_level())
        .map(|sc| sc.offset)
}

/// First whitespace-separated token, upper-cased
pub fn leading_keyword(sql: &str) -> String {
    tokens(sql)
        .first()
        .map(|t| {
            t.chars()
                .take_while(|c| c.is_ascii_alphabetic() || *c == '_')
                .collect::<String>()
                .to_ascii_uppercase()
        })
        .unwrap_or_default()
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Table and Join Resolution
//!
//! Turns FROM/target text into a main [`TableRef`] and ordered
//! [`JoinDescriptor`]s.
//!
//! ## Join Segments
//!
//! A FROM clause is cut at every top-level `JOIN` keyword. The qualifier words
//! in front of it (`LEFT`, `INNER`, `OUTER`, ...) belong to the join:
//!
//! ```text
//! posts p INNER JOIN users u ON p.user_id = u.id LEFT JOIN tags t ON t.pid = p.id
//! ^^^^^^^ ^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^^ ^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^
//!  main    introducer          body               introducer        body
//! ```
//!
//! The main-table fragment ends where the first introducer starts, so a join
//! keyword can never be taken as the main table's alias. The reserved-word
//! denylist guards the remaining cases (`users WHERE`, `users JOIN`).

use sql_fluent_ir::{JoinDescriptor, JoinKind, TableRef};

use crate::config::ReservedWords;
use crate::error::{LoweringError, LoweringResult};
use crate::scanner::{
    Scanner, find_keyword_span, find_top_level, match_keyword_at, split_top_level, tokens,
};

/// Words that may precede `JOIN` as part of the join type
const JOIN_QUALIFIERS: &[&str] = &["INNER", "LEFT", "RIGHT", "OUTER", "CROSS", "FULL", "NATURAL"];

/// Construct name for comma-separated tables combined with JOIN
pub const MIXED_JOIN_SYNTAX: &str = "comma-separated tables mixed with JOIN";

/// Words opening a MySQL index hint (`USE INDEX (...)`)
const INDEX_HINTS: &[&str] = &["USE", "FORCE", "IGNORE"];

/// One `<introducer> JOIN <body>` piece of a FROM clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSegment<'a> {
    /// Upper-cased qualifier words (`LEFT OUTER`), empty for a plain `JOIN`
    pub qualifiers: Vec<String>,
    /// Text between the join keyword and `ON`/`USING`
    pub table_fragment: &'a str,
    /// Text after `ON`
    pub condition: Option<&'a str>,
    /// `USING (...)` was written instead of `ON`
    pub using: bool,
}

impl JoinSegment<'_> {
    pub fn is_natural(&self) -> bool {
        self.qualifiers.iter().any(|q| q == "NATURAL")
    }
}

/// Split an identifier into its dotted segments with quoting removed
///
/// `` `shop`.`orders` `` becomes `["shop", "orders"]`; a dot inside a quoted
/// segment is kept.
pub fn identifier_segments(ident: &str) -> Vec<String> {
    split_top_level(ident.trim(), '.')
        .into_iter()
        .map(|seg| strip_identifier_quotes(&seg).to_string())
        .collect()
}

/// Identifier with quoting stripped per dotted segment
pub fn normalize_identifier(ident: &str) -> String {
    identifier_segments(ident).join(".")
}

fn strip_identifier_quotes(segment: &str) -> &str {
    let segment = segment.trim();
    for quote in ['`', '"'] {
        if segment.len() >= 2 && segment.starts_with(quote) && segment.ends_with(quote) {
            return &segment[1..segment.len() - 1];
        }
    }
    segment
}

/// A table reference and the tokens written after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFragment<'a> {
    pub table: TableRef,
    /// Tokens after `identifier [[AS] alias]`, such as index hints
    pub trailing: Vec<&'a str>,
}

impl TableFragment<'_> {
    /// Check what follows the table reference
    ///
    /// Index hints and partition selection are declined. Any other leftover
    /// text is returned as a recoverable error for the caller to record.
    pub fn check_trailing(&self, clause: &str) -> LoweringResult<Option<LoweringError>> {
        let Some(first) = self.trailing.first() else {
            return Ok(None);
        };
        let upper = first.to_ascii_uppercase();
        if INDEX_HINTS.contains(&upper.as_str()) {
            return Err(LoweringError::unsupported("index hint", clause));
        }
        if upper == "PARTITION" || upper.starts_with("PARTITION(") {
            return Err(LoweringError::unsupported("PARTITION selection", clause));
        }
        Ok(Some(LoweringError::malformed(
            clause,
            self.trailing.join(" "),
            "unexpected text after table reference",
        )))
    }
}

/// Parse `identifier [[AS] alias]` and keep whatever follows
///
/// The alias is accepted only when present and not a reserved word. `None`
/// means the fragment does not start with a plain table identifier (empty,
/// derived table, function call).
pub fn parse_table_fragment<'a>(fragment: &'a str, reserved: &ReservedWords) -> Option<TableFragment<'a>> {
    let toks = tokens(fragment);
    let (&name, rest) = toks.split_first()?;
    if name.contains('(') || name.starts_with('\'') {
        return None;
    }

    let table = TableRef::new(normalize_identifier(name));
    let (alias, consumed) = match rest {
        [kw, alias, ..] if kw.eq_ignore_ascii_case("AS") => (Some(*alias), 2),
        [alias, ..] if !alias.eq_ignore_ascii_case("AS") => (Some(*alias), 1),
        _ => (None, 0),
    };

    let (table, consumed) = match alias.map(normalize_identifier) {
        Some(alias) if !alias.is_empty() && !reserved.contains(&alias) && !alias.contains('(') => {
            (table.with_alias(alias), consumed)
        }
        _ => (table, 0),
    };
    Some(TableFragment {
        table,
        trailing: rest[consumed..].to_vec(),
    })
}

/// Parse `identifier [[AS] alias]`, ignoring anything after it
pub fn parse_table_with_alias(fragment: &str, reserved: &ReservedWords) -> Option<TableRef> {
    parse_table_fragment(fragment, reserved).map(|parsed| parsed.table)
}

/// Start offset of the join introducer whose `JOIN` keyword starts at `join_at`
fn introducer_start(text: &str, join_at: usize) -> (usize, Vec<String>) {
    let mut start = join_at;
    let mut qualifiers = Vec::new();
    loop {
        let head = text[..start].trim_end();
        let Some(word) = head.split_whitespace().next_back() else {
            break;
        };
        let upper = word.to_ascii_uppercase();
        if !JOIN_QUALIFIERS.contains(&upper.as_str()) {
            break;
        }
        start = head.len() - word.len();
        qualifiers.insert(0, upper);
    }
    (start, qualifiers)
}

/// Top-level `JOIN`/`STRAIGHT_JOIN` keywords as `(introducer_start, body_start, qualifiers)`
fn join_introducers(text: &str) -> Vec<(usize, usize, Vec<String>)> {
    let mut found = Vec::new();
    for sc in Scanner::new(text).filter(|sc| sc.is_top_level()) {
        if let Some(end) = match_keyword_at(text, sc.offset, "JOIN") {
            let (start, qualifiers) = introducer_start(text, sc.offset);
            found.push((start, end, qualifiers));
        } else if let Some(end) = match_keyword_at(text, sc.offset, "STRAIGHT_JOIN") {
            found.push((sc.offset, end, Vec::new()));
        }
    }
    found
}

/// Main-table part of a FROM clause, before the first join
pub fn main_table_fragment(from_text: &str) -> &str {
    match join_introducers(from_text).first() {
        Some((start, _, _)) => from_text[..*start].trim(),
        None => from_text.trim(),
    }
}

/// Cut a FROM clause into join segments, in source order
pub fn scan_joins(from_text: &str) -> Vec<JoinSegment<'_>> {
    let introducers = join_introducers(from_text);
    let mut segments = Vec::with_capacity(introducers.len());

    for (i, (_, body_start, qualifiers)) in introducers.iter().enumerate() {
        let body_end = introducers
            .get(i + 1)
            .map(|(next_start, _, _)| *next_start)
            .unwrap_or(from_text.len());
        let body = &from_text[*body_start..body_end];

        let on = find_keyword_span(body, "ON", 0);
        let using = find_keyword_span(body, "USING", 0);
        let table_end = [on, using]
            .iter()
            .flatten()
            .map(|(start, _)| *start)
            .min()
            .unwrap_or(body.len());

        segments.push(JoinSegment {
            qualifiers: qualifiers.clone(),
            table_fragment: body[..table_end].trim(),
            condition: on.map(|(_, end)| body[end..].trim()),
            using: using.is_some(),
        });
    }
    segments
}

/// Join kind from the qualifier words in front of `JOIN`
pub fn join_kind(qualifiers: &[String]) -> JoinKind {
    let has = |word: &str| qualifiers.iter().any(|q| q == word);
    if has("LEFT") {
        JoinKind::Left
    } else if has("RIGHT") {
        JoinKind::Right
    } else if has("INNER") {
        JoinKind::Inner
    } else if has("CROSS") {
        JoinKind::Cross
    } else if has("OUTER") || has("FULL") {
        JoinKind::Outer
    } else {
        JoinKind::Plain
    }
}

/// Joins of a FROM clause plus the recoverable problems found in them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedJoins {
    pub joins: Vec<JoinDescriptor>,
    pub errors: Vec<LoweringError>,
}

/// Resolve every join of a (renumbered) FROM clause
///
/// Declines `NATURAL` joins, `USING` joins, derived tables and index hints,
/// none of which the builder's join methods can express.
pub fn parse_joins(from_text: &str, reserved: &ReservedWords) -> LoweringResult<ParsedJoins> {
    let mut parsed = ParsedJoins::default();
    for segment in scan_joins(from_text) {
        if segment.is_natural() {
            return Err(LoweringError::unsupported("NATURAL JOIN", "FROM clause"));
        }
        if segment.using {
            return Err(LoweringError::unsupported("JOIN ... USING", "FROM clause"));
        }
        if segment.table_fragment.starts_with('(') {
            return Err(LoweringError::unsupported("derived table", "JOIN"));
        }
        // `a JOIN b ON ..., c` would glue `c` onto the join
        if [Some(segment.table_fragment), segment.condition]
            .into_iter()
            .flatten()
            .any(|text| find_top_level(text, ',').is_some())
        {
            return Err(LoweringError::unsupported(MIXED_JOIN_SYNTAX, "FROM clause"));
        }
        let fragment = parse_table_fragment(segment.table_fragment, reserved).ok_or_else(|| {
            LoweringError::malformed("JOIN", segment.table_fragment, "expected a table name")
        })?;
        parsed.errors.extend(fragment.check_trailing("JOIN")?);
        parsed.joins.push(JoinDescriptor {
            kind: join_kind(&segment.qualifiers),
            table: fragment.table,
            condition: segment.condition.filter(|c| !c.is_empty()).map(str::to_string),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> ReservedWords {
        ReservedWords::default()
    }

    #[test]
    fn test_parse_table_with_alias() {
        let t = parse_table_with_alias("users", &words()).unwrap();
        assert_eq!(t.table, "users");
        assert!(!t.has_explicit_alias);

        let t = parse_table_with_alias("users u", &words()).unwrap();
        assert_eq!(t.alias.as_deref(), Some("u"));
        assert!(t.has_explicit_alias);

        let t = parse_table_with_alias("users AS u", &words()).unwrap();
        assert_eq!(t.alias.as_deref(), Some("u"));
    }

    #[test]
    fn test_reserved_word_never_alias() {
        for fragment in ["users JOIN", "users WHERE", "users SET", "users INNER", "users as where"] {
            let t = parse_table_with_alias(fragment, &words()).unwrap();
            assert_eq!(t.table, "users");
            assert_eq!(t.alias, None, "fragment {:?}", fragment);
        }
    }

    #[test]
    fn test_quoted_identifiers() {
        let t = parse_table_with_alias("`shop`.`orders` `o`", &words()).unwrap();
        assert_eq!(t.table, "shop.orders");
        assert_eq!(t.alias.as_deref(), Some("o"));
        assert_eq!(normalize_identifier("\"public\".\"users\""), "public.users");
        assert_eq!(normalize_identifier("`odd.name`"), "odd.name");
    }

    #[test]
    fn test_trailing_tokens_kept() {
        let parsed = parse_table_fragment("users u FORCE INDEX (idx_name)", &words()).unwrap();
        assert_eq!(parsed.table.alias.as_deref(), Some("u"));
        assert_eq!(parsed.trailing, vec!["FORCE", "INDEX", "(idx_name)"]);

        let parsed = parse_table_fragment("users USE INDEX (a)", &words()).unwrap();
        assert_eq!(parsed.table.alias, None);
        assert_eq!(parsed.trailing, vec!["USE", "INDEX", "(a)"]);

        let parsed = parse_table_fragment("users AS u", &words()).unwrap();
        assert!(parsed.trailing.is_empty());
    }

    #[test]
    fn test_check_trailing() {
        let check = |fragment: &str| {
            parse_table_fragment(fragment, &words())
                .unwrap()
                .check_trailing("FROM clause")
        };
        assert!(matches!(check("users u"), Ok(None)));
        for hinted in [
            "users u FORCE INDEX (idx)",
            "users IGNORE KEY (idx)",
            "users u USE INDEX FOR JOIN (idx)",
            "users PARTITION (p0)",
        ] {
            assert!(
                matches!(check(hinted), Err(LoweringError::UnsupportedConstruct { .. })),
                "fragment {:?}",
                hinted
            );
        }
        assert!(matches!(
            check("users u extra"),
            Ok(Some(LoweringError::MalformedClause { ref fragment, .. })) if fragment == "extra"
        ));
    }

    #[test]
    fn test_join_index_hint_declined() {
        assert!(matches!(
            parse_joins("a JOIN b FORCE INDEX (ix) ON b.id = a.bid", &words()),
            Err(LoweringError::UnsupportedConstruct { .. })
        ));
        assert!(matches!(
            parse_joins("a JOIN b ON b.id = a.bid, c", &words()),
            Err(LoweringError::UnsupportedConstruct { ref construct, .. }) if construct == MIXED_JOIN_SYNTAX
        ));
        let parsed = parse_joins("a JOIN b x y ON b.id = a.bid", &words()).unwrap();
        assert_eq!(parsed.joins[0].table.reference_name(), "x");
        assert_eq!(parsed.errors.len(), 1);
    }

    #[test]
    fn test_derived_table_is_not_a_table() {
        assert!(parse_table_with_alias("(SELECT 1) x", &words()).is_none());
        assert!(parse_table_with_alias("", &words()).is_none());
    }

    #[test]
    fn test_main_table_fragment_stops_at_join() {
        assert_eq!(main_table_fragment("posts p INNER JOIN users u ON 1"), "posts p");
        assert_eq!(main_table_fragment("users LEFT OUTER JOIN x ON 1"), "users");
        assert_eq!(main_table_fragment("users"), "users");
    }

    #[test]
    fn test_scan_joins() {
        let from = "posts p INNER JOIN users u ON p.user_id = u.id LEFT JOIN tags t ON (t.pid = p.id AND t.on = 1) JOIN x";
        let segments = scan_joins(from);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].qualifiers, vec!["INNER"]);
        assert_eq!(segments[0].table_fragment, "users u");
        assert_eq!(segments[0].condition, Some("p.user_id = u.id"));
        assert_eq!(segments[1].condition, Some("(t.pid = p.id AND t.on = 1)"));
        assert!(segments[2].qualifiers.is_empty());
        assert_eq!(segments[2].condition, None);
    }

    #[test]
    fn test_join_kinds() {
        let kind = |q: &[&str]| join_kind(&q.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        assert_eq!(kind(&["LEFT"]), JoinKind::Left);
        assert_eq!(kind(&["LEFT", "OUTER"]), JoinKind::Left);
        assert_eq!(kind(&["RIGHT"]), JoinKind::Right);
        assert_eq!(kind(&["INNER"]), JoinKind::Inner);
        assert_eq!(kind(&["CROSS"]), JoinKind::Cross);
        assert_eq!(kind(&["OUTER"]), JoinKind::Outer);
        assert_eq!(kind(&[]), JoinKind::Plain);
    }

    #[test]
    fn test_parse_joins() {
        let parsed = parse_joins(
            "posts p INNER JOIN users u ON p.user_id = u.id CROSS JOIN tags",
            &words(),
        )
        .unwrap();
        assert!(parsed.errors.is_empty());
        let joins = parsed.joins;
        assert_eq!(joins.len(), 2);
        assert_eq!(joins[0].kind, JoinKind::Inner);
        assert_eq!(joins[0].table.reference_name(), "u");
        assert_eq!(joins[1].kind, JoinKind::Cross);
        assert_eq!(joins[1].table.table, "tags");
        assert_eq!(joins[1].condition, None);
    }

    #[test]
    fn test_parse_joins_declines() {
        assert!(matches!(
            parse_joins("a JOIN b USING (id)", &words()),
            Err(LoweringError::UnsupportedConstruct { .. })
        ));
        assert!(matches!(
            parse_joins("a NATURAL JOIN b", &words()),
            Err(LoweringError::UnsupportedConstruct { .. })
        ));
        assert!(matches!(
            parse_joins("a JOIN (SELECT id FROM b) x ON x.id = a.id", &words()),
            Err(LoweringError::UnsupportedConstruct { .. })
        ));
    }
}

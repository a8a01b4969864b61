// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Scanner Primitives
//!
//! Quote-aware and parenthesis-aware scanning shared by every extractor.
//!
//! ## State Machine
//!
//! ```text
//! outside quote ──'/"/`──→ inside quote ──matching char──→ outside quote
//!       │                      │
//!       │ ( / )                └─ '\' escapes the next char (' and " only)
//!       ↓
//!  depth += 1 / depth -= 1
//! ```
//!
//! While a quote is open every character is inert: delimiters, parentheses and
//! keywords inside string literals or quoted identifiers are never reported as
//! top-level.
//!
//! ## Comments
//!
//! `-- ` (dash dash followed by whitespace), `#` and `/* ... */` comments are
//! inert as well. A line comment ends before its newline, which is reported
//! as ordinary whitespace. MySQL executable comments and optimizer hints
//! (`/*! ... */`, `/*+ ... */`) carry SQL that would be lost, so
//! [`check_balanced`] rejects them.
//!
//! ## Degenerate Input
//!
//! An unterminated quote or an unbalanced parenthesis never panics. The
//! remainder of the input is treated as still inside the last opened state, so
//! splits and searches return a best-effort answer. Callers that must not act
//! on such input run [`check_balanced`] first.

use std::str::CharIndices;
use thiserror::Error;

/// A character produced by [`Scanner`], annotated with its scan state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedChar {
    /// Byte offset in the input
    pub offset: usize,
    pub ch: char,
    /// Parenthesis depth the character sits at
    ///
    /// An opening paren reports the depth before it, a closing paren the depth
    /// after it, so both parens of a top-level group are at depth 0.
    pub depth: usize,
    /// Whether the character is part of a quoted literal or identifier
    /// (including the quote characters themselves)
    pub quoted: bool,
    /// Whether the character is part of a comment, markers included
    pub comment: bool,
}

impl ScannedChar {
    /// Neither quoted nor inside a comment
    pub fn is_code(&self) -> bool {
        !self.quoted && !self.comment
    }

    /// Code at parenthesis depth 0
    pub fn is_top_level(&self) -> bool {
        self.is_code() && self.depth == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentKind {
    Line,
    Block,
}

/// Character iterator tracking quote, comment and parenthesis state
pub struct Scanner<'a> {
    input: &'a str,
    chars: CharIndices<'a>,
    quote: Option<(char, usize)>,
    comment: Option<(CommentKind, usize)>,
    escaped: bool,
    depth: usize,
    stray_close: Option<usize>,
    executable_comment: Option<usize>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices(),
            quote: None,
            comment: None,
            escaped: false,
            depth: 0,
            stray_close: None,
            executable_comment: None,
        }
    }

    /// Check the state reached so far
    pub fn balance(&self) -> Result<(), ScanError> {
        if let Some(offset) = self.stray_close {
            return Err(ScanError::UnexpectedClose { offset });
        }
        if let Some(offset) = self.executable_comment {
            return Err(ScanError::ExecutableComment { offset });
        }
        if let Some((quote, offset)) = self.quote {
            return Err(ScanError::UnterminatedQuote { quote, offset });
        }
        if let Some((CommentKind::Block, offset)) = self.comment {
            return Err(ScanError::UnterminatedComment { offset });
        }
        if self.depth > 0 {
            return Err(ScanError::UnclosedParen { depth: self.depth });
        }
        Ok(())
    }

    /// Comment opened by `ch` at `offset`, if any
    fn comment_start(&self, offset: usize, ch: char) -> Option<CommentKind> {
        let rest = &self.input[offset..];
        match ch {
            '#' => Some(CommentKind::Line),
            '-' if rest.starts_with("--") => rest[2..]
                .chars()
                .next()
                .is_none_or(char::is_whitespace)
                .then_some(CommentKind::Line),
            '/' if rest.starts_with("/*") => Some(CommentKind::Block),
            _ => None,
        }
    }

    fn comment_char(&self, offset: usize, ch: char) -> ScannedChar {
        ScannedChar {
            offset,
            ch,
            depth: self.depth,
            quoted: false,
            comment: true,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = ScannedChar;

    fn next(&mut self) -> Option<Self::Item> {
        let (offset, ch) = self.chars.next()?;

        if let Some((kind, start)) = self.comment {
            match kind {
                // The newline ending a line comment is plain whitespace
                CommentKind::Line if ch == '\n' => self.comment = None,
                CommentKind::Line => return Some(self.comment_char(offset, ch)),
                CommentKind::Block => {
                    if ch == '/' && offset >= start + 3 && self.input[..offset].ends_with('*') {
                        self.comment = None;
                    }
                    return Some(self.comment_char(offset, ch));
                }
            }
        } else if self.quote.is_none() {
            if let Some(kind) = self.comment_start(offset, ch) {
                if kind == CommentKind::Block
                    && matches!(self.input[offset + 2..].chars().next(), Some('!' | '+'))
                {
                    self.executable_comment.get_or_insert(offset);
                }
                self.comment = Some((kind, offset));
                return Some(self.comment_char(offset, ch));
            }
        }

        if let Some((quote, _)) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' && quote != '`' {
                self.escaped = true;
            } else if ch == quote {
                self.quote = None;
            }
            return Some(ScannedChar {
                offset,
                ch,
                depth: self.depth,
                quoted: true,
                comment: false,
            });
        }

        let depth = match ch {
            '\'' | '"' | '`' => {
                self.quote = Some((ch, offset));
                return Some(ScannedChar {
                    offset,
                    ch,
                    depth: self.depth,
                    quoted: true,
                    comment: false,
                });
            }
            '(' => {
                let before = self.depth;
                self.depth += 1;
                before
            }
            ')' => {
                if self.depth == 0 {
                    self.stray_close.get_or_insert(offset);
                } else {
                    self.depth -= 1;
                }
                self.depth
            }
            _ => self.depth,
        };

        Some(ScannedChar {
            offset,
            ch,
            depth,
            quoted: false,
            comment: false,
        })
    }
}

/// Structural problems found by [`check_balanced`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unterminated {quote} quote opened at byte {offset}")]
    UnterminatedQuote { quote: char, offset: usize },

    #[error("{depth} unclosed parenthesis group(s)")]
    UnclosedParen { depth: usize },

    #[error("unexpected ')' at byte {offset}")]
    UnexpectedClose { offset: usize },

    #[error("unterminated comment opened at byte {offset}")]
    UnterminatedComment { offset: usize },

    #[error("executable comment or optimizer hint at byte {offset}")]
    ExecutableComment { offset: usize },
}

/// Verify that every quote and block comment is closed, every parenthesis
/// matched, and no executable comment is present
pub fn check_balanced(input: &str) -> Result<(), ScanError> {
    let mut scanner = Scanner::new(input);
    for _ in scanner.by_ref() {}
    scanner.balance()
}

/// Split on `delimiter` at depth 0 outside quotes
///
/// Segments are trimmed and empty trailing segments are dropped.
pub fn split_top_level(input: &str, delimiter: char) -> Vec<String> {
    let mut segments = Vec::new();
    let mut start = 0;

    for sc in Scanner::new(input) {
        if sc.ch == delimiter && sc.is_top_level() {
            segments.push(input[start..sc.offset].trim().to_string());
            start = sc.offset + sc.ch.len_utf8();
        }
    }
    segments.push(input[start..].trim().to_string());

    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}

/// First byte offset of `ch` at depth 0 outside quotes
pub fn find_top_level(input: &str, ch: char) -> Option<usize> {
    Scanner::new(input)
        .find(|sc| sc.ch == ch && sc.is_top_level())
        .map(|sc| sc.offset)
}

/// Check whether the whole (trimmed) input is one parenthesized group
///
/// `(a OR b)` is; `(a) OR (b)` is not, because the depth returns to zero
/// before the final character.
pub fn is_fully_parenthesized(input: &str) -> bool {
    let trimmed = input.trim();
    if !trimmed.starts_with('(') || !trimmed.ends_with(')') {
        return false;
    }

    let last = trimmed.len() - 1;
    let mut scanner = Scanner::new(trimmed);
    for sc in scanner.by_ref() {
        if sc.ch == ')' && sc.is_top_level() && sc.offset != last {
            return false;
        }
    }
    scanner.balance().is_ok()
}

/// Characters that continue an identifier or keyword
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '$' | '@' | '.')
}

/// Match a keyword at `offset`, returning the byte offset just past it
///
/// Matching is ASCII case-insensitive and word-bounded. The words of a
/// multi-word keyword (`GROUP BY`) may be separated by any whitespace run.
pub fn match_keyword_at(input: &str, offset: usize, keyword: &str) -> Option<usize> {
    if input[..offset].chars().next_back().is_some_and(is_word_char) {
        return None;
    }

    let mut pos = offset;
    for (i, word) in keyword.split_whitespace().enumerate() {
        if i > 0 {
            let rest = &input[pos..];
            let skipped = rest.len() - rest.trim_start().len();
            if skipped == 0 {
                return None;
            }
            pos += skipped;
        }
        let candidate = input.get(pos..pos + word.len())?;
        if !candidate.eq_ignore_ascii_case(word) {
            return None;
        }
        pos += word.len();
    }

    if input[pos..].chars().next().is_some_and(is_word_char) {
        return None;
    }
    Some(pos)
}

/// First top-level occurrence of `keyword` as `(start, end)` byte offsets
pub fn find_keyword_span(input: &str, keyword: &str, from: usize) -> Option<(usize, usize)> {
    Scanner::new(input)
        .filter(|sc| sc.offset >= from && sc.is_top_level())
        .find_map(|sc| match_keyword_at(input, sc.offset, keyword).map(|end| (sc.offset, end)))
}

/// First top-level offset of `keyword` at or after `from`
pub fn find_keyword_from(input: &str, keyword: &str, from: usize) -> Option<usize> {
    find_keyword_span(input, keyword, from).map(|(start, _)| start)
}

/// First top-level offset of `keyword`
pub fn find_keyword(input: &str, keyword: &str) -> Option<usize> {
    find_keyword_from(input, keyword, 0)
}

/// Check whether `keyword` appears anywhere outside quotes and comments, at any depth
pub fn contains_keyword_anywhere(input: &str, keyword: &str) -> bool {
    Scanner::new(input)
        .filter(ScannedChar::is_code)
        .any(|sc| match_keyword_at(input, sc.offset, keyword).is_some())
}

/// Split on whitespace at depth 0 outside quotes
pub fn tokens(input: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for sc in Scanner::new(input) {
        if sc.ch.is_whitespace() && sc.is_top_level() {
            if let Some(s) = start.take() {
                out.push(&input[s..sc.offset]);
            }
        } else if start.is_none() {
            start = Some(sc.offset);
        }
    }
    if let Some(s) = start {
        out.push(&input[s..]);
    }
    out
}

/// Number of `?` placeholders outside quoted literals and comments
pub fn count_placeholders(input: &str) -> usize {
    Scanner::new(input)
        .filter(|sc| sc.ch == '?' && sc.is_code())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_top_level_respects_parens_and_quotes() {
        assert_eq!(
            split_top_level("a,(b,c),'d,e'", ','),
            vec!["a", "(b,c)", "'d,e'"]
        );
    }

    #[test]
    fn test_split_top_level_drops_trailing_empty() {
        assert_eq!(split_top_level("a, b, ", ','), vec!["a", "b"]);
        assert_eq!(split_top_level("", ','), Vec::<String>::new());
        assert_eq!(split_top_level("a,,b", ','), vec!["a", "", "b"]);
    }

    #[test]
    fn test_split_top_level_backticks_and_double_quotes() {
        assert_eq!(
            split_top_level("`a,b`, \"c,d\", e", ','),
            vec!["`a,b`", "\"c,d\"", "e"]
        );
    }

    #[test]
    fn test_escaped_quote_stays_inside_literal() {
        assert_eq!(
            split_top_level(r"'it\'s, fine', x", ','),
            vec![r"'it\'s, fine'", "x"]
        );
        assert_eq!(split_top_level("'it''s, ok', y", ','), vec!["'it''s, ok'", "y"]);
    }

    #[test]
    fn test_find_top_level() {
        assert_eq!(find_top_level("a = (b = c)", '='), Some(2));
        assert_eq!(find_top_level("'x=y' = z", '='), Some(6));
        assert_eq!(find_top_level("(a = b)", '='), None);
    }

    #[test]
    fn test_is_fully_parenthesized() {
        assert!(is_fully_parenthesized("(a OR b)"));
        assert!(is_fully_parenthesized("  ((a) AND (b))  "));
        assert!(!is_fully_parenthesized("(a) OR (b)"));
        assert!(!is_fully_parenthesized("a OR b"));
        assert!(is_fully_parenthesized("(a = ')')"));
    }

    #[test]
    fn test_unterminated_quote_degrades() {
        // The remainder is inside the quote, so no split happens after it
        assert_eq!(split_top_level("a, 'b, c", ','), vec!["a", "'b, c"]);
        assert!(matches!(
            check_balanced("a, 'b, c"),
            Err(ScanError::UnterminatedQuote { quote: '\'', offset: 3 })
        ));
    }

    #[test]
    fn test_unbalanced_parens_reported() {
        assert_eq!(
            check_balanced("(a, (b)"),
            Err(ScanError::UnclosedParen { depth: 1 })
        );
        assert_eq!(
            check_balanced("a) + (b"),
            Err(ScanError::UnexpectedClose { offset: 1 })
        );
        assert!(check_balanced("f(a, 'x)') + (b)").is_ok());
    }

    #[test]
    fn test_find_keyword_word_bounded() {
        assert_eq!(find_keyword("SELECT a FROM t", "from"), Some(9));
        assert_eq!(find_keyword("SELECT from_date FROM t", "FROM"), Some(17));
        assert_eq!(find_keyword("SELECT t.from FROM t", "FROM"), Some(14));
        assert_eq!(find_keyword("SELECT 'FROM' FROM t", "FROM"), Some(14));
        assert_eq!(find_keyword("SELECT (SELECT 1 FROM x)", "FROM"), None);
    }

    #[test]
    fn test_find_keyword_multi_word() {
        let sql = "SELECT a FROM t GROUP  BY a ORDER BY b";
        assert_eq!(find_keyword(sql, "GROUP BY"), Some(16));
        assert_eq!(find_keyword(sql, "ORDER BY"), Some(28));
        assert_eq!(find_keyword("SELECT grouping FROM t", "GROUP BY"), None);
    }

    #[test]
    fn test_find_keyword_from_offset() {
        let sql = "a AND b AND c";
        assert_eq!(find_keyword_from(sql, "AND", 3), Some(8));
        assert_eq!(find_keyword_span(sql, "AND", 0), Some((2, 5)));
    }

    #[test]
    fn test_tokens() {
        assert_eq!(tokens("users  AS u"), vec!["users", "AS", "u"]);
        assert_eq!(tokens("`my table` t"), vec!["`my table`", "t"]);
        assert_eq!(tokens("f(a, b) DESC"), vec!["f(a, b)", "DESC"]);
    }

    #[test]
    fn test_count_placeholders_skips_literals() {
        assert_eq!(count_placeholders("a = ? AND b = '?' AND c IN (?, ?)"), 3);
        assert_eq!(count_placeholders("`odd?col` = ?"), 1);
    }

    #[test]
    fn test_comments_are_inert() {
        assert_eq!(
            split_top_level("a /* x, y */, b -- c, d\n, e # f, g", ','),
            vec!["a /* x, y */", "b -- c, d", "e # f, g"]
        );
        assert_eq!(find_keyword("users /* WHERE */ u WHERE id = 1", "WHERE"), Some(20));
        assert_eq!(count_placeholders("a = ? -- b = ?\n AND c = ? /* ? */ # ?"), 2);
        assert!(check_balanced("a /* ( ' */ -- )\n # '").is_ok());
    }

    #[test]
    fn test_double_dash_needs_whitespace() {
        // `--1` is a double negation, not a comment
        assert_eq!(count_placeholders("a = b--1 AND c = ?"), 1);
        assert_eq!(count_placeholders("a = ? --"), 1);
        assert!(Scanner::new("a--1").all(|sc| !sc.comment));
    }

    #[test]
    fn test_comment_state_reported() {
        let flags: Vec<bool> = Scanner::new("a/**/b").map(|sc| sc.comment).collect();
        assert_eq!(flags, vec![false, true, true, true, true, false]);
        let flags: Vec<bool> = Scanner::new("a#x\nb").map(|sc| sc.comment).collect();
        assert_eq!(flags, vec![false, true, true, false, false]);
    }

    #[test]
    fn test_bad_comments_reported() {
        assert_eq!(
            check_balanced("SELECT 1 /* open"),
            Err(ScanError::UnterminatedComment { offset: 9 })
        );
        assert_eq!(
            check_balanced("SELECT /*+ MAX_EXECUTION_TIME(1) */ 1"),
            Err(ScanError::ExecutableComment { offset: 7 })
        );
        assert_eq!(
            check_balanced("SELECT /*!40001 SQL_NO_CACHE */ 1"),
            Err(ScanError::ExecutableComment { offset: 7 })
        );
    }

    #[test]
    fn test_contains_keyword_anywhere() {
        assert!(contains_keyword_anywhere("id IN (SELECT id FROM x)", "SELECT"));
        assert!(!contains_keyword_anywhere("name = 'SELECT'", "SELECT"));
    }
}

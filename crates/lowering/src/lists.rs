// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SET and VALUES list parsing

use sql_fluent_ir::{Assignment, TableRef};

use crate::context::LoweringContext;
use crate::error::LoweringError;
use crate::scanner::{find_top_level, is_fully_parenthesized, split_top_level};
use crate::tables::identifier_segments;

/// Parse `col = value, ...`, renumbering placeholders in textual order
///
/// A pair without a top-level `=` is recorded as a [`LoweringError::MalformedClause`]
/// and dropped, and so is a column qualified with a table other than `target`.
/// Their placeholders are still numbered, so the pairs after them keep their
/// positions.
pub fn parse_set_clause(
    text: &str,
    target: &TableRef,
    ctx: &mut LoweringContext<'_>,
) -> Vec<Assignment> {
    let renumbered = ctx.renumber(text);
    let mut assignments = Vec::new();

    for pair in split_top_level(&renumbered, ',') {
        let Some(eq) = find_top_level(&pair, '=') else {
            ctx.add_error(LoweringError::malformed("SET", pair.as_str(), "missing '='"));
            continue;
        };
        let foreign = column_qualifier(&pair[..eq]).filter(|q| !target.is_referred_by(q));
        if let Some(qualifier) = foreign {
            ctx.add_error(LoweringError::malformed(
                "SET",
                pair.as_str(),
                format!("column belongs to `{}`, not the target table", qualifier),
            ));
            continue;
        }
        let column = strip_column_name(&pair[..eq]);
        let value = pair[eq + 1..].trim();
        if column.is_empty() || value.is_empty() {
            ctx.add_error(LoweringError::malformed(
                "SET",
                pair.as_str(),
                "expected `column = value`",
            ));
            continue;
        }
        assignments.push(Assignment::new(column, value));
    }
    assignments
}

/// Column name without table prefix or quoting
pub fn strip_column_name(column: &str) -> String {
    identifier_segments(column).pop().unwrap_or_default()
}

/// Table prefix of a column (`shop.orders` for `shop.orders.total`)
pub fn column_qualifier(column: &str) -> Option<String> {
    let mut segments = identifier_segments(column);
    segments.pop();
    (!segments.is_empty()).then(|| segments.join("."))
}

fn strip_outer_parens(text: &str) -> &str {
    let text = text.trim();
    if is_fully_parenthesized(text) {
        text[1..text.len() - 1].trim()
    } else {
        text
    }
}

/// `(a, t.b, c)` → `["a", "b", "c"]`
pub fn parse_column_list(text: &str) -> Vec<String> {
    split_top_level(strip_outer_parens(text), ',')
        .iter()
        .map(|c| strip_column_name(c))
        .collect()
}

/// `(?, NOW(), 'x, y')` → `["?", "NOW()", "'x, y'"]`
pub fn parse_value_list(text: &str) -> Vec<String> {
    split_top_level(strip_outer_parens(text), ',')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReservedWords;
    use crate::error::LoweringOutcome;

    #[test]
    fn test_parse_set_clause() {
        let words = ReservedWords::default();
        let mut ctx = LoweringContext::new(&words);
        let set = parse_set_clause(
            "u.name = ?, `age` = age + ?, updated = NOW()",
            &TableRef::new("users").with_alias("u"),
            &mut ctx,
        );
        assert_eq!(
            set,
            vec![
                Assignment::new("name", ":param1"),
                Assignment::new("age", "age + :param2"),
                Assignment::new("updated", "NOW()"),
            ]
        );
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_malformed_pair_is_dropped_but_numbered() {
        let words = ReservedWords::default();
        let mut ctx = LoweringContext::new(&words);
        let set = parse_set_clause("a = ?, b ?, c = ?", &TableRef::new("t"), &mut ctx);
        assert_eq!(
            set,
            vec![Assignment::new("a", ":param1"), Assignment::new("c", ":param3")]
        );
        assert_eq!(ctx.params_issued(), 3);
        assert!(matches!(ctx.outcome(), LoweringOutcome::Partial(ref e) if e.len() == 1));
    }

    #[test]
    fn test_equals_inside_value_is_kept() {
        let words = ReservedWords::default();
        let mut ctx = LoweringContext::new(&words);
        let set = parse_set_clause("flag = (a = 1), note = 'x=y'", &TableRef::new("t"), &mut ctx);
        assert_eq!(set[0].value, "(a = 1)");
        assert_eq!(set[1].value, "'x=y'");
    }

    #[test]
    fn test_foreign_qualifier_is_dropped() {
        let words = ReservedWords::default();
        let mut ctx = LoweringContext::new(&words);
        let target = TableRef::new("orders").with_alias("o");
        let set = parse_set_clause(
            "o.total = ?, u.name = ?, `orders`.`note` = ?, shop.orders.flag = 1",
            &target,
            &mut ctx,
        );
        assert_eq!(
            set,
            vec![Assignment::new("total", ":param1"), Assignment::new("note", ":param3")]
        );
        assert_eq!(ctx.params_issued(), 3);
        assert_eq!(ctx.errors().len(), 2);
        assert!(matches!(ctx.outcome(), LoweringOutcome::Partial(_)));
    }

    #[test]
    fn test_column_qualifier() {
        assert_eq!(column_qualifier("u.name"), Some("u".to_string()));
        assert_eq!(column_qualifier("`shop`.`orders`.total"), Some("shop.orders".to_string()));
        assert_eq!(column_qualifier("name"), None);
    }

    #[test]
    fn test_column_and_value_lists() {
        assert_eq!(
            parse_column_list("(name, t.age, `email`)"),
            vec!["name", "age", "email"]
        );
        assert_eq!(
            parse_value_list("(?, NOW(), 'x, y')"),
            vec!["?", "NOW()", "'x, y'"]
        );
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! UPDATE statement lowering

use sql_fluent_ir::{ClauseSet, StatementKind};

use crate::StatementLowering;
use crate::clauses::{extract_set, extract_update_target};
use crate::context::LoweringContext;
use crate::error::{LoweringError, LoweringResult};
use crate::lists::parse_set_clause;
use crate::normalize::NormalizedSql;
use crate::statement::StatementLoweringBase;

/// UPDATE lowering implementation
pub struct UpdateLowering;

impl StatementLoweringBase for UpdateLowering {}

impl StatementLowering for UpdateLowering {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn lower(&self, ctx: &mut LoweringContext<'_>, sql: &NormalizedSql) -> LoweringResult<ClauseSet> {
        let target = extract_update_target(sql)
            .filter(|target| !target.is_empty())
            .ok_or_else(|| {
                LoweringError::malformed("UPDATE", sql.as_str(), "expected a target table")
            })?;
        let sources = self.lower_sources(ctx, target, "UPDATE target", false)?;

        let set = extract_set(sql)
            .ok_or_else(|| LoweringError::malformed("UPDATE", sql.as_str(), "missing SET clause"))?;
        let assignments = parse_set_clause(set, &sources.table, ctx);
        if assignments.is_empty() {
            return Err(LoweringError::malformed("SET", set, "no assignment could be parsed"));
        }

        let mut clauses = ClauseSet::new(StatementKind::Update)
            .with_table(sources.table)
            .with_joins(sources.joins);
        clauses.set = assignments;
        clauses.where_conditions = self.lower_where(ctx, sql);
        clauses.order_by = self.lower_order_by(ctx, sql);
        clauses.limit = self.lower_limit(ctx, sql, false).0;

        Ok(clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReservedWords;
    use crate::error::LoweringOutcome;
    use sql_fluent_ir::{Assignment, Bound};

    fn lower(sql: &str) -> (LoweringResult<ClauseSet>, LoweringOutcome) {
        let words = ReservedWords::default();
        let mut ctx = LoweringContext::new(&words);
        let result = UpdateLowering.lower(&mut ctx, &NormalizedSql::new(sql));
        (result, ctx.outcome())
    }

    #[test]
    fn test_update_with_alias_and_limit() {
        let (result, outcome) =
            lower("UPDATE users u SET u.name = ?, u.age = ? WHERE u.id = ? ORDER BY u.id LIMIT 1");
        let clauses = result.unwrap();
        let table = clauses.table.unwrap();
        assert_eq!(table.table, "users");
        assert_eq!(table.alias.as_deref(), Some("u"));
        assert_eq!(
            clauses.set,
            vec![Assignment::new("name", ":param1"), Assignment::new("age", ":param2")]
        );
        assert_eq!(clauses.where_conditions[0].text, "u.id = :param3");
        assert_eq!(clauses.limit, Some(Bound::Literal(1)));
        assert_eq!(outcome, LoweringOutcome::Success);
    }

    #[test]
    fn test_join_condition_numbers_before_set() {
        let (result, _) = lower(
            "UPDATE orders o JOIN users u ON u.id = o.user_id AND u.tier = ? SET o.discount = ? WHERE o.id = ?",
        );
        let clauses = result.unwrap();
        assert_eq!(
            clauses.joins[0].condition.as_deref(),
            Some("u.id = o.user_id AND u.tier = :param1")
        );
        assert_eq!(clauses.set[0].value, ":param2");
        assert_eq!(clauses.where_conditions[0].text, "o.id = :param3");
    }

    #[test]
    fn test_malformed_pair_is_partial() {
        let (result, outcome) = lower("UPDATE t SET a = ?, b WHERE id = ?");
        let clauses = result.unwrap();
        assert_eq!(clauses.set.len(), 1);
        assert_eq!(clauses.where_conditions[0].text, "id = :param2");
        assert!(matches!(outcome, LoweringOutcome::Partial(_)));
    }

    #[test]
    fn test_joined_table_column_is_not_assigned() {
        let (result, outcome) = lower(
            "UPDATE orders o JOIN users u ON u.id = o.user_id SET o.total = ?, u.name = ? WHERE o.id = ?",
        );
        let clauses = result.unwrap();
        assert_eq!(clauses.set, vec![Assignment::new("total", ":param1")]);
        assert_eq!(clauses.where_conditions[0].text, "o.id = :param3");
        assert!(matches!(
            outcome,
            LoweringOutcome::Partial(ref errors)
                if matches!(&errors[..], [LoweringError::MalformedClause { clause, .. }] if clause == "SET")
        ));
    }

    #[test]
    fn test_declined_forms() {
        assert!(matches!(
            lower("UPDATE a, b SET a.x = b.x").0,
            Err(LoweringError::UnsupportedConstruct { .. })
        ));
        assert!(matches!(
            lower("UPDATE t WHERE id = ?").0,
            Err(LoweringError::MalformedClause { .. })
        ));
        assert!(matches!(
            lower("UPDATE t SET garbage").0,
            Err(LoweringError::MalformedClause { .. })
        ));
    }
}

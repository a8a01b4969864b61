// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SELECT statement lowering
//!
//! Clauses are read in source order so placeholders number left to right:
//!
//! ```text
//! SELECT list → FROM/JOIN → WHERE → GROUP BY → HAVING → ORDER BY → LIMIT → OFFSET
//! ```
//!
//! Locking reads (`FOR UPDATE`, `LOCK IN SHARE MODE`) have no builder
//! equivalent and are declined.

use sql_fluent_ir::{ClauseSet, StatementKind};

use crate::StatementLowering;
use crate::clauses::{extract_from, extract_select_list};
use crate::context::LoweringContext;
use crate::error::{LoweringError, LoweringResult};
use crate::normalize::NormalizedSql;
use crate::scanner::{find_keyword, split_top_level};
use crate::statement::StatementLoweringBase;

/// SELECT lowering implementation
pub struct SelectLowering;

impl StatementLoweringBase for SelectLowering {}

impl StatementLowering for SelectLowering {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn lower(&self, ctx: &mut LoweringContext<'_>, sql: &NormalizedSql) -> LoweringResult<ClauseSet> {
        for locking in ["FOR UPDATE", "LOCK IN SHARE MODE", "FOR SHARE"] {
            if find_keyword(sql, locking).is_some() {
                return Err(LoweringError::unsupported(locking, "SELECT statement"));
            }
        }

        let mut clauses = ClauseSet::new(StatementKind::Select);

        let (distinct, list) = extract_select_list(sql)
            .filter(|(_, list)| !list.is_empty())
            .ok_or_else(|| LoweringError::malformed("SELECT", sql.as_str(), "empty select list"))?;
        clauses.distinct = distinct;
        clauses.select = split_top_level(&ctx.renumber(list), ',');

        if let Some(from) = extract_from(sql) {
            let sources = self.lower_sources(ctx, from, "FROM clause", true)?;
            clauses.table = Some(sources.table);
            clauses.extra_tables = sources.extra_tables;
            clauses.joins = sources.joins;
        }

        clauses.where_conditions = self.lower_where(ctx, sql);
        clauses.group_by = self.lower_group_by(ctx, sql);
        clauses.having = self.lower_having(ctx, sql);
        clauses.order_by = self.lower_order_by(ctx, sql);
        (clauses.limit, clauses.offset) = self.lower_limit(ctx, sql, true);

        Ok(clauses)
    }
}

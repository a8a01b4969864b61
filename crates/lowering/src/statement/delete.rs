// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! DELETE statement lowering
//!
//! Both the single-table form and the MySQL join form are accepted:
//!
//! ```sql
//! DELETE FROM users WHERE id = ?
//! DELETE p FROM posts p JOIN users u ON u.id = p.user_id WHERE u.banned = 1
//! ```
//!
//! The join form must delete from the FROM table itself; deleting from a
//! joined table or from several tables at once is declined.

use sql_fluent_ir::{ClauseSet, StatementKind};

use crate::StatementLowering;
use crate::clauses::extract_delete;
use crate::context::LoweringContext;
use crate::error::{LoweringError, LoweringResult};
use crate::normalize::NormalizedSql;
use crate::scanner::find_keyword;
use crate::statement::StatementLoweringBase;
use crate::tables::{main_table_fragment, normalize_identifier};

/// DELETE lowering implementation
pub struct DeleteLowering;

impl StatementLoweringBase for DeleteLowering {}

impl StatementLowering for DeleteLowering {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn lower(&self, ctx: &mut LoweringContext<'_>, sql: &NormalizedSql) -> LoweringResult<ClauseSet> {
        let parts = extract_delete(sql).ok_or_else(|| {
            LoweringError::malformed("DELETE", sql.as_str(), "expected DELETE ... FROM")
        })?;
        let from = parts.from.filter(|from| !from.is_empty()).ok_or_else(|| {
            LoweringError::malformed("DELETE", sql.as_str(), "expected a FROM clause")
        })?;

        if parts.targets.len() > 1 {
            return Err(LoweringError::unsupported(
                "multi-table DELETE",
                "DELETE statement",
            ));
        }
        if find_keyword(main_table_fragment(from), "USING").is_some() {
            return Err(LoweringError::unsupported("DELETE ... USING", "DELETE statement"));
        }

        let sources = self.lower_sources(ctx, from, "DELETE statement", false)?;

        if let Some(target) = parts.targets.first() {
            let name = normalize_identifier(target.trim_end_matches(".*"));
            if !sources.table.is_referred_by(&name) {
                return Err(LoweringError::unsupported(
                    format!("DELETE target `{}` is not the FROM table", name),
                    "DELETE statement",
                ));
            }
        }

        let mut clauses = ClauseSet::new(StatementKind::Delete)
            .with_table(sources.table)
            .with_joins(sources.joins);
        clauses.where_conditions = self.lower_where(ctx, sql);
        clauses.order_by = self.lower_order_by(ctx, sql);
        clauses.limit = self.lower_limit(ctx, sql, false).0;

        Ok(clauses)
    }
}

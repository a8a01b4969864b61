// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! INSERT statement lowering
//!
//! Three value sources are recognized:
//!
//! - `(cols) VALUES (vals)` and `SET col = val` become column assignments
//! - `VALUES (vals)` without columns binds by position and is flagged for review
//! - `[(cols)] SELECT ...` is kept as text behind a manual-review marker
//!
//! Multi-row `VALUES` and `ON DUPLICATE KEY UPDATE` are declined.

use sql_fluent_ir::{Assignment, ClauseSet, InsertSource, StatementKind, TableRef};

use crate::StatementLowering;
use crate::clauses::{InsertBody, extract_insert};
use crate::context::LoweringContext;
use crate::error::{LoweringError, LoweringResult};
use crate::lists::{parse_column_list, parse_set_clause, parse_value_list};
use crate::normalize::NormalizedSql;
use crate::scanner::{find_keyword, is_fully_parenthesized, split_top_level};
use crate::statement::StatementLoweringBase;
use crate::tables::normalize_identifier;

/// INSERT lowering implementation
pub struct InsertLowering;

impl StatementLoweringBase for InsertLowering {}

impl StatementLowering for InsertLowering {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn lower(&self, ctx: &mut LoweringContext<'_>, sql: &NormalizedSql) -> LoweringResult<ClauseSet> {
        if find_keyword(sql, "ON DUPLICATE KEY UPDATE").is_some() {
            return Err(LoweringError::unsupported(
                "ON DUPLICATE KEY UPDATE",
                "INSERT statement",
            ));
        }

        let parts = extract_insert(sql).ok_or_else(|| {
            LoweringError::malformed("INSERT", sql.as_str(), "expected a target table")
        })?;
        if parts.table.starts_with('(') {
            return Err(LoweringError::malformed(
                "INSERT",
                sql.as_str(),
                "expected a target table",
            ));
        }
        let table = TableRef::new(normalize_identifier(parts.table));

        let source = match parts.body {
            InsertBody::Values(values) => self.lower_values(ctx, parts.columns, values)?,
            InsertBody::Set(set) => {
                if parts.columns.is_some() {
                    return Err(LoweringError::malformed(
                        "INSERT",
                        sql.as_str(),
                        "column list cannot be combined with SET",
                    ));
                }
                let assignments = parse_set_clause(set, &table, ctx);
                if assignments.is_empty() {
                    return Err(LoweringError::malformed("SET", set, "no assignment could be parsed"));
                }
                InsertSource::Assignments(assignments)
            }
            InsertBody::Select(query) => {
                ctx.add_error(LoweringError::AmbiguousSyntax {
                    message: "INSERT ... SELECT has no setValue() equivalent".to_string(),
                    suggestion: "rewriting the statement by hand".to_string(),
                });
                InsertSource::Select {
                    columns: parts.columns.map(parse_column_list).unwrap_or_default(),
                    query: ctx.renumber(query),
                }
            }
            InsertBody::Missing => {
                return Err(LoweringError::malformed(
                    "INSERT",
                    sql.as_str(),
                    "expected VALUES, SET or SELECT",
                ));
            }
        };

        let mut clauses = ClauseSet::new(StatementKind::Insert).with_table(table);
        clauses.insert = Some(source);
        Ok(clauses)
    }
}

impl InsertLowering {
    fn lower_values(
        &self,
        ctx: &mut LoweringContext<'_>,
        columns: Option<&str>,
        values: &str,
    ) -> LoweringResult<InsertSource> {
        let renumbered = ctx.renumber(values);
        if split_top_level(&renumbered, ',').len() > 1 {
            return Err(LoweringError::unsupported("multi-row VALUES", "INSERT statement"));
        }
        if !is_fully_parenthesized(&renumbered) {
            return Err(LoweringError::malformed(
                "VALUES",
                values,
                "expected a parenthesized value list",
            ));
        }
        let values = parse_value_list(&renumbered);

        let Some(columns) = columns else {
            ctx.add_error(LoweringError::AmbiguousSyntax {
                message: "INSERT without a column list binds values by position".to_string(),
                suggestion: "adding an explicit column list".to_string(),
            });
            return Ok(InsertSource::Positional(values));
        };

        let columns = parse_column_list(columns);
        if columns.len() != values.len() {
            return Err(LoweringError::malformed(
                "VALUES",
                renumbered.as_str(),
                format!("{} column(s) but {} value(s)", columns.len(), values.len()),
            ));
        }
        Ok(InsertSource::Assignments(
            columns
                .into_iter()
                .zip(values)
                .map(|(column, value)| Assignment::new(column, value))
                .collect(),
        ))
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Base trait providing shared lowering logic for all statement kinds

use sql_fluent_ir::{Bound, Condition, JoinDescriptor, OrderByItem, SortDirection, TableRef};

use crate::clauses::{
    extract_group_by, extract_having, extract_limit, extract_offset, extract_order_by,
    extract_where, parse_bound, parse_limit,
};
use crate::conditions::split_where;
use crate::context::LoweringContext;
use crate::error::{LoweringError, LoweringResult};
use crate::scanner::{split_top_level, tokens};
use crate::tables::{MIXED_JOIN_SYNTAX, main_table_fragment, parse_joins, parse_table_fragment};

/// Tables named by a FROM clause or an UPDATE/DELETE target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub table: TableRef,
    pub extra_tables: Vec<TableRef>,
    pub joins: Vec<JoinDescriptor>,
}

/// Base trait providing shared lowering logic
///
/// Every helper renumbers the placeholders of the clause it reads, so callers
/// must invoke them in the order the clauses appear in the statement.
pub trait StatementLoweringBase {
    /// Resolve a table list with its joins
    ///
    /// `allow_multiple` permits comma-separated tables (`FROM a, b`).
    fn lower_sources(
        &self,
        ctx: &mut LoweringContext<'_>,
        text: &str,
        clause: &str,
        allow_multiple: bool,
    ) -> LoweringResult<Sources> {
        let renumbered = ctx.renumber(text);
        let main = main_table_fragment(&renumbered);
        let fragments = split_top_level(main, ',');

        if fragments.len() > 1 && !allow_multiple {
            return Err(LoweringError::unsupported("multiple target tables", clause));
        }

        let mut tables = Vec::with_capacity(fragments.len());
        for fragment in &fragments {
            tables.push(self.require_table(ctx, fragment, clause)?);
        }

        let mut tables = tables.into_iter();
        let table = tables
            .next()
            .ok_or_else(|| LoweringError::malformed(clause, text, "expected a table name"))?;
        let parsed = parse_joins(&renumbered, ctx.reserved_words())?;
        // The builder joins always hang off the main alias
        if fragments.len() > 1 && !parsed.joins.is_empty() {
            return Err(LoweringError::unsupported(MIXED_JOIN_SYNTAX, clause));
        }
        for err in parsed.errors {
            ctx.add_error(err);
        }

        Ok(Sources {
            table,
            extra_tables: tables.collect(),
            joins: parsed.joins,
        })
    }

    /// Parse a required table reference; failures decline the statement
    ///
    /// Index hints decline too. Other text after the alias is dropped and
    /// recorded.
    fn require_table(
        &self,
        ctx: &mut LoweringContext<'_>,
        fragment: &str,
        clause: &str,
    ) -> LoweringResult<TableRef> {
        if fragment.starts_with('(') {
            return Err(LoweringError::unsupported("derived table", clause));
        }
        let parsed = parse_table_fragment(fragment, ctx.reserved_words())
            .ok_or_else(|| LoweringError::malformed(clause, fragment, "expected a table name"))?;
        if let Some(err) = parsed.check_trailing(clause)? {
            ctx.add_error(err);
        }
        Ok(parsed.table)
    }

    fn lower_where(&self, ctx: &mut LoweringContext<'_>, sql: &str) -> Vec<Condition> {
        let Some(body) = extract_where(sql) else {
            return Vec::new();
        };
        let conditions = split_where(body, ctx.params_mut());
        if conditions.is_empty() {
            ctx.add_error(LoweringError::malformed("WHERE", sql, "empty condition"));
        }
        conditions
    }

    fn lower_group_by(&self, ctx: &mut LoweringContext<'_>, sql: &str) -> Vec<String> {
        extract_group_by(sql)
            .map(|body| split_top_level(&ctx.renumber(body), ','))
            .unwrap_or_default()
    }

    fn lower_having(&self, ctx: &mut LoweringContext<'_>, sql: &str) -> Option<String> {
        extract_having(sql)
            .map(|body| ctx.renumber(body))
            .filter(|body| !body.is_empty())
    }

    /// ORDER BY items; the direction defaults to ascending
    fn lower_order_by(&self, ctx: &mut LoweringContext<'_>, sql: &str) -> Vec<OrderByItem> {
        let Some(body) = extract_order_by(sql) else {
            return Vec::new();
        };
        split_top_level(&ctx.renumber(body), ',')
            .into_iter()
            .filter(|item| !item.is_empty())
            .map(|item| order_by_item(&item))
            .collect()
    }

    /// LIMIT and OFFSET as `(limit, offset)`
    ///
    /// Unparsable bounds are dropped and recorded. `allow_offset` is false for
    /// UPDATE and DELETE, which only take a row count.
    fn lower_limit(
        &self,
        ctx: &mut LoweringContext<'_>,
        sql: &str,
        allow_offset: bool,
    ) -> (Option<Bound>, Option<Bound>) {
        let mut limit = None;
        let mut offset = None;

        if let Some(body) = extract_limit(sql) {
            let renumbered = ctx.renumber(body);
            match parse_limit(&renumbered) {
                Some((skip, count)) => {
                    limit = Some(count);
                    offset = skip;
                }
                None => ctx.add_error(LoweringError::malformed(
                    "LIMIT",
                    renumbered.as_str(),
                    "expected an integer or placeholder",
                )),
            }
        }

        if let Some(body) = extract_offset(sql).filter(|_| allow_offset) {
            let renumbered = ctx.renumber(body);
            match parse_bound(&renumbered) {
                Some(bound) => offset = Some(bound),
                None => ctx.add_error(LoweringError::malformed(
                    "OFFSET",
                    renumbered.as_str(),
                    "expected an integer or placeholder",
                )),
            }
        }

        if !allow_offset && offset.take().is_some() {
            ctx.add_error(LoweringError::malformed(
                "LIMIT",
                extract_limit(sql).unwrap_or_default(),
                "row offset is not allowed here",
            ));
        }

        (limit, offset)
    }
}

fn order_by_item(item: &str) -> OrderByItem {
    let toks = tokens(item);
    let direction = match toks.last() {
        Some(last) if toks.len() > 1 && last.eq_ignore_ascii_case("DESC") => Some(SortDirection::Desc),
        Some(last) if toks.len() > 1 && last.eq_ignore_ascii_case("ASC") => Some(SortDirection::Asc),
        _ => None,
    };
    match (direction, toks.last()) {
        (Some(direction), Some(last)) => OrderByItem {
            field: item[..item.len() - last.len()].trim().to_string(),
            direction,
        },
        _ => OrderByItem {
            field: item.to_string(),
            direction: SortDirection::Asc,
        },
    }
}

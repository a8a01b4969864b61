// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Builder Synthesis
//!
//! Turns a lowered [`ClauseSet`] into the ordered builder calls. Synthesis is a
//! pure function of the clause set: it never renumbers parameters and never
//! fails. Missing clauses simply emit nothing.
//!
//! ## Emission Order
//!
//! | Kind   | Order                                                                           |
//! |--------|---------------------------------------------------------------------------------|
//! | SELECT | select, distinct, from*, joins, where chain, addGroupBy*, having, addOrderBy*, setMaxResults, setFirstResult |
//! | INSERT | insert, setValue* (or manualReview)                                             |
//! | UPDATE | update, set*, joins, where chain, addOrderBy*, setMaxResults                    |
//! | DELETE | delete, joins, where chain, addOrderBy*, setMaxResults                          |

use sql_fluent_ir::{
    Arg, Bound, BuilderOp, ClauseSet, InsertSource, JoinKind, LogicalOp, Method, StatementKind,
    TableRef,
};

/// Synthesize the builder calls for one statement
pub fn synthesize(clauses: &ClauseSet) -> Vec<BuilderOp> {
    let mut ops = Vec::new();

    match clauses.kind {
        StatementKind::Select => {
            if !clauses.select.is_empty() {
                ops.push(BuilderOp::new(Method::Select).with_args(clauses.select.iter().map(Arg::str)));
            }
            if clauses.distinct {
                ops.push(BuilderOp::new(Method::Distinct));
            }
            for table in clauses.table.iter().chain(&clauses.extra_tables) {
                ops.push(target_op(Method::From, table));
            }
            push_joins(&mut ops, clauses);
            push_where(&mut ops, clauses);
            for field in &clauses.group_by {
                ops.push(BuilderOp::new(Method::AddGroupBy).with_arg(Arg::str(field)));
            }
            if let Some(having) = &clauses.having {
                ops.push(BuilderOp::new(Method::Having).with_arg(Arg::str(having)));
            }
            push_order_by(&mut ops, clauses);
            push_limit(&mut ops, clauses);
            if let Some(offset) = &clauses.offset {
                ops.push(BuilderOp::new(Method::SetFirstResult).with_arg(bound_arg(offset)));
            }
        }
        StatementKind::Insert => {
            if let Some(table) = &clauses.table {
                ops.push(BuilderOp::new(Method::Insert).with_arg(Arg::str(&table.table)));
            }
            push_insert_values(&mut ops, clauses.insert.as_ref());
        }
        StatementKind::Update => {
            if let Some(table) = &clauses.table {
                ops.push(target_op(Method::Update, table));
            }
            for assignment in &clauses.set {
                ops.push(
                    BuilderOp::new(Method::Set)
                        .with_arg(Arg::str(&assignment.column))
                        .with_arg(Arg::value(&assignment.value)),
                );
            }
            push_joins(&mut ops, clauses);
            push_where(&mut ops, clauses);
            push_order_by(&mut ops, clauses);
            push_limit(&mut ops, clauses);
        }
        StatementKind::Delete => {
            if let Some(table) = &clauses.table {
                ops.push(target_op(Method::Delete, table));
            }
            push_joins(&mut ops, clauses);
            push_where(&mut ops, clauses);
            push_order_by(&mut ops, clauses);
            push_limit(&mut ops, clauses);
        }
    }

    ops
}

/// `from`/`update`/`delete` call; the alias is passed only when written
fn target_op(method: Method, table: &TableRef) -> BuilderOp {
    let op = BuilderOp::new(method).with_arg(Arg::str(&table.table));
    match (&table.alias, table.has_explicit_alias) {
        (Some(alias), true) => op.with_arg(Arg::str(alias)),
        _ => op,
    }
}

pub fn join_method(kind: JoinKind) -> Method {
    match kind {
        JoinKind::Inner => Method::InnerJoin,
        JoinKind::Left => Method::LeftJoin,
        JoinKind::Right => Method::RightJoin,
        JoinKind::Outer | JoinKind::Cross | JoinKind::Plain => Method::Join,
    }
}

fn push_joins(ops: &mut Vec<BuilderOp>, clauses: &ClauseSet) {
    let Some(main_alias) = clauses.main_alias() else {
        return;
    };
    for join in &clauses.joins {
        let mut op = BuilderOp::new(join_method(join.kind)).with_args([
            Arg::str(main_alias),
            Arg::str(&join.table.table),
            Arg::str(join.table.reference_name()),
        ]);
        if let Some(condition) = &join.condition {
            op = op.with_arg(Arg::str(condition));
        }
        ops.push(op);
    }
}

fn push_where(ops: &mut Vec<BuilderOp>, clauses: &ClauseSet) {
    for (i, condition) in clauses.where_conditions.iter().enumerate() {
        let method = match (i, condition.operator) {
            (0, _) => Method::Where,
            (_, Some(LogicalOp::Or)) => Method::OrWhere,
            (_, _) => Method::AndWhere,
        };
        ops.push(BuilderOp::new(method).with_arg(Arg::str(&condition.text)));
    }
}

fn push_order_by(ops: &mut Vec<BuilderOp>, clauses: &ClauseSet) {
    for item in &clauses.order_by {
        ops.push(
            BuilderOp::new(Method::AddOrderBy)
                .with_arg(Arg::str(&item.field))
                .with_arg(Arg::str(item.direction.keyword())),
        );
    }
}

fn push_limit(ops: &mut Vec<BuilderOp>, clauses: &ClauseSet) {
    if let Some(limit) = &clauses.limit {
        ops.push(BuilderOp::new(Method::SetMaxResults).with_arg(bound_arg(limit)));
    }
}

fn push_insert_values(ops: &mut Vec<BuilderOp>, source: Option<&InsertSource>) {
    match source {
        Some(InsertSource::Assignments(assignments)) => {
            for assignment in assignments {
                ops.push(
                    BuilderOp::new(Method::SetValue)
                        .with_arg(Arg::str(&assignment.column))
                        .with_arg(Arg::value(&assignment.value)),
                );
            }
        }
        Some(InsertSource::Positional(values)) => {
            for (position, value) in values.iter().enumerate() {
                ops.push(
                    BuilderOp::new(Method::SetValue)
                        .with_arg(Arg::int(position as u64))
                        .with_arg(Arg::value(value)),
                );
            }
        }
        Some(InsertSource::Select { columns, query }) => {
            let reason = if columns.is_empty() {
                "INSERT ... SELECT".to_string()
            } else {
                format!("INSERT ... SELECT into ({})", columns.join(", "))
            };
            ops.push(
                BuilderOp::new(Method::ManualReview)
                    .with_arg(Arg::str(reason))
                    .with_arg(Arg::str(query)),
            );
        }
        None => {}
    }
}

fn bound_arg(bound: &Bound) -> Arg {
    match bound {
        Bound::Literal(n) => Arg::int(*n),
        Bound::Param(p) => Arg::Param(*p),
    }
}

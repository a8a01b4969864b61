// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Tests for builder ops and clause sets

use sql_fluent_ir::op::embedded_params;
use sql_fluent_ir::{
    Arg, Bound, BuilderOp, ClauseSet, Condition, JoinDescriptor, JoinKind, LogicalOp, Method,
    ParamRef, StatementKind, TableRef,
};

#[test]
fn test_op_display() {
    let op = BuilderOp::new(Method::InnerJoin).with_args([
        Arg::str("p"),
        Arg::str("users"),
        Arg::str("u"),
        Arg::str("p.user_id = u.id"),
    ]);
    assert_eq!(op.to_string(), r#"innerJoin("p", "users", "u", "p.user_id = u.id")"#);

    let op = BuilderOp::new(Method::SetMaxResults).with_arg(Arg::int(10));
    assert_eq!(op.to_string(), "setMaxResults(10)");

    assert_eq!(BuilderOp::new(Method::Distinct).to_string(), "distinct()");
}

#[test]
fn test_value_arg() {
    assert_eq!(Arg::value(":param3"), Arg::Param(ParamRef(3)));
    assert_eq!(Arg::value(" NOW() "), Arg::str("NOW()"));
    // A placeholder inside an expression stays text
    assert_eq!(Arg::value(":param1 + 1"), Arg::str(":param1 + 1"));
    assert_eq!(Arg::value(":param0"), Arg::str(":param0"));
}

#[test]
fn test_param_indices() {
    let op = BuilderOp::new(Method::Set)
        .with_arg(Arg::str("total"))
        .with_arg(Arg::value(":param4"));
    assert_eq!(op.param_indices(), vec![4]);

    let op = BuilderOp::new(Method::Where).with_arg(Arg::str("a BETWEEN :param1 AND :param2"));
    assert_eq!(op.param_indices(), vec![1, 2]);
}

#[test]
fn test_embedded_params_skip_literals() {
    assert_eq!(embedded_params("a = ':param9' AND b = :param1"), vec![1]);
    assert_eq!(embedded_params(":param10, :param11"), vec![10, 11]);
    assert!(embedded_params("no params").is_empty());
}

#[test]
fn test_clause_set_builders() {
    let clauses = ClauseSet::new(StatementKind::Delete)
        .with_table(TableRef::new("posts").with_alias("p"))
        .with_joins([JoinDescriptor {
            kind: JoinKind::Left,
            table: TableRef::new("users"),
            condition: Some("users.id = p.user_id".to_string()),
        }])
        .with_where([
            Condition::first("users.id IS NULL"),
            Condition::new("p.created < :param1", Some(LogicalOp::And)),
        ])
        .with_limit(Bound::Literal(100));

    assert_eq!(clauses.main_alias(), Some("p"));
    assert_eq!(clauses.joins[0].table.reference_name(), "users");
    assert_eq!(clauses.where_conditions.len(), 2);
    assert_eq!(clauses.limit, Some(Bound::Literal(100)));
    assert_eq!(clauses.offset, None);
}

#[test]
fn test_table_ref_matching() {
    let table = TableRef::new("posts").with_alias("p");
    assert!(table.is_referred_by("P"));
    assert!(table.is_referred_by("posts"));
    assert!(!table.is_referred_by("users"));
}

#[test]
fn test_op_json_shape() {
    let op = BuilderOp::new(Method::SetFirstResult).with_arg(Arg::Param(ParamRef(2)));
    let json = serde_json::to_value(&op).unwrap();
    assert_eq!(json["method"], "setFirstResult");
    assert_eq!(json["args"][0]["Param"], 2);
}

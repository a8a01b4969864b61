// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Fluent - Intermediate Representation
//!
//! This crate provides the Intermediate Representation (IR) shared by the
//! SQL-to-query-builder translator. The IR has two layers:
//! - [`ClauseSet`]: the structured clauses of one statement, produced by lowering
//! - [`BuilderOp`]: the ordered fluent builder calls, produced by synthesis
//!
//! Both layers are plain data: created fresh per statement and never mutated
//! after they are produced.

pub mod clause;
pub mod op;
pub mod statement;

// Re-export commonly used types
pub use clause::{
    Assignment, Bound, ClauseSet, Condition, InsertSource, JoinDescriptor, JoinKind, LogicalOp,
    OrderByItem, SortDirection, TableRef,
};
pub use op::{Arg, BuilderOp, Literal, Method, ParamRef};
pub use statement::{StatementKind, UnknownStatementKind};

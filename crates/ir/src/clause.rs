// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Clause Representation
//!
//! This module represents the structured result of lowering one SQL statement:
//! the [`ClauseSet`].
//!
//! ## Design
//!
//! Lowering slices the statement into clauses and resolves each into a typed
//! descriptor. Parameter placeholders are already renumbered (`:paramN`) in
//! every text field, so the synthesis pass that turns a `ClauseSet` into
//! builder calls never touches parameter numbering.
//!
//! ## Table References and Joins
//!
//! [`TableRef`] carries a table name, an optional alias, and whether the alias
//! was written in the source:
//!
//! ```sql
//! FROM users            -- alias: None,      has_explicit_alias: false
//! FROM users u          -- alias: Some("u"), has_explicit_alias: true
//! FROM users AS u       -- alias: Some("u"), has_explicit_alias: true
//! ```
//!
//! [`JoinDescriptor`] keeps joins in source order:
//!
//! ```sql
//! FROM posts p
//! INNER JOIN users u ON p.user_id = u.id
//! LEFT JOIN tags t ON t.post_id = p.id
//! ```
//!
//! ## Conditions
//!
//! [`Condition`] stores the raw condition text and the logical operator that
//! preceded it. The first condition of a clause has no operator:
//!
//! ```text
//! a = 1 AND (b = 2 OR c = 3)
//! => [("a = 1", None), ("(b = 2 OR c = 3)", Some(And))]
//! ```

use serde::{Deserialize, Serialize};

use crate::op::ParamRef;
use crate::statement::StatementKind;

/// Table reference with optional alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    /// Table name (may include a database prefix, e.g. `shop.orders`)
    pub table: String,

    /// Alias, when one was written in the source
    pub alias: Option<String>,

    /// Whether the alias was written in the source text
    pub has_explicit_alias: bool,
}

impl TableRef {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            has_explicit_alias: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self.has_explicit_alias = true;
        self
    }

    /// The name other clauses use to refer to this table
    ///
    /// This is the alias when one was written, otherwise the table name.
    pub fn reference_name(&self) -> &str {
        match (&self.alias, self.has_explicit_alias) {
            (Some(alias), true) => alias,
            _ => &self.table,
        }
    }

    /// Check whether `name` refers to this table (alias or table name)
    pub fn is_referred_by(&self, name: &str) -> bool {
        self.reference_name().eq_ignore_ascii_case(name) || self.table.eq_ignore_ascii_case(name)
    }
}

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
    Cross,
    /// Unqualified `JOIN`
    Plain,
}

/// A JOIN clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinDescriptor {
    pub kind: JoinKind,

    pub table: TableRef,

    /// ON condition text; `None` for joins written without ON (CROSS JOIN)
    pub condition: Option<String>,
}

/// Logical operator joining two conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

/// One condition of a WHERE clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,

    /// Operator that preceded this condition (`None` for the first one)
    pub operator: Option<LogicalOp>,
}

impl Condition {
    pub fn new(text: impl Into<String>, operator: Option<LogicalOp>) -> Self {
        Self {
            text: text.into(),
            operator,
        }
    }

    pub fn first(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// ORDER BY item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub field: String,
    pub direction: SortDirection,
}

/// LIMIT / OFFSET value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound {
    Literal(u64),
    Param(ParamRef),
}

/// `column = value` pair from a SET clause or a column/value list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub value: String,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Values of an INSERT statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertSource {
    /// `(cols) VALUES (vals)` or `SET col = val, ...`
    Assignments(Vec<Assignment>),

    /// `VALUES (vals)` without a column list; values bound by position
    Positional(Vec<String>),

    /// `[(cols)] SELECT ...`; kept as renumbered text for manual review
    Select {
        columns: Vec<String>,
        query: String,
    },
}

/// All clauses extracted from one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseSet {
    pub kind: StatementKind,

    /// SELECT DISTINCT
    pub distinct: bool,

    /// SELECT list items
    pub select: Vec<String>,

    /// Main table (FROM of SELECT, target of INSERT/UPDATE/DELETE)
    pub table: Option<TableRef>,

    /// Further comma-separated FROM tables
    pub extra_tables: Vec<TableRef>,

    pub joins: Vec<JoinDescriptor>,

    pub where_conditions: Vec<Condition>,

    pub group_by: Vec<String>,

    pub having: Option<String>,

    pub order_by: Vec<OrderByItem>,

    pub limit: Option<Bound>,

    pub offset: Option<Bound>,

    /// SET pairs of an UPDATE
    pub set: Vec<Assignment>,

    /// Values of an INSERT
    pub insert: Option<InsertSource>,
}

impl ClauseSet {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            distinct: false,
            select: Vec::new(),
            table: None,
            extra_tables: Vec::new(),
            joins: Vec::new(),
            where_conditions: Vec::new(),
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            set: Vec::new(),
            insert: None,
        }
    }

    pub fn with_table(mut self, table: TableRef) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_joins(mut self, joins: impl IntoIterator<Item = JoinDescriptor>) -> Self {
        self.joins = joins.into_iter().collect();
        self
    }

    pub fn with_where(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.where_conditions = conditions.into_iter().collect();
        self
    }

    pub fn with_limit(mut self, limit: Bound) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: Bound) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Name joins use to refer to the main table
    pub fn main_alias(&self) -> Option<&str> {
        self.table.as_ref().map(TableRef::reference_name)
    }
}

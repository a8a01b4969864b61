// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Builder Operations
//!
//! This module represents the synthesized program: an ordered list of fluent
//! query-builder calls.
//!
//! ## Design
//!
//! A [`BuilderOp`] is one call on the query builder, e.g.
//!
//! ```text
//! where("age > :param1")
//! setValue("name", :param1)
//! setMaxResults(10)
//! ```
//!
//! Arguments are either literals ([`Literal`]) or references to a named
//! parameter ([`ParamRef`]). Condition text that embeds placeholders stays a
//! string literal; a value that is exactly one placeholder becomes a
//! [`Arg::Param`] so the code generator can emit it without quoting.
//!
//! ## Rendering
//!
//! `Display` renders an op the way it reads in a review: strings are double
//! quoted, parameters are printed as `:paramN`, integers are bare.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Builder method names
///
/// The set is closed: the synthesis pass only ever emits these calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    Select,
    Distinct,
    From,
    Join,
    InnerJoin,
    LeftJoin,
    RightJoin,
    Where,
    AndWhere,
    OrWhere,
    AddGroupBy,
    Having,
    AddOrderBy,
    SetMaxResults,
    SetFirstResult,
    Insert,
    SetValue,
    Update,
    Set,
    Delete,
    /// Sentinel: the statement holds a construct that needs a human rewrite
    ManualReview,
}

impl Method {
    /// The method name as it appears in the generated builder chain
    pub fn name(self) -> &'static str {
        match self {
            Method::Select => "select",
            Method::Distinct => "distinct",
            Method::From => "from",
            Method::Join => "join",
            Method::InnerJoin => "innerJoin",
            Method::LeftJoin => "leftJoin",
            Method::RightJoin => "rightJoin",
            Method::Where => "where",
            Method::AndWhere => "andWhere",
            Method::OrWhere => "orWhere",
            Method::AddGroupBy => "addGroupBy",
            Method::Having => "having",
            Method::AddOrderBy => "addOrderBy",
            Method::SetMaxResults => "setMaxResults",
            Method::SetFirstResult => "setFirstResult",
            Method::Insert => "insert",
            Method::SetValue => "setValue",
            Method::Update => "update",
            Method::Set => "set",
            Method::Delete => "delete",
            Method::ManualReview => "manualReview",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference to a named parameter (`:paramN`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamRef(pub usize);

impl ParamRef {
    /// Placeholder prefix used for every renumbered parameter
    pub const PREFIX: &'static str = ":param";

    /// 1-based parameter index
    pub fn index(self) -> usize {
        self.0
    }

    /// Parse a string that is exactly one placeholder (`:param3`)
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.trim().strip_prefix(Self::PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().filter(|&n| n > 0).map(ParamRef)
    }
}

impl fmt::Display for ParamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

/// Literal argument value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    /// Raw SQL text (column, expression, condition)
    String(String),
    /// Non-negative integer (LIMIT/OFFSET, positional column index)
    Integer(u64),
}

/// Argument of a builder call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arg {
    Literal(Literal),
    Param(ParamRef),
}

impl Arg {
    /// String literal argument
    pub fn str(text: impl Into<String>) -> Self {
        Arg::Literal(Literal::String(text.into()))
    }

    /// Integer literal argument
    pub fn int(value: u64) -> Self {
        Arg::Literal(Literal::Integer(value))
    }

    /// Value argument: a bare placeholder becomes a parameter reference,
    /// anything else stays an SQL expression string
    pub fn value(text: &str) -> Self {
        match ParamRef::parse(text) {
            Some(param) => Arg::Param(param),
            None => Arg::str(text.trim()),
        }
    }

    /// Text of a string literal argument
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Literal(Literal::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Literal(Literal::String(s)) => write!(f, "{:?}", s),
            Arg::Literal(Literal::Integer(n)) => write!(f, "{}", n),
            Arg::Param(p) => write!(f, "{}", p),
        }
    }
}

/// One fluent builder call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderOp {
    pub method: Method,
    pub args: Vec<Arg>,
}

impl BuilderOp {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.args.extend(args);
        self
    }

    /// Every parameter index mentioned by this op, either as a bare
    /// parameter argument or embedded in string arguments
    pub fn param_indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        for arg in &self.args {
            match arg {
                Arg::Param(p) => indices.push(p.index()),
                Arg::Literal(Literal::String(s)) => indices.extend(embedded_params(s)),
                Arg::Literal(Literal::Integer(_)) => {}
            }
        }
        indices
    }
}

impl fmt::Display for BuilderOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.method)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

/// Indices of `:paramN` placeholders embedded in a text, left to right
///
/// Quoted literals are not inspected: the renumbering pass never writes
/// placeholders inside them.
pub fn embedded_params(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let prefix = ParamRef::PREFIX.as_bytes();
    let mut found = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' && q != b'`' {
                    i += 2;
                    continue;
                }
                if b == q {
                    quote = None;
                }
            }
            None if matches!(b, b'\'' | b'"' | b'`') => quote = Some(b),
            None if bytes[i..].starts_with(prefix) => {
                let start = i + prefix.len();
                let end = bytes[start..]
                    .iter()
                    .position(|c| !c.is_ascii_digit())
                    .map_or(bytes.len(), |p| start + p);
                if end > start {
                    if let Ok(n) = text[start..end].parse() {
                        found.push(n);
                    }
                    i = end;
                    continue;
                }
            }
            None => {}
        }
        i += 1;
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_ref_parse() {
        assert_eq!(ParamRef::parse(":param3"), Some(ParamRef(3)));
        assert_eq!(ParamRef::parse(" :param12 "), Some(ParamRef(12)));
        assert_eq!(ParamRef::parse(":param"), None);
        assert_eq!(ParamRef::parse(":param0"), None);
        assert_eq!(ParamRef::parse("x = :param1"), None);
    }

    #[test]
    fn test_arg_value() {
        assert_eq!(Arg::value(":param2"), Arg::Param(ParamRef(2)));
        assert_eq!(Arg::value(" NOW() "), Arg::str("NOW()"));
    }

    #[test]
    fn test_op_display() {
        let op = BuilderOp::new(Method::InnerJoin).with_args([
            Arg::str("p"),
            Arg::str("users"),
            Arg::str("u"),
            Arg::str("p.user_id = u.id"),
        ]);
        assert_eq!(
            op.to_string(),
            r#"innerJoin("p", "users", "u", "p.user_id = u.id")"#
        );

        let op = BuilderOp::new(Method::SetValue).with_args([Arg::str("age"), Arg::Param(ParamRef(2))]);
        assert_eq!(op.to_string(), r#"setValue("age", :param2)"#);

        let op = BuilderOp::new(Method::SetMaxResults).with_arg(Arg::int(10));
        assert_eq!(op.to_string(), "setMaxResults(10)");
    }

    #[test]
    fn test_embedded_params() {
        assert_eq!(embedded_params("a = :param1 AND b IN (:param2, :param3)"), vec![1, 2, 3]);
        assert_eq!(embedded_params("note = ':param9'"), Vec::<usize>::new());
        assert_eq!(embedded_params(":param"), Vec::<usize>::new());
    }

    #[test]
    fn test_param_indices() {
        let op = BuilderOp::new(Method::Set).with_args([Arg::str("total"), Arg::str("total + :param4")]);
        assert_eq!(op.param_indices(), vec![4]);
    }

    #[test]
    fn test_method_serialization() {
        let json = serde_json::to_string(&Method::AndWhere).unwrap();
        assert_eq!(json, "\"andWhere\"");
    }
}

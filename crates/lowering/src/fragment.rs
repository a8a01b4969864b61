// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SQL source fragments as found at a call site
//!
//! The harness that reads host source code describes the SQL argument of a
//! `prepare()`/`query()` call as a [`SqlFragment`]: a literal, a concatenation,
//! or an expression only known at runtime. Only fully literal fragments can be
//! converted; anything dynamic is declined.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LoweringError, LoweringResult};

/// SQL argument of a call site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SqlFragment {
    /// String literal
    Literal { value: String },

    /// Concatenation of fragments (`'a' . 'b'`)
    Concat { parts: Vec<SqlFragment> },

    /// Runtime expression (variable, call, interpolation)
    Dynamic { expression: String },
}

impl SqlFragment {
    pub fn literal(value: impl Into<String>) -> Self {
        SqlFragment::Literal {
            value: value.into(),
        }
    }

    pub fn concat(parts: impl IntoIterator<Item = SqlFragment>) -> Self {
        SqlFragment::Concat {
            parts: parts.into_iter().collect(),
        }
    }

    pub fn dynamic(expression: impl Into<String>) -> Self {
        SqlFragment::Dynamic {
            expression: expression.into(),
        }
    }

    /// Whether the fragment contains no runtime part
    pub fn is_static(&self) -> bool {
        match self {
            SqlFragment::Literal { .. } => true,
            SqlFragment::Concat { parts } => parts.iter().all(SqlFragment::is_static),
            SqlFragment::Dynamic { .. } => false,
        }
    }

    /// Fold the fragment into SQL text
    ///
    /// Fails with [`LoweringError::UnsupportedFragment`] on the first runtime part.
    pub fn resolve(&self) -> LoweringResult<String> {
        let mut out = String::new();
        self.resolve_into(&mut out)?;
        Ok(out)
    }

    fn resolve_into(&self, out: &mut String) -> LoweringResult<()> {
        match self {
            SqlFragment::Literal { value } => out.push_str(value),
            SqlFragment::Concat { parts } => {
                for part in parts {
                    part.resolve_into(out)?;
                }
            }
            SqlFragment::Dynamic { expression } => {
                return Err(LoweringError::UnsupportedFragment {
                    reason: format!("SQL depends on runtime expression `{}`", expression),
                });
            }
        }
        Ok(())
    }
}

/// Source-like rendering: literals as written, runtime parts as `{expr}`
impl fmt::Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlFragment::Literal { value } => f.write_str(value),
            SqlFragment::Concat { parts } => parts.iter().try_for_each(|part| write!(f, "{}", part)),
            SqlFragment::Dynamic { expression } => write!(f, "{{{}}}", expression),
        }
    }
}

impl From<&str> for SqlFragment {
    fn from(value: &str) -> Self {
        SqlFragment::literal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_resolves() {
        let frag = SqlFragment::literal("SELECT 1");
        assert_eq!(frag.resolve().unwrap(), "SELECT 1");
        assert!(frag.is_static());
    }

    #[test]
    fn test_literal_concat_resolves() {
        let frag = SqlFragment::concat([
            SqlFragment::literal("SELECT * FROM users "),
            SqlFragment::concat([SqlFragment::literal("WHERE id = ?")]),
        ]);
        assert_eq!(frag.resolve().unwrap(), "SELECT * FROM users WHERE id = ?");
    }

    #[test]
    fn test_dynamic_part_declines() {
        let frag = SqlFragment::concat([
            SqlFragment::literal("SELECT * FROM "),
            SqlFragment::dynamic("$table"),
        ]);
        assert!(!frag.is_static());
        match frag.resolve() {
            Err(LoweringError::UnsupportedFragment { reason }) => {
                assert!(reason.contains("$table"));
            }
            other => panic!("Expected UnsupportedFragment, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let frag = SqlFragment::concat([
            SqlFragment::literal("SELECT * FROM "),
            SqlFragment::dynamic("$table"),
        ]);
        assert_eq!(frag.to_string(), "SELECT * FROM {$table}");
    }

    #[test]
    fn test_json_shape() {
        let frag: SqlFragment = serde_json::from_str(
            r#"{"type": "concat", "parts": [{"type": "literal", "value": "SELECT "}, {"type": "dynamic", "expression": "$cols"}]}"#,
        )
        .unwrap();
        assert!(!frag.is_static());
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! YAML test case format parser
//!
//! A case file holds one or more YAML documents separated by `---`, one
//! conversion case each:
//!
//! ```yaml
//! description: Simple WHERE chain
//! sql: SELECT * FROM users WHERE age > ? AND name = ?
//! expect: success
//! params: 2
//! ops:
//!   - select("*")
//!   - from("users")
//!   - where("age > :param1")
//!   - andWhere("name = :param2")
//! ---
//! description: UNION is declined
//! sql: SELECT a FROM t UNION SELECT a FROM u
//! expect: declined
//! error: UnsupportedConstruct
//! ```
//!
//! `ops` lists builder calls in their `Display` form. `contains` may be used
//! instead when only some calls matter.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// A single test case definition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCase {
    pub description: String,
    pub sql: String,
    pub expect: ExpectedOutcome,

    /// Exact op list, in order
    #[serde(default)]
    pub ops: Option<Vec<String>>,

    /// Ops that must appear somewhere in the result
    #[serde(default)]
    pub contains: Vec<String>,

    /// Expected parameter count
    #[serde(default)]
    pub params: Option<usize>,

    /// Expected error variant name for declined cases
    #[serde(default)]
    pub error: Option<String>,
}

/// Expected outcome of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedOutcome {
    Success,
    Partial,
    Declined,
}

impl fmt::Display for ExpectedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedOutcome::Success => write!(f, "success"),
            ExpectedOutcome::Partial => write!(f, "partial"),
            ExpectedOutcome::Declined => write!(f, "declined"),
        }
    }
}

/// Parse errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML in case {index}: {source}")]
    Yaml {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Case '{0}' has an empty sql field")]
    EmptySql(String),

    #[error("Empty test case file")]
    EmptyFile,
}

/// Parse a test case file
pub fn parse_test_file(path: &Path) -> Result<Vec<TestCase>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_test_content(&content)
}

/// Parse test case content from a string
pub fn parse_test_content(content: &str) -> Result<Vec<TestCase>, ParseError> {
    let mut cases = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = serde_yaml::Value::deserialize(document)
            .map_err(|source| ParseError::Yaml { index, source })?;
        if value.is_null() {
            continue;
        }
        let case: TestCase =
            serde_yaml::from_value(value).map_err(|source| ParseError::Yaml { index, source })?;
        if case.sql.trim().is_empty() {
            return Err(ParseError::EmptySql(case.description));
        }
        cases.push(case);
    }

    if cases.is_empty() {
        return Err(ParseError::EmptyFile);
    }
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_case() {
        let content = r#"
description: Simple select
sql: SELECT * FROM users
expect: success
ops:
  - select("*")
  - from("users")
"#;
        let cases = parse_test_content(content).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].description, "Simple select");
        assert_eq!(cases[0].expect, ExpectedOutcome::Success);
        assert_eq!(
            cases[0].ops.as_deref(),
            Some(&["select(\"*\")".to_string(), "from(\"users\")".to_string()][..])
        );
        assert!(cases[0].contains.is_empty());
    }

    #[test]
    fn test_parse_multiple_cases() {
        let content = r#"
description: First
sql: SELECT 1
expect: success
---
description: Second
sql: |
  SELECT a
  FROM t UNION SELECT b FROM u
expect: declined
error: UnsupportedConstruct
"#;
        let cases = parse_test_content(content).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[1].expect, ExpectedOutcome::Declined);
        assert_eq!(cases[1].error.as_deref(), Some("UnsupportedConstruct"));
        assert!(cases[1].sql.contains("UNION"));
    }

    #[test]
    fn test_invalid_outcome() {
        let content = "description: x\nsql: SELECT 1\nexpect: maybe\n";
        assert!(matches!(
            parse_test_content(content),
            Err(ParseError::Yaml { index: 0, .. })
        ));
    }

    #[test]
    fn test_empty_sql() {
        let content = "description: x\nsql: '  '\nexpect: success\n";
        assert!(matches!(parse_test_content(content), Err(ParseError::EmptySql(_))));
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse_test_content(""), Err(ParseError::EmptyFile)));
    }
}

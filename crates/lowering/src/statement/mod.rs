// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Statement classification and per-kind lowering implementations

pub mod base;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use base::{Sources, StatementLoweringBase};
pub use delete::DeleteLowering;
pub use insert::InsertLowering;
pub use select::SelectLowering;
pub use update::UpdateLowering;

use sql_fluent_ir::StatementKind;

use crate::StatementLowering;
use crate::clauses::leading_keyword;
use crate::error::{LoweringError, LoweringResult};
use crate::scanner::find_keyword;

/// Classify a normalized statement by its leading keyword
///
/// A leading `WITH` (common table expression) and a top-level `UNION` are
/// declined for every kind.
pub fn classify(sql: &str) -> LoweringResult<StatementKind> {
    let keyword = leading_keyword(sql);
    if keyword == "WITH" {
        return Err(LoweringError::unsupported("common table expression", "statement"));
    }
    let kind = keyword
        .parse::<StatementKind>()
        .map_err(|_| LoweringError::UnrecognizedStatementKind {
            keyword: keyword.clone(),
        })?;
    if find_keyword(sql, "UNION").is_some() {
        return Err(LoweringError::unsupported("UNION", "statement"));
    }
    Ok(kind)
}

/// Lowering implementation for a statement kind
pub fn lowering_for(kind: StatementKind) -> &'static dyn StatementLowering {
    match kind {
        StatementKind::Select => &SelectLowering,
        StatementKind::Insert => &InsertLowering,
        StatementKind::Update => &UpdateLowering,
        StatementKind::Delete => &DeleteLowering,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_verbs() {
        assert_eq!(classify("select * from t").unwrap(), StatementKind::Select);
        assert_eq!(classify("INSERT INTO t VALUES (1)").unwrap(), StatementKind::Insert);
        assert_eq!(classify("Update t SET a = 1").unwrap(), StatementKind::Update);
        assert_eq!(classify("DELETE FROM t").unwrap(), StatementKind::Delete);
    }

    #[test]
    fn test_classify_unrecognized() {
        match classify("REPLACE INTO t VALUES (?)") {
            Err(LoweringError::UnrecognizedStatementKind { keyword }) => {
                assert_eq!(keyword, "REPLACE")
            }
            other => panic!("Expected UnrecognizedStatementKind, got {:?}", other),
        }
        assert!(matches!(
            classify(""),
            Err(LoweringError::UnrecognizedStatementKind { .. })
        ));
    }

    #[test]
    fn test_classify_declines_cte_and_union() {
        assert!(matches!(
            classify("WITH x AS (SELECT 1) SELECT * FROM x"),
            Err(LoweringError::UnsupportedConstruct { .. })
        ));
        assert!(matches!(
            classify("SELECT a FROM t UNION SELECT a FROM u"),
            Err(LoweringError::UnsupportedConstruct { .. })
        ));
        assert!(classify("SELECT a FROM t WHERE a IN (SELECT a FROM u UNION SELECT 1)").is_ok());
    }

    #[test]
    fn test_lowering_for_matches_kind() {
        for kind in [
            StatementKind::Select,
            StatementKind::Insert,
            StatementKind::Update,
            StatementKind::Delete,
        ] {
            assert_eq!(lowering_for(kind).kind(), kind);
        }
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types and handling strategy for the lowering layer

use serde::Serialize;

use crate::scanner::ScanError;

/// Result type alias for lowering operations
pub type LoweringResult<T> = Result<T, LoweringError>;

/// Outcome of a conversion
///
/// Represents the three possible states after attempting to convert a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LoweringOutcome {
    /// Complete success - every clause converted
    Success,

    /// Partial success - ops were emitted but something was dropped or needs review
    /// Contains the recoverable errors recorded during conversion
    Partial(Vec<LoweringError>),

    /// Declined - the original code must be left untouched
    Failed(LoweringError),
}

/// Errors that can occur while converting SQL to builder operations
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum LoweringError {
    /// The SQL text could not be statically extracted or is structurally broken
    #[error("Unsupported SQL fragment: {reason}")]
    UnsupportedFragment { reason: String },

    /// The statement keyword is not SELECT, INSERT, UPDATE or DELETE
    #[error("Unrecognized statement kind: '{keyword}'")]
    UnrecognizedStatementKind { keyword: String },

    /// A construct the synthesizer cannot express (subquery, UNION, CTE, ...)
    #[error("Unsupported construct in {position}: {construct}")]
    UnsupportedConstruct { construct: String, position: String },

    /// A clause matched its keyword but could not be parsed
    #[error("Malformed {clause} clause near '{fragment}': {message}")]
    MalformedClause {
        clause: String,
        fragment: String,
        message: String,
    },

    /// Converted, but the result needs a human decision
    #[error("Ambiguous syntax: {message}. Consider {suggestion}")]
    AmbiguousSyntax { message: String, suggestion: String },

    /// Placeholder numbering does not cover every `?` of the statement
    #[error("Parameter count mismatch: statement has {expected} placeholder(s), conversion numbered {found}")]
    ParameterMismatch { expected: usize, found: usize },
}

impl LoweringError {
    pub fn malformed(
        clause: impl Into<String>,
        fragment: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LoweringError::MalformedClause {
            clause: clause.into(),
            fragment: fragment.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(construct: impl Into<String>, position: impl Into<String>) -> Self {
        LoweringError::UnsupportedConstruct {
            construct: construct.into(),
            position: position.into(),
        }
    }

    /// Check if this error is recoverable (allows partial success)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LoweringError::MalformedClause { .. } | LoweringError::AmbiguousSyntax { .. }
        )
    }

    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LoweringError::UnsupportedFragment { .. } => ErrorSeverity::Error,
            LoweringError::UnrecognizedStatementKind { .. } => ErrorSeverity::Error,
            LoweringError::UnsupportedConstruct { .. } => ErrorSeverity::Error,
            LoweringError::ParameterMismatch { .. } => ErrorSeverity::Error,
            LoweringError::MalformedClause { .. } => ErrorSeverity::Warning,
            LoweringError::AmbiguousSyntax { .. } => ErrorSeverity::Info,
        }
    }
}

impl From<ScanError> for LoweringError {
    fn from(err: ScanError) -> Self {
        LoweringError::UnsupportedFragment {
            reason: format!("unscannable syntax: {}", err),
        }
    }
}

/// Severity level for lowering errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ErrorSeverity {
    /// Informational note (e.g., ambiguous syntax)
    Info,
    /// Warning (e.g., a clause part that was dropped)
    Warning,
    /// Error (the statement is declined)
    Error,
}

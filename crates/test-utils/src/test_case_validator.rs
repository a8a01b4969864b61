// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test case validation logic
//!
//! This module checks conversion results against the expectations of a
//! [`TestCase`].

use sql_fluent_lowering::{Conversion, LoweringError, LoweringResult};
use thiserror::Error;

use crate::test_case_parser::{ExpectedOutcome, TestCase};

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Expected {expected}, got {actual}")]
    OutcomeMismatch { expected: ExpectedOutcome, actual: String },

    #[error("Expected error {expected}, got {actual}")]
    ErrorMismatch { expected: String, actual: String },

    #[error("Expected {expected} parameter(s), got {actual}")]
    ParamCountMismatch { expected: usize, actual: usize },

    #[error("Op list mismatch:\n  expected: {expected:?}\n  actual:   {actual:?}")]
    OpsMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Missing op {missing} in {actual:?}")]
    MissingOp { missing: String, actual: Vec<String> },
}

/// Name of an error variant, as written in case files
pub fn error_name(err: &LoweringError) -> &'static str {
    match err {
        LoweringError::UnsupportedFragment { .. } => "UnsupportedFragment",
        LoweringError::UnrecognizedStatementKind { .. } => "UnrecognizedStatementKind",
        LoweringError::UnsupportedConstruct { .. } => "UnsupportedConstruct",
        LoweringError::MalformedClause { .. } => "MalformedClause",
        LoweringError::AmbiguousSyntax { .. } => "AmbiguousSyntax",
        LoweringError::ParameterMismatch { .. } => "ParameterMismatch",
    }
}

/// Validate a conversion result against a test case
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ValidationError)` describing the first mismatch
pub fn validate_conversion(
    result: &LoweringResult<Conversion>,
    case: &TestCase,
) -> Result<(), ValidationError> {
    let conversion = match (result, case.expect) {
        (Err(err), ExpectedOutcome::Declined) => {
            return match &case.error {
                Some(expected) if expected != error_name(err) => Err(ValidationError::ErrorMismatch {
                    expected: expected.clone(),
                    actual: err.to_string(),
                }),
                _ => Ok(()),
            };
        }
        (Err(err), expected) => {
            return Err(ValidationError::OutcomeMismatch {
                expected,
                actual: format!("declined ({})", err),
            });
        }
        (Ok(conversion), ExpectedOutcome::Declined) => {
            return Err(ValidationError::OutcomeMismatch {
                expected: ExpectedOutcome::Declined,
                actual: format!("{} op(s)", conversion.ops.len()),
            });
        }
        (Ok(conversion), expected) => {
            let actual_partial = conversion.is_partial();
            if actual_partial != (expected == ExpectedOutcome::Partial) {
                return Err(ValidationError::OutcomeMismatch {
                    expected,
                    actual: if actual_partial { "partial" } else { "success" }.to_string(),
                });
            }
            conversion
        }
    };

    if let Some(expected) = case.params.filter(|&n| n != conversion.param_count) {
        return Err(ValidationError::ParamCountMismatch {
            expected,
            actual: conversion.param_count,
        });
    }

    let actual: Vec<String> = conversion.ops.iter().map(ToString::to_string).collect();

    if let Some(expected) = case.ops.as_ref().filter(|ops| **ops != actual) {
        return Err(ValidationError::OpsMismatch {
            expected: expected.clone(),
            actual,
        });
    }

    for op in &case.contains {
        if !actual.contains(op) {
            return Err(ValidationError::MissingOp {
                missing: op.clone(),
                actual,
            });
        }
    }

    Ok(())
}

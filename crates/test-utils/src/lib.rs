// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for sql-fluent
//!
//! This crate provides common testing components including:
//! - Builder-op assertions for conversion tests
//! - Test fixtures and sample statements
//! - A YAML case-file format for data-driven conversion tests

pub mod assertions;
pub mod fixtures;
pub mod test_case_parser;
pub mod test_case_validator;

// Re-exports for convenience
pub use assertions::OpAssertions;
pub use fixtures::SqlFixtures;
pub use test_case_parser::{ExpectedOutcome, TestCase, parse_test_content, parse_test_file};
pub use test_case_validator::{ValidationError, validate_conversion};

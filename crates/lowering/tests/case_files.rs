// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Data-driven conversion tests
//!
//! Every YAML document under `tests/cases/` is converted and checked with
//! [`validate_conversion`].

use std::path::{Path, PathBuf};

use sql_fluent_lowering::Converter;
use sql_fluent_test_utils::{parse_test_file, validate_conversion};

fn case_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("cases")
        .join(name)
}

fn run_case_file(name: &str) {
    let path = case_file(name);
    let cases = parse_test_file(&path)
        .unwrap_or_else(|err| panic!("Failed to parse {}: {}", path.display(), err));
    let converter = Converter::default();

    let failures: Vec<String> = cases
        .iter()
        .filter_map(|case| {
            let result = converter.convert_sql(&case.sql);
            validate_conversion(&result, case)
                .err()
                .map(|err| format!("{}: {}", case.description, err))
        })
        .collect();

    assert!(
        failures.is_empty(),
        "{} of {} case(s) in {} failed:\n{}",
        failures.len(),
        cases.len(),
        name,
        failures.join("\n")
    );
}

#[test]
fn test_select_cases() {
    run_case_file("select.yaml");
}

#[test]
fn test_insert_cases() {
    run_case_file("insert.yaml");
}

#[test]
fn test_update_cases() {
    run_case_file("update.yaml");
}

#[test]
fn test_delete_cases() {
    run_case_file("delete.yaml");
}

#[test]
fn test_declined_cases() {
    run_case_file("declined.yaml");
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Builder-op test helpers and custom assertions

use sql_fluent_ir::{BuilderOp, Method};
use sql_fluent_lowering::Conversion;

/// Custom assertion helpers for conversion testing
pub struct OpAssertions;

impl OpAssertions {
    /// Render ops in their `Display` form
    pub fn render(ops: &[BuilderOp]) -> Vec<String> {
        ops.iter().map(ToString::to_string).collect()
    }

    /// Assert the exact op list of a conversion
    pub fn assert_ops(conversion: &Conversion, expected: &[&str]) {
        let actual = Self::render(&conversion.ops);
        assert_eq!(actual, expected, "Op list mismatch");
    }

    /// Assert that an op appears in a conversion
    pub fn assert_contains(conversion: &Conversion, expected: &str) {
        let actual = Self::render(&conversion.ops);
        assert!(
            actual.iter().any(|op| op == expected),
            "Expected op {} in {:?}",
            expected,
            actual
        );
    }

    /// Assert that the first op with `first` comes before the first op with `second`
    pub fn assert_before(conversion: &Conversion, first: Method, second: Method) {
        let position = |method: Method| {
            conversion
                .ops
                .iter()
                .position(|op| op.method == method)
                .unwrap_or_else(|| panic!("No {} op in {:?}", method, conversion.ops))
        };
        assert!(
            position(first) < position(second),
            "Expected {} before {}",
            first,
            second
        );
    }

    /// Assert that the `:paramN` references, in emission order, are exactly
    /// `1..=param_count`
    pub fn assert_params_sequential(conversion: &Conversion) {
        let indices: Vec<usize> = conversion
            .ops
            .iter()
            .flat_map(BuilderOp::param_indices)
            .collect();
        let expected: Vec<usize> = (1..=conversion.param_count).collect();
        assert_eq!(indices, expected, "Parameters are not numbered in order");
    }

    /// Number of ops calling `method`
    pub fn count(conversion: &Conversion, method: Method) -> usize {
        conversion.ops.iter().filter(|op| op.method == method).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sql_fluent_lowering::Converter;

    #[test]
    fn test_assert_helpers() {
        let conversion = Converter::default()
            .convert_sql("SELECT * FROM users WHERE a = ? OR b = ?")
            .unwrap();
        OpAssertions::assert_contains(&conversion, r#"orWhere("b = :param2")"#);
        OpAssertions::assert_before(&conversion, Method::From, Method::Where);
        OpAssertions::assert_params_sequential(&conversion);
        assert_eq!(OpAssertions::count(&conversion, Method::OrWhere), 1);
    }

    #[test]
    #[should_panic(expected = "Op list mismatch")]
    fn test_assert_ops_mismatch() {
        let conversion = Converter::default().convert_sql("SELECT 1").unwrap();
        OpAssertions::assert_ops(&conversion, &["select(\"2\")"]);
    }
}

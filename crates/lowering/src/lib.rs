// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Fluent - Lowering Layer
//!
//! This crate converts positional-parameter SQL text into an ordered list of
//! fluent query-builder calls.
//!
//! ## Overview
//!
//! The lowering layer is responsible for:
//! - Scanning SQL with quote and parenthesis awareness
//! - Slicing statements into clauses and resolving tables, joins and conditions
//! - Renumbering `?` placeholders into `:paramN` in source order
//! - Synthesizing [`BuilderOp`]s from the lowered clauses
//!
//! ## Conversion Process
//!
//! ```text
//! SqlFragment → SQL text → NormalizedSql → ClauseSet → Vec<BuilderOp>
//!                          (classify)      (lowering)  (synthesis)
//! ```
//!
//! ## Error Handling Strategy
//!
//! A conversion has three outcomes:
//!
//! - **Success**: every clause converted
//! - **Partial**: ops were produced, but something was dropped or needs review
//! - **Failed**: the statement is declined and the original code must stay
//!
//! Declines are returned as `Err(LoweringError)`; partial results carry their
//! recoverable errors in [`Conversion::outcome`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sql_fluent_lowering::{Converter, ConverterConfig};
//!
//! let converter = Converter::new(ConverterConfig::default());
//! let conversion = converter.convert_sql("SELECT * FROM users WHERE age > ? AND name = ?")?;
//!
//! for op in &conversion.ops {
//!     println!("->{}", op);
//! }
//! assert_eq!(conversion.param_count, 2);
//! ```

pub mod clauses;
pub mod conditions;
pub mod config;
pub mod context;
pub mod error;
pub mod fragment;
pub mod lists;
pub mod normalize;
pub mod params;
pub mod scanner;
pub mod statement;
pub mod synthesis;
pub mod tables;

pub use config::{ConfigError, ConverterConfig, EmissionMode, ReservedWords};
pub use context::LoweringContext;
pub use error::{ErrorSeverity, LoweringError, LoweringOutcome, LoweringResult};
pub use fragment::SqlFragment;
pub use normalize::{NormalizedSql, normalize};
pub use params::ParameterCounter;
pub use statement::{classify, lowering_for};
pub use synthesis::synthesize;

use serde::Serialize;
use sql_fluent_ir::{BuilderOp, ClauseSet, StatementKind};
use tracing::{debug, warn};

use crate::scanner::{check_balanced, count_placeholders};

/// Core trait for lowering one statement kind into a [`ClauseSet`]
///
/// Implementations follow the graceful degradation strategy:
///
/// - **For critical errors** (no target table, unsupported construct): return
///   `Err(LoweringError)`
/// - **For recoverable errors** (a malformed SET pair, an unparsable LIMIT):
///   - Drop the offending part
///   - Add the error to the `LoweringContext`
///   - Return `Ok` with the rest
///
/// Clauses must be read in the order they appear in the statement, because
/// each one consumes parameter numbers from the context.
pub trait StatementLowering {
    /// The statement kind this implementation handles
    fn kind(&self) -> StatementKind;

    /// Lower a normalized statement of [`kind`](Self::kind)
    fn lower(&self, ctx: &mut LoweringContext<'_>, sql: &NormalizedSql) -> LoweringResult<ClauseSet>;
}

/// Result of converting one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub kind: StatementKind,

    /// Lowered clauses the ops were synthesized from
    pub clauses: ClauseSet,

    /// Builder calls, in emission order
    pub ops: Vec<BuilderOp>,

    /// Number of positional values to bind to `:param1..:paramN`
    pub param_count: usize,

    /// `Success` or `Partial`; declines never produce a `Conversion`
    pub outcome: LoweringOutcome,
}

impl Conversion {
    pub fn is_partial(&self) -> bool {
        matches!(self.outcome, LoweringOutcome::Partial(_))
    }

    /// Recoverable errors recorded during conversion
    pub fn warnings(&self) -> &[LoweringError] {
        match &self.outcome {
            LoweringOutcome::Partial(errors) => errors,
            _ => &[],
        }
    }
}

/// Outcome of a conversion attempt, declines included
pub fn outcome_of(result: &LoweringResult<Conversion>) -> LoweringOutcome {
    match result {
        Ok(conversion) => conversion.outcome.clone(),
        Err(err) => LoweringOutcome::Failed(err.clone()),
    }
}

/// Counters for a batch of conversions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub converted: usize,
    pub partial: usize,
    pub declined: usize,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one conversion attempt
    pub fn record(&mut self, result: &LoweringResult<Conversion>) {
        match result {
            Ok(conversion) if conversion.is_partial() => self.partial += 1,
            Ok(_) => self.converted += 1,
            Err(_) => self.declined += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.converted + self.partial + self.declined
    }
}

/// SQL to builder-call converter
///
/// The converter is immutable. Every call creates its own
/// [`LoweringContext`], so one converter can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert the SQL argument of a call site
    ///
    /// Fragments with a runtime part are declined with
    /// [`LoweringError::UnsupportedFragment`].
    pub fn convert(&self, fragment: &SqlFragment) -> LoweringResult<Conversion> {
        match fragment.resolve() {
            Ok(sql) => self.convert_sql(&sql),
            Err(err) => {
                debug!(reason = %err, "declined dynamic SQL fragment");
                Err(err)
            }
        }
    }

    /// Convert one SQL statement
    pub fn convert_sql(&self, sql: &str) -> LoweringResult<Conversion> {
        let result = self.lower_statement(sql);
        match &result {
            Ok(conversion) if conversion.is_partial() => {
                warn!(
                    kind = %conversion.kind,
                    params = conversion.param_count,
                    warnings = conversion.warnings().len(),
                    "partial conversion"
                );
            }
            Ok(conversion) => {
                debug!(kind = %conversion.kind, params = conversion.param_count, "converted");
            }
            Err(err) => {
                debug!(reason = %err, severity = ?err.severity(), "declined");
            }
        }
        result
    }

    fn lower_statement(&self, raw: &str) -> LoweringResult<Conversion> {
        check_balanced(raw)?;

        let sql = NormalizedSql::new(raw);
        let kind = classify(&sql)?;

        let mut ctx = LoweringContext::new(&self.config.reserved_words);
        let clauses = lowering_for(kind).lower(&mut ctx, &sql)?;

        let expected = count_placeholders(raw);
        let found = ctx.params_issued();
        if found != expected {
            return Err(LoweringError::ParameterMismatch { expected, found });
        }

        let ops = synthesize(&clauses);
        Ok(Conversion {
            kind,
            clauses,
            ops,
            param_count: expected,
            outcome: ctx.outcome(),
        })
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Lowering context for tracking state during one statement's conversion

use crate::config::ReservedWords;
use crate::error::{LoweringError, LoweringOutcome};
use crate::params::{ParameterCounter, renumber};

/// Context for tracking state while lowering one statement
///
/// The context maintains:
/// - The parameter counter, so `?` placeholders are numbered in source order
/// - Accumulated recoverable errors for partial success mode
/// - The reserved-word set used by alias resolution
///
/// A context is created per statement and dropped afterwards. Nothing in it
/// is shared between conversions.
pub struct LoweringContext<'a> {
    /// Words never accepted as an alias
    reserved_words: &'a ReservedWords,

    /// Parameter numbering for this statement
    params: ParameterCounter,

    /// Accumulated errors during lowering (for partial success)
    errors: Vec<LoweringError>,
}

impl<'a> LoweringContext<'a> {
    /// Create a new lowering context
    pub fn new(reserved_words: &'a ReservedWords) -> Self {
        Self {
            reserved_words,
            params: ParameterCounter::new(),
            errors: Vec::new(),
        }
    }

    pub fn reserved_words(&self) -> &'a ReservedWords {
        self.reserved_words
    }

    /// Renumber the placeholders of one clause fragment
    ///
    /// Fragments must be passed in the order they appear in the statement.
    pub fn renumber(&mut self, text: &str) -> String {
        renumber(text, &mut self.params)
    }

    /// The statement's parameter counter
    pub fn params_mut(&mut self) -> &mut ParameterCounter {
        &mut self.params
    }

    /// Number of parameters issued so far
    pub fn params_issued(&self) -> usize {
        self.params.issued()
    }

    /// Add an error to the context (for partial success mode)
    pub fn add_error(&mut self, error: LoweringError) {
        self.errors.push(error);
    }

    /// Get all accumulated errors
    pub fn errors(&self) -> &[LoweringError] {
        &self.errors
    }

    /// Check if any errors were accumulated
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the lowering outcome based on accumulated errors
    pub fn outcome(&self) -> LoweringOutcome {
        if self.errors.is_empty() {
            LoweringOutcome::Success
        } else {
            LoweringOutcome::Partial(self.errors.clone())
        }
    }
}

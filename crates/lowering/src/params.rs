// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Positional-to-named parameter renumbering
//!
//! Every `?` outside a quoted literal becomes `:paramN`. The counter is a plain
//! value owned by one statement's [`LoweringContext`](crate::LoweringContext);
//! two conversions never share one, so numbering always restarts at 1.

use sql_fluent_ir::ParamRef;

use crate::scanner::Scanner;

/// Strictly increasing parameter cursor for one statement
#[derive(Debug, Default)]
pub struct ParameterCounter {
    issued: usize,
}

impl ParameterCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next parameter reference
    pub fn next_ref(&mut self) -> ParamRef {
        self.issued += 1;
        ParamRef(self.issued)
    }

    /// Number of parameters issued so far
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Restart numbering at 1
    pub fn reset(&mut self) {
        self.issued = 0;
    }
}

/// Replace every `?` outside quotes and comments with the next `:paramN`
pub fn renumber(text: &str, counter: &mut ParameterCounter) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for sc in Scanner::new(text) {
        if sc.ch == '?' && sc.is_code() {
            out.push_str(&counter.next_ref().to_string());
        } else {
            out.push(sc.ch);
        }
    }
    out
}

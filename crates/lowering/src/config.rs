// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Converter Configuration
//!
//! The converter needs very little configuration:
//! - The reserved-word set used to reject keywords as table aliases
//! - The emission mode for the query-builder root, which is carried through
//!   for the code generator and ignored by the parser
//!
//! ## Example
//!
//! ```rust,ignore
//! use sql_fluent_lowering::{ConverterConfig, EmissionMode};
//!
//! let config = ConverterConfig::from_yaml_str(
//!     "emission_mode: entity_manager\nreserved_words: [WHERE, JOIN, SET]",
//! )?;
//! assert_eq!(config.emission_mode, EmissionMode::EntityManager);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Words never accepted as a table alias
const DEFAULT_RESERVED_WORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "SET", "GROUP", "ORDER", "BY", "HAVING", "LIMIT", "OFFSET",
    "JOIN", "INNER", "LEFT", "RIGHT", "OUTER", "CROSS", "FULL", "NATURAL", "STRAIGHT_JOIN", "ON",
    "USING", "AS", "AND", "OR", "NOT", "UNION", "VALUES", "VALUE", "INTO", "FOR", "LOCK",
    "WINDOW", "USE", "FORCE", "IGNORE", "INDEX", "PARTITION", "RETURNING",
];

/// Errors raised while building or loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Reserved word set must not be empty")]
    EmptyReservedWords,

    #[error("Unknown configuration format: {0}")]
    UnknownFormat(String),
}

/// Upper-cased reserved words; never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ReservedWords(BTreeSet<String>);

impl ReservedWords {
    pub fn new<I, S>(words: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        if set.is_empty() {
            return Err(ConfigError::EmptyReservedWords);
        }
        Ok(Self(set))
    }

    /// Case-insensitive membership test
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(&word.to_ascii_uppercase())
    }

    pub fn insert(&mut self, word: &str) {
        let word = word.trim().to_ascii_uppercase();
        if !word.is_empty() {
            self.0.insert(word);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self(DEFAULT_RESERVED_WORDS.iter().map(|w| w.to_string()).collect())
    }
}

impl TryFrom<Vec<String>> for ReservedWords {
    type Error = ConfigError;

    fn try_from(words: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(words)
    }
}

impl From<ReservedWords> for Vec<String> {
    fn from(words: ReservedWords) -> Self {
        words.0.into_iter().collect()
    }
}

/// How the generated code reaches the query builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionMode {
    /// `$connection->createQueryBuilder()`
    #[default]
    Connection,
    /// `$entityManager->getConnection()->createQueryBuilder()`
    EntityManager,
}

impl EmissionMode {
    /// Expression that opens the builder chain
    pub fn builder_root(self) -> &'static str {
        match self {
            EmissionMode::Connection => "$connection->createQueryBuilder()",
            EmissionMode::EntityManager => "$entityManager->getConnection()->createQueryBuilder()",
        }
    }
}

/// Converter configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub reserved_words: ReservedWords,
    pub emission_mode: EmissionMode,
}

impl ConverterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reserved word
    pub fn with_reserved_word(mut self, word: &str) -> Self {
        self.reserved_words.insert(word);
        self
    }

    pub fn with_emission_mode(mut self, mode: EmissionMode) -> Self {
        self.emission_mode = mode;
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a configuration file; the format follows the file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(ConfigError::UnknownFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

//! Engine configuration: grammar options, normalization limits and
//! variable resolution mode.
//!
//! Everything here deserializes from JSON with serde. Missing fields take
//! the defaults below and unknown fields are rejected.

use crate::error::{AsonError, Result};
use crate::normalize::Normalizer;
use crate::parser::ParseOptions;
use serde::{Deserialize, Serialize};

/// Relative precedence of the `|` and `&` operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// `&` binds tighter: `a | b & c` is `a | (b & c)`.
    #[default]
    IntersectionFirst,
    /// `|` binds tighter: `a | b & c` is `(a | b) & c`.
    UnionFirst,
    /// Equal precedence, grouped left to right.
    LeftToRight,
}

/// How bare identifiers in the input are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierMode {
    /// Every non-reserved identifier is a variable.
    #[default]
    Variables,
    /// Identifiers found in the parse bindings are replaced by their value;
    /// the rest are variables.
    Bindings,
    /// Identifiers must be found in the parse bindings.
    BindingsOnly,
}

/// Ceilings checked during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Limits {
    /// Maximum number of alternative branches alive at any point.
    #[serde(default = "default_max_branches")]
    pub max_branches: usize,
    /// Maximum recursion depth through nested values.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Maximum number of expansions and meets in one normalization.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

fn default_max_branches() -> usize {
    4096
}

fn default_max_steps() -> usize {
    1_000_000
}

fn default_max_depth() -> usize {
    128
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_branches: default_max_branches(),
            max_depth: default_max_depth(),
            max_steps: default_max_steps(),
        }
    }
}

/// What normalization does with variables that never meet a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Unbound variables are an error.
    #[default]
    Complete,
    /// Unbound variables stay in the result as leaves.
    Partial,
}

/// Grammar settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarConfig {
    #[serde(default)]
    pub precedence: Precedence,
    #[serde(default)]
    pub identifiers: IdentifierMode,
    /// Maximum nesting of lists, objects and parentheses.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            precedence: Precedence::default(),
            identifiers: IdentifierMode::default(),
            max_depth: default_max_depth(),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub grammar: GrammarConfig,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub resolution: Resolution,
}

impl EngineConfig {
    /// Load a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AsonError::Config(e.to_string()))
    }

    /// Parse options for this grammar, with no identifier bindings.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            precedence: self.grammar.precedence,
            identifiers: self.grammar.identifiers,
            max_depth: self.grammar.max_depth,
            ..ParseOptions::default()
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.limits, self.resolution)
    }
}

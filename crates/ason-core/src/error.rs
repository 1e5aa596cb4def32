//! Error types for ASON parsing, normalization and value access.

use crate::value::Kind;
use std::fmt;
use thiserror::Error;

/// Location of a parse failure within the input text.
///
/// `offset` is a byte offset; `line` and `column` are 1-based, with columns
/// counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub(crate) fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token that cannot appear here. Carries a description of the token.
    UnexpectedToken(String),
    /// Input ended inside a list, object or parenthesized expression.
    UnexpectedEnd,
    UnterminatedString,
    InvalidEscape,
    InvalidNumber(String),
    /// A complete expression was followed by more input.
    TrailingInput,
    NestingTooDeep,
    /// A bare identifier with no binding, under `IdentifierMode::BindingsOnly`.
    UnknownIdentifier(String),
    /// The complement operator `!`. A complement has no canonical form as a
    /// union of plain values.
    UnsupportedComplement,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedToken(tok) => write!(f, "unexpected {tok}"),
            ParseErrorKind::UnexpectedEnd => f.write_str("unexpected end of input"),
            ParseErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ParseErrorKind::InvalidEscape => f.write_str("invalid escape sequence"),
            ParseErrorKind::InvalidNumber(lit) => write!(f, "invalid number literal '{lit}'"),
            ParseErrorKind::TrailingInput => f.write_str("trailing input after expression"),
            ParseErrorKind::NestingTooDeep => f.write_str("nesting too deep"),
            ParseErrorKind::UnknownIdentifier(name) => write!(f, "unknown identifier '{name}'"),
            ParseErrorKind::UnsupportedComplement => {
                f.write_str("complement '!' is not supported")
            }
        }
    }
}

/// A parse failure with the position where it was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ASON parse error at {position}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Position,
}

/// Errors raised by the ASON engine.
#[derive(Error, Debug)]
pub enum AsonError {
    /// The input text was not valid ASON.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A kind-specific accessor was used on a value of another kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    /// Normalization exceeded a configured limit.
    #[error("resource exceeded: {resource} over limit of {limit}")]
    ResourceExceeded { resource: Resource, limit: usize },

    /// A canonical value was required but something else was supplied.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Complete resolution left a variable without a value.
    #[error("unbound variable '{0}'")]
    UnboundVariable(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// The resource a [`AsonError::ResourceExceeded`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Number of alternative branches alive during distribution.
    Branches,
    /// Recursion depth of the normalizer, or nesting depth of a value.
    Depth,
    /// Expansions and meets performed by one normalization.
    Steps,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Branches => f.write_str("union branches"),
            Resource::Depth => f.write_str("nesting depth"),
            Resource::Steps => f.write_str("normalization steps"),
        }
    }
}

/// Convenience alias used throughout ason-core.
pub type Result<T> = std::result::Result<T, AsonError>;

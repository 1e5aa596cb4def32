//! # ason-core
//!
//! Value algebra engine for **ASON**, a JSON superset with union (`|`) and
//! intersection (`&`) operators and pattern variables.
//!
//! An ASON expression denotes a set of plain JSON-like values. Union adds
//! alternatives; intersection keeps only what all operands agree on, merging
//! objects key-wise and binding variables along the way. Normalization
//! reduces any expression to a canonical, sorted union of plain values, which
//! is what gets compared and serialized.
//!
//! ## Quick start
//!
//! ```rust
//! use ason_core::{match_pattern, normalize, parse, serialize};
//!
//! // Object join: keys from both sides, shared keys must agree.
//! let value = parse(r#"{"a": 1, "b": 2} & {"a": 1, "c": 3}"#).unwrap();
//! let canonical = normalize(&value).unwrap();
//! assert_eq!(serialize(&canonical).unwrap(), r#"{"a":1,"b":2,"c":3}"#);
//!
//! // Intersection distributes over union; contradictions drop out.
//! let value = parse("(1 | 2 | 3) & (2 | 3 | 4)").unwrap();
//! assert_eq!(serialize(&normalize(&value).unwrap()).unwrap(), "2 | 3");
//!
//! // Pattern matching binds variables.
//! let subject = parse(r#"{"x": 5, "y": 6}"#).unwrap();
//! let pattern = parse(r#"{"x": v}"#).unwrap();
//! let found = match_pattern(&subject, &pattern).unwrap();
//! assert_eq!(found[0].to_string(), r#"{"v":5}"#);
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the value tree and its accessors
//! - [`number`]: exact decimal numbers
//! - [`parser`]: ASON text → value
//! - [`compare`]: total order and structural equality
//! - [`normalize`]: distribution into canonical form
//! - [`unify`]: pattern matching by intersection
//! - [`serializer`]: canonical value → ASON text
//! - [`json`]: conversion to and from `serde_json::Value`
//! - [`config`]: grammar options and normalization limits
//! - [`error`]: error types

pub mod compare;
pub mod config;
pub mod error;
pub mod json;
pub mod normalize;
pub mod number;
pub mod parser;
pub mod serializer;
pub mod unify;
pub mod value;

pub use compare::{compare, equals};
pub use config::{EngineConfig, GrammarConfig, IdentifierMode, Limits, Precedence, Resolution};
pub use error::{AsonError, ParseError, ParseErrorKind, Position, Resource, Result};
pub use normalize::{normalize, Branch, Normalizer};
pub use number::Number;
pub use parser::{parse, parse_with, ParseOptions};
pub use serializer::{serialize, serialize_pretty, MAX_SERIALIZE_DEPTH};
pub use unify::{match_pattern, Bindings};
pub use value::{Kind, ObjectMap, Value};

/// `a | b`, unnormalized.
pub fn union(a: Value, b: Value) -> Value {
    Value::union(a, b)
}

/// `a & b`, unnormalized.
pub fn intersect(a: Value, b: Value) -> Value {
    Value::intersect(a, b)
}

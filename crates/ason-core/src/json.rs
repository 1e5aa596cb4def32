//! Conversion between ASON values and `serde_json::Value`.
//!
//! This is the boundary a host binding uses to bring native scalars and
//! collections in and out of the engine. Every JSON document is an ASON
//! value. Only ground plain values convert back: unions, intersections,
//! the contradiction and variables have no JSON form.
//!
//! serde_json is built with `arbitrary_precision`, so a JSON number keeps
//! its literal text and converts to a [`Number`] without passing through
//! `f64`.

use crate::error::{AsonError, Result};
use crate::number::Number;
use crate::value::{Kind, ObjectMap, Value};
use std::str::FromStr;
use std::sync::Arc;

impl TryFrom<serde_json::Value> for Value {
    type Error = AsonError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        Value::try_from(&json)
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = AsonError;

    fn try_from(json: &serde_json::Value) -> Result<Self> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => Value::Number(Number::from_str(&n.to_string())?),
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => Value::list(
                items
                    .iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_json::Value::Object(map) => {
                let entries = map
                    .iter()
                    .map(|(k, v)| Ok((Arc::from(k.as_str()), Value::try_from(v)?)))
                    .collect::<Result<ObjectMap>>()?;
                Value::Object(Arc::new(entries))
            }
        })
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = AsonError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(serde_json::Value::Null),
            Value::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
            Value::Number(n) => Ok(serde_json::Value::Number(json_number(n)?)),
            Value::String(s) => Ok(serde_json::Value::String(s.to_string())),
            Value::List(items) => items
                .iter()
                .map(serde_json::Value::try_from)
                .collect::<Result<Vec<_>>>()
                .map(serde_json::Value::Array),
            Value::Object(map) => {
                let mut out = serde_json::Map::new();
                for (k, v) in map.iter() {
                    out.insert(k.to_string(), serde_json::Value::try_from(v)?);
                }
                Ok(serde_json::Value::Object(out))
            }
            other => Err(AsonError::TypeMismatch {
                expected: Kind::Object,
                found: other.kind(),
            }),
        }
    }
}

/// The canonical number text is a valid JSON literal.
fn json_number(n: &Number) -> Result<serde_json::Number> {
    if let Some(i) = n.to_i64() {
        return Ok(serde_json::Number::from(i));
    }
    serde_json::Number::from_str(&n.to_string())
        .map_err(|_| AsonError::InvalidNumber(format!("{n} has no JSON representation")))
}

impl Value {
    /// Parse a JSON document into a value.
    pub fn from_json_str(json: &str) -> Result<Value> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Value::try_from(parsed)
    }

    /// Write a ground plain value as compact JSON.
    pub fn to_json_string(&self) -> Result<String> {
        let json = serde_json::Value::try_from(self)?;
        Ok(serde_json::to_string(&json)?)
    }
}

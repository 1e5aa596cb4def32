//! Total order and structural equality over values.
//!
//! Values order first by [`Kind::rank`], then within a kind:
//!
//! - booleans: `false < true`
//! - numbers: by numeric value
//! - strings: lexicographic by codepoint
//! - lists: element-wise lexicographic
//! - objects: lexicographic over `(key, value)` pairs in key order
//! - variables: by name
//! - unions and intersections: lexicographic over members
//!
//! On canonical values (sorted, deduplicated unions) structural equality is
//! set equality, which is what normalization relies on for deduplication.

use crate::value::Value;
use std::cmp::Ordering;

/// Compare two values under the total value order.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    let by_kind = a.kind().rank().cmp(&b.kind().rank());
    if by_kind != Ordering::Equal {
        return by_kind;
    }

    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Variable(x), Value::Variable(y)) => x.cmp(y),
        (Value::List(x), Value::List(y))
        | (Value::Union(x), Value::Union(y))
        | (Value::Intersection(x), Value::Intersection(y)) => compare_seq(x, y),
        (Value::Object(x), Value::Object(y)) => {
            if std::sync::Arc::ptr_eq(x, y) {
                return Ordering::Equal;
            }
            x.iter().cmp(y.iter())
        }
        // Equal ranks imply equal kinds.
        _ => Ordering::Equal,
    }
}

/// Structural equality.
pub fn equals(a: &Value, b: &Value) -> bool {
    compare(a, b) == Ordering::Equal
}

fn compare_seq(x: &[Value], y: &[Value]) -> Ordering {
    if std::ptr::eq(x, y) {
        return Ordering::Equal;
    }
    x.iter().cmp(y.iter())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equals(self, other)
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

//! The ASON value tree.
//!
//! A [`Value`] is immutable once built. Children live behind `Arc`, so clones
//! are O(1) and subtrees are shared freely between parents and threads.
//! Composition (`union`, `intersect`) always allocates a new node around its
//! operands and never touches them.
//!
//! Comparison, `Display` and drop recurse through the tree. The parser caps
//! nesting at `ParseOptions::max_depth`; a tree built through the API should
//! stay within the same bound. [`serialize`](crate::serialize) measures the
//! depth first and refuses anything deeper than it can write.

use crate::error::{AsonError, Result};
use crate::number::Number;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Name of the anonymous wildcard variable.
pub const WILDCARD: &str = "_";

/// Discriminator for the variants of [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    List,
    Object,
    Variable,
    Intersection,
    Union,
}

impl Kind {
    /// Position of the kind in the value order. Plain kinds come first, in
    /// the order Null < Boolean < Number < String < List < Object.
    pub fn rank(self) -> u8 {
        match self {
            Kind::Null => 0,
            Kind::Boolean => 1,
            Kind::Number => 2,
            Kind::String => 3,
            Kind::List => 4,
            Kind::Object => 5,
            Kind::Variable => 6,
            Kind::Intersection => 7,
            Kind::Union => 8,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::List => "list",
            Kind::Object => "object",
            Kind::Variable => "variable",
            Kind::Intersection => "intersection",
            Kind::Union => "union",
        };
        f.write_str(name)
    }
}

/// Key-sorted object storage. `str` ordering is byte order, which for UTF-8
/// is codepoint order, so iteration follows the comparator's key order.
pub type ObjectMap = BTreeMap<Arc<str>, Value>;

/// An ASON value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(Number),
    String(Arc<str>),
    List(Arc<[Value]>),
    Object(Arc<ObjectMap>),
    /// "Any of these". Zero members is the contradiction `empty`.
    Union(Arc<[Value]>),
    /// "All of these must agree".
    Intersection(Arc<[Value]>),
    Variable(Arc<str>),
}

impl Value {
    pub fn null() -> Self {
        Value::Null
    }

    pub fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    pub fn number(n: impl Into<Number>) -> Self {
        Value::Number(n.into())
    }

    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Arc::from(s.as_ref()))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Build an object. A later occurrence of a key replaces an earlier one.
    pub fn object<K: AsRef<str>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let map: ObjectMap = entries
            .into_iter()
            .map(|(k, v)| (Arc::from(k.as_ref()), v))
            .collect();
        Value::Object(Arc::new(map))
    }

    pub fn variable(name: impl AsRef<str>) -> Self {
        Value::Variable(Arc::from(name.as_ref()))
    }

    /// The anonymous wildcard `_`.
    pub fn wildcard() -> Self {
        Value::variable(WILDCARD)
    }

    /// The contradiction: a union with no members.
    pub fn empty() -> Self {
        Value::Union(Arc::from(Vec::new()))
    }

    /// `a | b`, unnormalized.
    pub fn union(a: Value, b: Value) -> Self {
        Value::Union(Arc::from(vec![a, b]))
    }

    /// `a & b`, unnormalized.
    pub fn intersect(a: Value, b: Value) -> Self {
        Value::Intersection(Arc::from(vec![a, b]))
    }

    /// N-ary union, unnormalized.
    pub fn union_of(members: impl IntoIterator<Item = Value>) -> Self {
        Value::Union(members.into_iter().collect())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Boolean(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Object(_) => Kind::Object,
            Value::Union(_) => Kind::Union,
            Value::Intersection(_) => Kind::Intersection,
            Value::Variable(_) => Kind::Variable,
        }
    }

    /// Direct children: list elements, object values in key order or
    /// composite members. Scalars and variables have none.
    pub fn children(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Value::List(items) | Value::Union(items) | Value::Intersection(items) => {
                Box::new(items.iter())
            }
            Value::Object(map) => Box::new(map.values()),
            _ => Box::new(std::iter::empty()),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Boolean(_) | Value::Number(_) | Value::String(_)
        )
    }

    /// True for the zero-member union.
    pub fn is_empty_union(&self) -> bool {
        matches!(self, Value::Union(members) if members.is_empty())
    }

    /// No union or intersection anywhere in the tree. Variables are allowed.
    pub fn is_plain(&self) -> bool {
        match self {
            Value::Union(_) | Value::Intersection(_) => false,
            _ => self.children().all(Value::is_plain),
        }
    }

    /// Plain and free of variables.
    pub fn is_ground(&self) -> bool {
        match self {
            Value::Union(_) | Value::Intersection(_) | Value::Variable(_) => false,
            _ => self.children().all(Value::is_ground),
        }
    }

    /// The shape produced by normalization: a single plain value, or a union
    /// of zero or at least two plain values in strictly ascending order.
    pub fn is_canonical(&self) -> bool {
        match self {
            Value::Union(members) => {
                members.len() != 1
                    && members.iter().all(Value::is_plain)
                    && members.windows(2).all(|w| w[0] < w[1])
            }
            other => other.is_plain(),
        }
    }

    /// Deepest nesting of containers and composites. Scalars and variables
    /// are depth 0. Measured without recursion.
    pub fn nesting_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0usize)];
        while let Some((value, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(value.children().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Names of all variables in the tree, including the wildcard.
    pub fn variables(&self) -> BTreeSet<Arc<str>> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<Arc<str>>) {
        if let Value::Variable(name) = self {
            names.insert(name.clone());
        }
        for child in self.children() {
            child.collect_variables(names);
        }
    }

    /// Does any variable other than the wildcard occur in the value?
    pub(crate) fn has_named_variables(&self) -> bool {
        match self {
            Value::Variable(name) => &**name != WILDCARD,
            _ => self.children().any(Value::has_named_variables),
        }
    }

    fn mismatch(&self, expected: Kind) -> AsonError {
        AsonError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(other.mismatch(Kind::Boolean)),
        }
    }

    pub fn as_number(&self) -> Result<&Number> {
        match self {
            Value::Number(n) => Ok(n),
            other => Err(other.mismatch(Kind::Number)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch(Kind::String)),
        }
    }

    pub fn as_list(&self) -> Result<&[Value]> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(other.mismatch(Kind::List)),
        }
    }

    pub fn as_object(&self) -> Result<&ObjectMap> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(other.mismatch(Kind::Object)),
        }
    }

    pub fn variable_name(&self) -> Result<&str> {
        match self {
            Value::Variable(name) => Ok(name),
            other => Err(other.mismatch(Kind::Variable)),
        }
    }

    /// Members of a union or intersection.
    pub fn members(&self) -> Result<&[Value]> {
        match self {
            Value::Union(members) | Value::Intersection(members) => Ok(members),
            other => Err(other.mismatch(Kind::Union)),
        }
    }

    /// Element count of a list, entry count of an object or member count of a union.
    pub fn len(&self) -> Result<usize> {
        match self {
            Value::List(items) | Value::Union(items) => Ok(items.len()),
            Value::Object(map) => Ok(map.len()),
            other => Err(other.mismatch(Kind::List)),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// List element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Result<Option<&Value>> {
        Ok(self.as_list()?.get(index))
    }

    /// Object value under `key`, if present.
    pub fn field(&self, key: &str) -> Result<Option<&Value>> {
        Ok(self.as_object()?.get(key))
    }

    /// Object keys in comparator order.
    pub fn keys(&self) -> Result<impl Iterator<Item = &str>> {
        Ok(self.as_object()?.keys().map(|k| &**k))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Arc::from(items))
    }
}

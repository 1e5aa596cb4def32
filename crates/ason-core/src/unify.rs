//! Pattern matching by intersection.
//!
//! Matching a subject against a pattern intersects the two and normalizes
//! the result. Each surviving branch is one way the pattern fits; the
//! variables it bound along the way are that branch's bindings. A subject
//! that is itself a union can match in several distinct ways, so the result
//! is a set of binding sets rather than a single one.

use crate::config::Resolution;
use crate::error::Result;
use crate::normalize::Normalizer;
use crate::value::{Value, WILDCARD};
use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;
use std::fmt;

/// Variable name → value, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bindings(BTreeMap<String, Value>);

impl Bindings {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The bindings as an ASON object value.
    pub fn to_value(&self) -> Value {
        Value::object(self.0.iter().map(|(k, v)| (k.as_str(), v.clone())))
    }
}

impl<'a> IntoIterator for &'a Bindings {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Written as an ASON object, e.g. `{"v":5}`.
impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl Normalizer {
    /// Every distinct way `pattern` matches `subject`.
    ///
    /// Empty when nothing matches. A match of a pattern without named
    /// variables yields one empty binding set. Only variables named in the
    /// pattern are reported, and only once they are bound to something other
    /// than another variable.
    pub fn match_pattern(&self, subject: &Value, pattern: &Value) -> Result<Vec<Bindings>> {
        let wanted: BTreeSet<String> = pattern
            .variables()
            .into_iter()
            .filter(|name| &**name != WILDCARD)
            .map(|name| name.to_string())
            .collect();

        let query = Value::intersect(subject.clone(), pattern.clone());
        let branches = self
            .with_resolution(Resolution::Partial)
            .branches(&query)?;

        let found: BTreeSet<Bindings> = branches
            .into_iter()
            .map(|branch| {
                branch
                    .bindings
                    .0
                    .into_iter()
                    .filter(|(name, value)| {
                        wanted.contains(name) && !matches!(value, Value::Variable(_))
                    })
                    .collect()
            })
            .collect();

        tracing::debug!(
            variables = wanted.len(),
            matches = found.len(),
            "matched pattern"
        );
        Ok(found.into_iter().collect())
    }
}

/// Match with the default limits.
pub fn match_pattern(subject: &Value, pattern: &Value) -> Result<Vec<Bindings>> {
    Normalizer::default().match_pattern(subject, pattern)
}

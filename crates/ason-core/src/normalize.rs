//! Normalization: rewrite any value into its canonical union of plain values.
//!
//! The normalizer distributes unions outward and meets plain values pairwise
//! under intersection, threading a per-branch variable environment through
//! the whole pass:
//!
//! - **Lists and objects** expand to the cartesian product of their
//!   children's alternatives.
//! - **Unions** concatenate the alternatives of their members; each member
//!   starts from the same environment, so branches never see each other's
//!   bindings.
//! - **Intersections** fold [`Pass::meet`] over the alternatives of their
//!   members, left to right. An impossible meet drops the branch. A member
//!   with no named variables expands the same way in every branch, so it is
//!   expanded once and shared.
//!
//! Meeting follows the lattice rules: scalars agree only when equal, lists
//! meet element-wise when their lengths match, objects merge key-wise (keys
//! present on one side pass through unchanged), and a variable binds to
//! whatever it meets. A bound variable meets later occurrences against its
//! current value and keeps the refined result, so every occurrence resolves
//! to the same value at the end of the pass. Two unbound variables that meet
//! are aliased to the lesser name, whichever side it came from.
//!
//! Besides the branch and depth ceilings, every expansion and every meet
//! attempted by an intersection costs one step against `Limits::max_steps`.
//!
//! Once every branch is resolved through its environment, branches are
//! deduplicated and sorted by the value order. One branch collapses to
//! itself; none is the contradiction `empty`.
//!
//! The environment lives only inside one call. Nothing persists between
//! calls, so concurrent normalizations of shared values need no coordination.

use crate::config::{Limits, Resolution};
use crate::error::{AsonError, Resource, Result};
use crate::unify::Bindings;
use crate::value::{ObjectMap, Value, WILDCARD};
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Variable environment of one branch.
type Env = BTreeMap<Arc<str>, Value>;

/// One alternative produced by distribution, with the bindings it made.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// The branch value, resolved through its bindings.
    pub value: Value,
    /// Every named variable bound along the branch, resolved.
    pub bindings: Bindings,
}

/// Normalization settings: resource ceilings and variable resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    limits: Limits,
    resolution: Resolution,
}

impl Normalizer {
    pub fn new(limits: Limits, resolution: Resolution) -> Self {
        Self { limits, resolution }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Normalize `value` into canonical form.
    pub fn normalize(&self, value: &Value) -> Result<Value> {
        let branches = self.branches(value)?;
        let produced = branches.len();
        let canonical = canonicalize(branches.into_iter().map(|b| b.value));
        tracing::debug!(
            input = %value.kind(),
            branches = produced,
            members = canonical_width(&canonical),
            "normalized value"
        );
        Ok(canonical)
    }

    /// Distribute `value` into its branches, resolved but not deduplicated.
    pub fn branches(&self, value: &Value) -> Result<Vec<Branch>> {
        let pass = Pass::new(self.limits);
        let expanded = pass.expand(value, Env::new(), 0)?;
        expanded
            .into_iter()
            .map(|(term, env)| self.finish(&pass, &term, &env))
            .collect()
    }

    fn finish(&self, pass: &Pass, term: &Value, env: &Env) -> Result<Branch> {
        let value = pass.resolve(term, env, 0)?;
        if self.resolution == Resolution::Complete {
            if let Some(name) = value.variables().into_iter().next() {
                return Err(AsonError::UnboundVariable(name.to_string()));
            }
        }
        let mut bindings = Bindings::new();
        for name in env.keys().filter(|n| &***n != WILDCARD) {
            let resolved = pass.resolve(&Value::Variable(name.clone()), env, 0)?;
            bindings.insert(name.to_string(), resolved);
        }
        Ok(Branch { value, bindings })
    }
}

/// Normalize with the default limits and complete resolution.
pub fn normalize(value: &Value) -> Result<Value> {
    Normalizer::default().normalize(value)
}

/// Deduplicate and sort plain values into the canonical shape.
pub(crate) fn canonicalize(values: impl IntoIterator<Item = Value>) -> Value {
    let mut members: Vec<Value> = values
        .into_iter()
        .collect::<BTreeSet<Value>>()
        .into_iter()
        .collect();
    if members.len() == 1 {
        return members.swap_remove(0);
    }
    Value::Union(Arc::from(members))
}

fn canonical_width(value: &Value) -> usize {
    match value {
        Value::Union(members) => members.len(),
        _ => 1,
    }
}

/// State of a single normalization pass.
struct Pass {
    limits: Limits,
    steps: Cell<usize>,
}

impl Pass {
    fn new(limits: Limits) -> Self {
        Self {
            limits,
            steps: Cell::new(0),
        }
    }

    fn charge(&self) -> Result<()> {
        let used = self.steps.get() + 1;
        if used > self.limits.max_steps {
            return Err(AsonError::ResourceExceeded {
                resource: Resource::Steps,
                limit: self.limits.max_steps,
            });
        }
        self.steps.set(used);
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.limits.max_depth {
            return Err(AsonError::ResourceExceeded {
                resource: Resource::Depth,
                limit: self.limits.max_depth,
            });
        }
        Ok(())
    }

    fn check_branches(&self, count: usize) -> Result<()> {
        if count > self.limits.max_branches {
            return Err(AsonError::ResourceExceeded {
                resource: Resource::Branches,
                limit: self.limits.max_branches,
            });
        }
        Ok(())
    }

    /// All alternatives of `value`, each a plain term with its environment.
    fn expand(&self, value: &Value, env: Env, depth: usize) -> Result<Vec<(Value, Env)>> {
        self.check_depth(depth)?;
        self.charge()?;
        match value {
            Value::Null
            | Value::Boolean(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Variable(_) => Ok(vec![(value.clone(), env)]),
            Value::List(items) => {
                let states = self.product(items.iter(), env, depth)?;
                Ok(states
                    .into_iter()
                    .map(|(items, env)| (Value::List(Arc::from(items)), env))
                    .collect())
            }
            Value::Object(map) => {
                let states = self.product(map.values(), env, depth)?;
                Ok(states
                    .into_iter()
                    .map(|(values, env)| {
                        let rebuilt: ObjectMap = map.keys().cloned().zip(values).collect();
                        (Value::Object(Arc::new(rebuilt)), env)
                    })
                    .collect())
            }
            Value::Union(members) => {
                let mut out = Vec::new();
                for member in members.iter() {
                    out.extend(self.expand(member, env.clone(), depth + 1)?);
                    self.check_branches(out.len())?;
                }
                Ok(out)
            }
            Value::Intersection(members) => {
                let (first, rest) = members.split_first().ok_or_else(|| {
                    AsonError::InvariantViolation("intersection with no members".to_string())
                })?;
                let mut states = self.expand(first, env, depth + 1)?;
                for member in rest {
                    let shared = self.shared_expansion(member, depth + 1)?;
                    let mut next = Vec::new();
                    for (acc, env) in states {
                        let alternatives =
                            self.alternatives(member, shared.as_deref(), env, depth + 1)?;
                        for (term, mut env) in alternatives {
                            self.charge()?;
                            match self.meet(&acc, &term, &mut env, depth + 1)? {
                                Some(met) => {
                                    next.push((met, env));
                                    self.check_branches(next.len())?;
                                }
                                None => tracing::trace!(
                                    left = %acc.kind(),
                                    right = %term.kind(),
                                    "contradiction"
                                ),
                            }
                        }
                    }
                    states = next;
                    if states.is_empty() {
                        break;
                    }
                }
                Ok(states)
            }
        }
    }

    /// Cartesian product of the alternatives of `children`.
    fn product<'v>(
        &self,
        children: impl Iterator<Item = &'v Value>,
        env: Env,
        depth: usize,
    ) -> Result<Vec<(Vec<Value>, Env)>> {
        let mut states: Vec<(Vec<Value>, Env)> = vec![(Vec::new(), env)];
        for child in children {
            let shared = self.shared_expansion(child, depth + 1)?;
            let mut next = Vec::with_capacity(states.len());
            for (mut prefix, env) in states {
                let mut alternatives =
                    self.alternatives(child, shared.as_deref(), env, depth + 1)?;
                if alternatives.len() == 1 {
                    // Single alternative: extend in place.
                    if let Some((term, env)) = alternatives.pop() {
                        prefix.push(term);
                        next.push((prefix, env));
                    }
                } else {
                    for (term, env) in alternatives {
                        let mut extended = prefix.clone();
                        extended.push(term);
                        next.push((extended, env));
                    }
                }
                self.check_branches(next.len())?;
            }
            states = next;
            if states.is_empty() {
                break;
            }
        }
        Ok(states)
    }

    /// Alternatives of a member that never reads the branch environment.
    fn shared_expansion(&self, member: &Value, depth: usize) -> Result<Option<Vec<(Value, Env)>>> {
        if member.has_named_variables() {
            return Ok(None);
        }
        self.expand(member, Env::new(), depth).map(Some)
    }

    /// Alternatives of `member` in one branch, reusing a shared expansion.
    fn alternatives(
        &self,
        member: &Value,
        shared: Option<&[(Value, Env)]>,
        env: Env,
        depth: usize,
    ) -> Result<Vec<(Value, Env)>> {
        match shared {
            Some(terms) => Ok(terms
                .iter()
                .map(|(term, _)| (term.clone(), env.clone()))
                .collect()),
            None => self.expand(member, env, depth),
        }
    }

    /// Meet two plain terms. `None` is a contradiction.
    fn meet(&self, a: &Value, b: &Value, env: &mut Env, depth: usize) -> Result<Option<Value>> {
        self.check_depth(depth)?;
        match (a, b) {
            (Value::Variable(n), other) | (other, Value::Variable(n)) if &**n == WILDCARD => {
                Ok(Some(other.clone()))
            }
            (Value::Variable(n), other) | (other, Value::Variable(n)) => {
                self.meet_variable(n, other, env, depth)
            }
            (Value::Null, Value::Null) => Ok(Some(Value::Null)),
            (Value::Boolean(x), Value::Boolean(y)) => Ok((x == y).then(|| a.clone())),
            (Value::Number(x), Value::Number(y)) => Ok((x == y).then(|| a.clone())),
            (Value::String(x), Value::String(y)) => Ok((x == y).then(|| a.clone())),
            (Value::List(xs), Value::List(ys)) => {
                if xs.len() != ys.len() {
                    return Ok(None);
                }
                let mut items = Vec::with_capacity(xs.len());
                for (x, y) in xs.iter().zip(ys.iter()) {
                    match self.meet(x, y, env, depth + 1)? {
                        Some(item) => items.push(item),
                        None => return Ok(None),
                    }
                }
                Ok(Some(Value::List(Arc::from(items))))
            }
            (Value::Object(xs), Value::Object(ys)) => {
                let mut merged = ObjectMap::new();
                for (key, x) in xs.iter() {
                    let value = match ys.get(key) {
                        Some(y) => match self.meet(x, y, env, depth + 1)? {
                            Some(v) => v,
                            None => return Ok(None),
                        },
                        None => x.clone(),
                    };
                    merged.insert(key.clone(), value);
                }
                for (key, y) in ys.iter() {
                    if !xs.contains_key(key) {
                        merged.insert(key.clone(), y.clone());
                    }
                }
                Ok(Some(Value::Object(Arc::new(merged))))
            }
            (Value::Union(_) | Value::Intersection(_), _)
            | (_, Value::Union(_) | Value::Intersection(_)) => Err(AsonError::InvariantViolation(
                "meet reached an undistributed composite".to_string(),
            )),
            _ => Ok(None),
        }
    }

    /// Meet a named variable with a term, binding or refining it.
    ///
    /// A variable is returned as the met term; its value is read back from
    /// the environment when the branch is resolved.
    fn meet_variable(
        &self,
        name: &Arc<str>,
        other: &Value,
        env: &mut Env,
        depth: usize,
    ) -> Result<Option<Value>> {
        self.check_depth(depth)?;
        let name = self.representative(name, env);

        if let Value::Variable(m) = other {
            if &**m == WILDCARD {
                return Ok(Some(Value::Variable(name)));
            }
            let m = self.representative(m, env);
            if m == name {
                return Ok(Some(Value::Variable(name)));
            }
            return self.join_variables(name, m, env, depth);
        }

        if self.occurs(&name, other, env, depth)? {
            tracing::trace!(variable = %name, "occurs check failed");
            return Ok(None);
        }
        match env.get(&name).cloned() {
            None => {
                env.insert(name.clone(), other.clone());
            }
            Some(bound) => match self.meet(&bound, other, env, depth + 1)? {
                Some(refined) => {
                    env.insert(name.clone(), refined);
                }
                None => return Ok(None),
            },
        }
        Ok(Some(Value::Variable(name)))
    }

    /// Make two distinct representatives one, keeping the lesser name when
    /// neither is bound.
    fn join_variables(
        &self,
        a: Arc<str>,
        b: Arc<str>,
        env: &mut Env,
        depth: usize,
    ) -> Result<Option<Value>> {
        let (keep, alias) = match (env.get(&a).cloned(), env.get(&b).cloned()) {
            (None, None) if a < b => (a, b),
            (None, None) => (b, a),
            (Some(_), None) => (a, b),
            (None, Some(_)) => (b, a),
            (Some(x), Some(y)) => {
                let Some(refined) = self.meet(&x, &y, env, depth + 1)? else {
                    return Ok(None);
                };
                if self.occurs(&a, &refined, env, depth)? || self.occurs(&b, &refined, env, depth)?
                {
                    tracing::trace!(variable = %a, "occurs check failed");
                    return Ok(None);
                }
                env.insert(b.clone(), refined);
                env.insert(a, Value::Variable(b.clone()));
                return Ok(Some(Value::Variable(b)));
            }
        };
        if let Some(bound) = env.get(&keep).cloned() {
            if self.occurs(&alias, &bound, env, depth)? {
                tracing::trace!(variable = %alias, "occurs check failed");
                return Ok(None);
            }
        }
        env.insert(alias, Value::Variable(keep.clone()));
        Ok(Some(Value::Variable(keep)))
    }

    /// The last variable in the alias chain starting at `name`.
    fn representative(&self, name: &Arc<str>, env: &Env) -> Arc<str> {
        let mut current = name.clone();
        // Chains are acyclic; the step bound guards the loop regardless.
        for _ in 0..=env.len() {
            match env.get(&current) {
                Some(Value::Variable(next)) if &**next != WILDCARD => current = next.clone(),
                _ => break,
            }
        }
        current
    }

    /// Does `name` occur in `term` once bindings are followed?
    fn occurs(&self, name: &str, term: &Value, env: &Env, depth: usize) -> Result<bool> {
        self.check_depth(depth)?;
        match term {
            Value::Variable(n) if &**n == name => Ok(true),
            Value::Variable(n) => match env.get(n) {
                Some(bound) if &**n != WILDCARD => self.occurs(name, bound, env, depth + 1),
                _ => Ok(false),
            },
            _ => {
                for child in term.children() {
                    if self.occurs(name, child, env, depth + 1)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Substitute every bound variable in `term`.
    fn resolve(&self, term: &Value, env: &Env, depth: usize) -> Result<Value> {
        self.check_depth(depth)?;
        match term {
            Value::Variable(n) if &**n != WILDCARD => match env.get(n) {
                Some(bound) => self.resolve(bound, env, depth + 1),
                None => Ok(term.clone()),
            },
            Value::List(items) => {
                let resolved = items
                    .iter()
                    .map(|item| self.resolve(item, env, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(Arc::from(resolved)))
            }
            Value::Object(map) => {
                let resolved = map
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), self.resolve(v, env, depth + 1)?)))
                    .collect::<Result<ObjectMap>>()?;
                Ok(Value::Object(Arc::new(resolved)))
            }
            _ => Ok(term.clone()),
        }
    }
}

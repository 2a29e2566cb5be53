//! Attribute maps carried by insert and retain operations, and the merge
//! algebra on them.
//!
//! [`Value::Null`] is not absence. On a retain it is a live instruction to
//! clear that key from the retained range (a tombstone); absence is the key
//! not being present at all. Composition keeps tombstones alive on retains,
//! where a later retain may still observe them, and strips them when they
//! land on freshly inserted content, which never had the key to begin with.

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use serde::{Deserialize, Serialize};

/// A single attribute value.
#[derive(Arbitrary, Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A string value, e.g. a colour or a link target.
    String(String),

    /// A numeric value. Wire numbers are always doubles, including numbers
    /// that happen to be integers.
    Number(f64),

    /// A boolean toggle, e.g. bold.
    Bool(bool),

    /// A tombstone: clears the key from retained content.
    Null,
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(lhs), Value::String(rhs)) => lhs == rhs,
            (Value::Number(lhs), Value::Number(rhs)) => lhs.to_bits() == rhs.to_bits(),
            (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

/// An unordered map from attribute name to [`Value`].
///
/// A missing map and an empty map mean the same thing. The algebra below
/// returns `None` rather than `Some(empty)`, so a serialised operation never
/// carries an empty `attributes` object.
#[derive(Arbitrary, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    /// Returns a new empty attribute map.
    pub fn new() -> Attributes {
        Attributes(BTreeMap::new())
    }

    /// Returns this map with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Attributes {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the number of keys in this map.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` iff this map holds no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the entries of this map.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    fn into_option(self) -> Option<Attributes> {
        (!self.0.is_empty()).then_some(self)
    }

    /// Applies `left`'s attributes, then `right`'s: the union of both maps,
    /// with `right`'s entries winning contested keys. With `keep_null =
    /// false` tombstones are stripped from the result; pass `true` when the
    /// result lands on retained content, where a tombstone is still a live
    /// instruction.
    pub fn compose(
        left: Option<Attributes>,
        right: Option<Attributes>,
        keep_null: bool,
    ) -> Option<Attributes> {
        let mut merged = left.unwrap_or_default().0;

        if let Some(right) = right {
            merged.extend(right.0);
        }

        if !keep_null {
            merged.retain(|_, value| *value != Value::Null);
        }

        Attributes(merged).into_option()
    }

    /// Returns `right`'s view of its own attributes once `left` has already
    /// been applied: the union of both maps, where `priority` picks the
    /// winner on contested keys (`left` when set, `right` otherwise).
    /// Tombstones pass through untouched; they stay meaningful until a
    /// compose consumes them.
    pub fn transform(
        left: Option<Attributes>,
        right: Option<Attributes>,
        priority: bool,
    ) -> Option<Attributes> {
        if left.is_none() && right.is_none() {
            return None;
        }

        let left = left.unwrap_or_default().0;
        let right = right.unwrap_or_default().0;

        let merged = match priority {
            true => {
                let mut merged = right;
                merged.extend(left);
                merged
            }
            false => {
                let mut merged = left;
                merged.extend(right);
                merged
            }
        };

        Attributes(merged).into_option()
    }

    /// Returns the change that rewrites `left` into `right`: `right`'s value
    /// wherever the two disagree, a tombstone wherever a key disappears.
    pub fn diff(left: Option<&Attributes>, right: Option<&Attributes>) -> Option<Attributes> {
        let mut out = BTreeMap::new();

        if let Some(right) = right {
            for (key, value) in &right.0 {
                if left.and_then(|left| left.get(key)) != Some(value) {
                    out.insert(key.clone(), value.clone());
                }
            }
        }

        if let Some(left) = left {
            for key in left.0.keys() {
                if right.map_or(true, |right| right.get(key).is_none()) {
                    out.insert(key.clone(), Value::Null);
                }
            }
        }

        Attributes(out).into_option()
    }
}

impl FromIterator<(String, Value)> for Attributes {
    fn from_iter<I>(iter: I) -> Attributes
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Attributes(iter.into_iter().collect())
    }
}

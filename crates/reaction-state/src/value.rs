//! Persistent state tree.
//!
//! [`StateValue`] is an immutable JSON-like tree whose containers are shared
//! through `Arc`. Cloning a value never copies a container, so a reducer can
//! hand unchanged branches to the new tree by reference and the diff engine
//! can tell "rebuilt" from "passed through" with [`StateValue::same`].

use crate::{Path, Seg};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;
use std::sync::Arc;

/// Insertion-ordered mapping node.
pub type Object = IndexMap<String, StateValue>;

pub(crate) static NULL: StateValue = StateValue::Null;

/// A node of the state tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum StateValue {
    /// Absent or null value.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(Number),
    /// String scalar.
    String(String),
    /// Shared ordered sequence.
    Array(Arc<Vec<StateValue>>),
    /// Shared insertion-ordered mapping.
    Object(Arc<Object>),
}

impl StateValue {
    /// Wrap a vector as a new array node.
    #[inline]
    pub fn array(items: Vec<StateValue>) -> Self {
        StateValue::Array(Arc::new(items))
    }

    /// Wrap a mapping as a new object node.
    #[inline]
    pub fn object(map: Object) -> Self {
        StateValue::Object(Arc::new(map))
    }

    /// An empty object node.
    #[inline]
    pub fn empty_object() -> Self {
        Self::object(Object::new())
    }

    /// Node identity.
    ///
    /// Containers are the same when they are the same allocation; scalars
    /// are the same when they are equal.
    pub fn same(&self, other: &StateValue) -> bool {
        match (self, other) {
            (StateValue::Array(a), StateValue::Array(b)) => Arc::ptr_eq(a, b),
            (StateValue::Object(a), StateValue::Object(b)) => Arc::ptr_eq(a, b),
            (StateValue::Array(_) | StateValue::Object(_), _)
            | (_, StateValue::Array(_) | StateValue::Object(_)) => false,
            (a, b) => a == b,
        }
    }

    /// Returns true for `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, StateValue::Null)
    }

    /// Returns true for arrays and objects.
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, StateValue::Array(_) | StateValue::Object(_))
    }

    /// Returns true for arrays.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, StateValue::Array(_))
    }

    /// Returns true for objects.
    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, StateValue::Object(_))
    }

    /// Borrow the boolean, if any.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the string, if any.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value as `i64`, if representable.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StateValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Numeric value as `u64`, if representable.
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            StateValue::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    /// Numeric value as `f64`.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StateValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Borrow the elements, if this is an array.
    #[inline]
    pub fn as_array(&self) -> Option<&[StateValue]> {
        match self {
            StateValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the mapping, if this is an object.
    #[inline]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            StateValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Property of an object.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.as_object()?.get(key)
    }

    /// Element of an array.
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<&StateValue> {
        self.as_array()?.get(index)
    }

    /// Resolve a concrete path.
    pub fn get_path(&self, path: &Path) -> Option<&StateValue> {
        path.iter().try_fold(self, |node, seg| match seg {
            Seg::Key(k) => node.get(k),
            Seg::Index(i) => node.get_index(*i),
        })
    }

    /// Number of children of a container, zero for scalars.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            StateValue::Array(items) => items.len(),
            StateValue::Object(map) => map.len(),
            _ => 0,
        }
    }

    /// Returns true when [`len`](Self::len) is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            StateValue::Null => "null",
            StateValue::Bool(_) => "boolean",
            StateValue::Number(_) => "number",
            StateValue::String(_) => "string",
            StateValue::Array(_) => "array",
            StateValue::Object(_) => "object",
        }
    }

    /// Deep copy into a `serde_json::Value`.
    pub fn to_json(&self) -> Value {
        match self {
            StateValue::Null => Value::Null,
            StateValue::Bool(b) => Value::Bool(*b),
            StateValue::Number(n) => Value::Number(n.clone()),
            StateValue::String(s) => Value::String(s.clone()),
            StateValue::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            StateValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for StateValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => StateValue::Null,
            Value::Bool(b) => StateValue::Bool(b),
            Value::Number(n) => StateValue::Number(n),
            Value::String(s) => StateValue::String(s),
            Value::Array(items) => {
                StateValue::array(items.into_iter().map(StateValue::from).collect())
            }
            Value::Object(map) => StateValue::object(
                map.into_iter()
                    .map(|(k, v)| (k, StateValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for StateValue {
    fn from(value: &Value) -> Self {
        StateValue::from(value.clone())
    }
}

impl From<&StateValue> for Value {
    fn from(value: &StateValue) -> Self {
        value.to_json()
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Bool(b)
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        StateValue::String(s.to_owned())
    }
}

impl From<String> for StateValue {
    fn from(s: String) -> Self {
        StateValue::String(s)
    }
}

impl From<i64> for StateValue {
    fn from(v: i64) -> Self {
        StateValue::Number(v.into())
    }
}

impl From<i32> for StateValue {
    fn from(v: i32) -> Self {
        StateValue::Number(v.into())
    }
}

impl From<u64> for StateValue {
    fn from(v: u64) -> Self {
        StateValue::Number(v.into())
    }
}

impl From<usize> for StateValue {
    fn from(v: usize) -> Self {
        StateValue::Number((v as u64).into())
    }
}

impl From<f64> for StateValue {
    /// Non-finite floats become `Null`.
    fn from(v: f64) -> Self {
        Number::from_f64(v).map_or(StateValue::Null, StateValue::Number)
    }
}

impl From<Vec<StateValue>> for StateValue {
    fn from(items: Vec<StateValue>) -> Self {
        StateValue::array(items)
    }
}

impl From<Object> for StateValue {
    fn from(map: Object) -> Self {
        StateValue::object(map)
    }
}

impl<T: Into<StateValue>> From<Option<T>> for StateValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(StateValue::Null, Into::into)
    }
}

impl PartialEq<Value> for StateValue {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (StateValue::Null, Value::Null) => true,
            (StateValue::Bool(a), Value::Bool(b)) => a == b,
            (StateValue::Number(a), Value::Number(b)) => a == b,
            (StateValue::String(a), Value::String(b)) => a == b,
            (StateValue::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
            }
            (StateValue::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).map_or(false, |other| v == other))
            }
            _ => false,
        }
    }
}

impl PartialEq<str> for StateValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for StateValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<bool> for StateValue {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

macro_rules! eq_signed {
    ($($ty:ty),*) => {$(
        impl PartialEq<$ty> for StateValue {
            fn eq(&self, other: &$ty) -> bool {
                self.as_i64() == Some(i64::from(*other))
            }
        }
    )*};
}

macro_rules! eq_unsigned {
    ($($ty:ty),*) => {$(
        impl PartialEq<$ty> for StateValue {
            fn eq(&self, other: &$ty) -> bool {
                self.as_u64() == u64::try_from(*other).ok()
            }
        }
    )*};
}

eq_signed!(i32, i64);
eq_unsigned!(u32, u64, usize);

impl std::ops::Index<&str> for StateValue {
    type Output = StateValue;

    /// Missing properties index to `Null`.
    fn index(&self, key: &str) -> &StateValue {
        self.get(key).unwrap_or(&NULL)
    }
}

impl std::ops::Index<usize> for StateValue {
    type Output = StateValue;

    /// Missing elements index to `Null`.
    fn index(&self, index: usize) -> &StateValue {
        self.get_index(index).unwrap_or(&NULL)
    }
}

impl Serialize for StateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StateValue::Null => serializer.serialize_unit(),
            StateValue::Bool(b) => serializer.serialize_bool(*b),
            StateValue::Number(n) => n.serialize(serializer),
            StateValue::String(s) => serializer.serialize_str(s),
            StateValue::Array(items) => serializer.collect_seq(items.iter()),
            StateValue::Object(map) => serializer.collect_map(map.iter()),
        }
    }
}

impl<'de> Deserialize<'de> for StateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(StateValue::from)
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

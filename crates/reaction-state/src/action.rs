//! Actions and the constructors that build them.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::ReactionResult;

/// Payload builder of a reaction: positional arguments in, payload out.
pub type PayloadFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Action creators by name.
pub type ActionTable = IndexMap<String, ActionCreator>;

/// A dispatchable record: the registry-assigned type plus the payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    action_type: String,
    payload: Value,
}

impl Action {
    pub(crate) fn new(action_type: impl Into<String>, payload: Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }

    /// Action handed to matchers when no dispatch is in flight.
    pub fn empty() -> Self {
        Self::new(String::new(), Value::Null)
    }

    /// The qualified action type, e.g. `list1.AddItem`.
    #[inline]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// The payload built by the action constructor.
    #[inline]
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Field of an object payload.
    #[inline]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    /// Decode the payload into a typed value.
    pub fn payload_as<T: DeserializeOwned>(&self) -> ReactionResult<T> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}

impl std::ops::Index<&str> for Action {
    type Output = Value;

    /// Missing fields index to `Null`.
    fn index(&self, field: &str) -> &Value {
        &self.payload[field]
    }
}

impl Serialize for Action {
    /// Object payloads are flattened next to `type`; anything else is nested
    /// under `payload`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.action_type)?;
        match &self.payload {
            Value::Object(fields) => {
                for (k, v) in fields.iter().filter(|(k, _)| k.as_str() != "type") {
                    map.serialize_entry(k, v)?;
                }
            }
            Value::Null => {}
            other => map.serialize_entry("payload", other)?,
        }
        map.end()
    }
}

/// Builds actions of one registered type.
///
/// The type is injected by the registry; callers only supply arguments.
#[derive(Clone)]
pub struct ActionCreator {
    action_type: String,
    payload: Arc<PayloadFn>,
}

impl ActionCreator {
    pub(crate) fn new(action_type: impl Into<String>, payload: Arc<PayloadFn>) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }

    /// The type every action from this creator carries.
    #[inline]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Build an action from positional arguments.
    pub fn create(&self, args: &[Value]) -> Action {
        Action::new(self.action_type.clone(), (self.payload)(args))
    }
}

impl fmt::Debug for ActionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("action_type", &self.action_type)
            .finish_non_exhaustive()
    }
}

//! The key-value view of one resource instance handed to every lifecycle callback.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{ProviderError, ProviderResult};
use crate::schema::Attribute;

#[cfg(test)]
#[path = "resource_data_tests.rs"]
mod tests;

/// Identifier, desired configuration and recorded state of one resource instance.
///
/// The configuration is what the user wants; the state is what the last `read` saw on
/// GitLab. Callbacks read the former and write the latter. An instance without an
/// identifier does not exist remotely as far as the provider knows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: Option<String>,
    config: Map<String, Value>,
    state: Map<String, Value>,
}

impl ResourceData {
    /// Creates data for an instance that has not been created yet.
    pub fn new(config: Map<String, Value>) -> Self {
        Self {
            id: None,
            config,
            state: Map::new(),
        }
    }

    /// Creates data for an instance with a previously recorded identifier and state.
    pub fn with_state(
        id: Option<String>,
        state: Map<String, Value>,
        config: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.filter(|id| !id.is_empty()),
            config,
            state,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Forgets the remote object: drops the identifier and every recorded attribute.
    pub fn clear_id(&mut self) {
        self.id = None;
        self.state.clear();
    }

    /// Parses the identifier as a GitLab numeric ID.
    ///
    /// # Errors
    /// `ProviderError::MissingId` when there is no identifier, `ProviderError::InvalidId`
    /// when it is not a number.
    pub fn parse_id(&self) -> ProviderResult<u64> {
        let id = self.id.as_deref().ok_or(ProviderError::MissingId)?;
        id.parse()
            .map_err(|_| ProviderError::InvalidId(id.to_string()))
    }

    pub fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    pub fn state(&self) -> &Map<String, Value> {
        &self.state
    }

    /// Splits into the identifier and recorded state, the parts a host persists.
    pub fn into_state(self) -> (Option<String>, Map<String, Value>) {
        (self.id, self.state)
    }

    /// Returns the recorded value of `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key).filter(|v| !v.is_null())
    }

    /// Returns the configured value of `key`. `null` counts as not configured.
    pub fn desired(&self, key: &str) -> Option<&Value> {
        self.config.get(key).filter(|v| !v.is_null())
    }

    /// Returns `true` when applying the configuration would change `attribute`.
    ///
    /// That is the case when the configuration sets a value different from the recorded
    /// one, or when it leaves out a non-computed attribute whose recorded value is not
    /// empty. A computed attribute left out of the configuration keeps GitLab's value and
    /// is never a change.
    pub fn has_change(&self, attribute: &Attribute) -> bool {
        let recorded = self.get(attribute.name);
        match self.desired(attribute.name) {
            Some(desired) => recorded != Some(desired),
            None => !attribute.is_computed() && recorded.is_some_and(|v| !is_empty_value(v)),
        }
    }

    /// Records one attribute.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.state.insert(key.to_string(), value.into());
    }

    /// Records every field of `value`, which must serialize to a JSON object.
    ///
    /// # Errors
    /// `ProviderError::State` when `value` does not serialize to an object.
    pub fn set_all<T: Serialize>(&mut self, value: &T) -> ProviderResult<()> {
        let fields: Map<String, Value> = serde_json::to_value(value)
            .and_then(serde_json::from_value)
            .map_err(ProviderError::State)?;
        self.state.extend(fields);
        Ok(())
    }

    /// Deserializes the configuration into a resource's typed config struct.
    ///
    /// # Errors
    /// `ProviderError::InvalidConfig` when a value does not fit the target type.
    pub fn typed_config<T: DeserializeOwned>(&self) -> ProviderResult<T> {
        serde_json::from_value(Value::Object(self.config.clone()))
            .map_err(|e| ProviderError::InvalidConfig(e.to_string()))
    }
}

/// The zero value of an attribute type, which counts as "nothing recorded".
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_u64() == Some(0) || n.as_i64() == Some(0),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

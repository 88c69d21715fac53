//! Static attribute tables describing each resource type.
//!
//! A [`ResourceSchema`] lists every attribute a resource has: its value type, whether the
//! configuration must, may or cannot set it, and which local validator applies. The same
//! table drives configuration validation, change detection in [`crate::ResourceData`] and
//! the `schema` command of the CLI.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{ProviderError, ProviderResult, ValidationError};
use crate::validation::{validate_name, validate_one_of, validate_path};
use crate::visibility::VISIBILITY_VALUES;

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
    Int,
}

impl AttributeType {
    /// Returns `true` when `value` has this type. `null` never matches.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::Int => value.is_u64() || value.is_i64(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Bool => "boolean",
            AttributeType::Int => "integer",
        }
    }
}

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Must be set in the configuration.
    Required,
    /// May be set; when left out nothing is sent and the recorded value is cleared on update.
    Optional,
    /// May be set; when left out GitLab's value is kept and recorded.
    OptionalComputed,
    /// Set by GitLab only. Configuring it is an error.
    Computed,
}

/// Local check run on a configured string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    Name,
    Path,
    Visibility,
}

impl Validator {
    fn check(&self, attribute: &str, value: &str) -> Vec<ValidationError> {
        match self {
            Validator::Name => validate_name(value),
            Validator::Path => validate_path(value),
            // Case-insensitive here while the codec matches exactly: "Internal" validates
            // but is never sent.
            Validator::Visibility => validate_one_of(attribute, value, &VISIBILITY_VALUES),
        }
    }
}

/// One attribute of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub presence: Presence,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,
}

impl Attribute {
    pub const fn new(
        name: &'static str,
        kind: AttributeType,
        presence: Presence,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            presence,
            description,
            validator: None,
        }
    }

    pub const fn validated_by(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Returns `true` when GitLab supplies the value whenever the configuration does not.
    pub fn is_computed(&self) -> bool {
        matches!(self.presence, Presence::OptionalComputed | Presence::Computed)
    }

    /// Returns `true` when the configuration may not set this attribute at all.
    pub fn is_read_only(&self) -> bool {
        self.presence == Presence::Computed
    }
}

/// The full attribute table of one resource type.
#[derive(Debug, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub description: &'static str,
    pub attributes: &'static [Attribute],
}

impl ResourceSchema {
    /// Looks up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Checks a desired configuration without contacting GitLab.
    ///
    /// Every problem found is reported: missing required attributes, unknown or read-only
    /// attributes, values of the wrong type, and values rejected by the attribute's
    /// validator. `null` values count as absent.
    ///
    /// # Errors
    /// Returns `ProviderError::Validation` carrying all problems when there is at least one.
    pub fn validate(&self, config: &Map<String, Value>) -> ProviderResult<()> {
        let mut errors = Vec::new();

        for attribute in self.attributes {
            let missing = config.get(attribute.name).is_none_or(Value::is_null);
            if attribute.presence == Presence::Required && missing {
                errors.push(ValidationError::MissingAttribute {
                    attribute: attribute.name.to_string(),
                });
            }
        }

        for (key, value) in config {
            if value.is_null() {
                continue;
            }

            let Some(attribute) = self.attribute(key) else {
                errors.push(ValidationError::UnknownAttribute {
                    attribute: key.clone(),
                });
                continue;
            };

            if attribute.is_read_only() {
                errors.push(ValidationError::ReadOnlyAttribute {
                    attribute: key.clone(),
                });
                continue;
            }

            if !attribute.kind.matches(value) {
                errors.push(ValidationError::WrongType {
                    attribute: key.clone(),
                    expected: attribute.kind.describe(),
                });
                continue;
            }

            if let (Some(validator), Some(s)) = (attribute.validator, value.as_str()) {
                errors.extend(validator.check(attribute.name, s));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::Validation(errors))
        }
    }
}

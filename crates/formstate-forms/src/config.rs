//! Declarative form configuration.
//!
//! A [`FormConfig`] lists the fields of a form in declaration order, each with
//! a [`FieldConfig`] giving its default value, declared shape, validators, and
//! whether it validates on every change. Configs are built in code or loaded
//! from TOML or JSON:
//!
//! ```toml
//! name = "signup"
//!
//! [fields.email]
//! default_value = ""
//! validators = [{ rule = "email", error_text = "Enter an email" }]
//!
//! [fields.tags]
//! value_type = "array"
//! ```
//!
//! The form keeps its config as an immutable snapshot and resets from it.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use formstate_core::{FormError, FormResult, Value, ValueType};

use crate::validators::ValidatorSpec;

/// Configuration of a single field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// The initial value, restored by [`Form::reset`](crate::form::Form::reset).
    pub default_value: Option<Value>,
    /// The declared shape. Inferred from `default_value` when absent.
    pub value_type: Option<ValueType>,
    /// Validators, evaluated in order.
    pub validators: Vec<ValidatorSpec>,
    /// Whether every value change runs validation.
    pub validate_on_change: bool,
}

impl FieldConfig {
    /// Creates an empty field config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a field config with a default value.
    pub fn with_default(value: impl Into<Value>) -> Self {
        Self {
            default_value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Sets the declared shape.
    #[must_use]
    pub const fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator(mut self, spec: ValidatorSpec) -> Self {
        self.validators.push(spec);
        self
    }

    /// Replaces the validator list.
    #[must_use]
    pub fn validators(mut self, specs: Vec<ValidatorSpec>) -> Self {
        self.validators = specs;
        self
    }

    /// Sets whether every value change runs validation.
    #[must_use]
    pub const fn validate_on_change(mut self, enabled: bool) -> Self {
        self.validate_on_change = enabled;
        self
    }
}

/// Configuration of a whole form.
///
/// # Examples
///
/// ```
/// use formstate_forms::config::{FieldConfig, FormConfig};
/// use formstate_forms::validators::not_empty;
///
/// let config = FormConfig::new("login")
///     .field("username", FieldConfig::new().validator(not_empty()))
///     .field("remember", FieldConfig::with_default(false));
///
/// let names: Vec<&str> = config.field_names().collect();
/// assert_eq!(names, ["username", "remember"]);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// A name used in log output.
    pub name: String,
    #[serde(deserialize_with = "deserialize_fields")]
    fields: Vec<(String, FieldConfig)>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            name: "form".to_string(),
            fields: Vec::new(),
        }
    }
}

impl FormConfig {
    /// Creates an empty form config.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declares a field. Redeclaring a name replaces its config in place.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, config: FieldConfig) -> Self {
        let name = name.into();
        if let Some(entry) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = config;
        } else {
            self.fields.push((name, config));
        }
        self
    }

    /// Returns the field configs in declaration order.
    pub fn fields(&self) -> &[(String, FieldConfig)] {
        &self.fields
    }

    /// Returns the declared field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the config of the named field.
    pub fn get(&self, name: &str) -> Option<&FieldConfig> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, config)| config)
    }

    /// Loads a form config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Deserialize`] if the document is malformed.
    pub fn from_toml_str(toml_str: &str) -> FormResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| FormError::Deserialize(format!("Failed to parse form TOML: {e}")))
    }

    /// Loads a form config from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Deserialize`] if the document is malformed.
    pub fn from_json_str(json_str: &str) -> FormResult<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| FormError::Deserialize(format!("Failed to parse form JSON: {e}")))
    }
}

/// Reads a map of field name -> config, keeping document order.
fn deserialize_fields<'de, D>(deserializer: D) -> Result<Vec<(String, FieldConfig)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FieldsVisitor;

    impl<'de> Visitor<'de> for FieldsVisitor {
        type Value = Vec<(String, FieldConfig)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of field names to field configs")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut fields: Vec<(String, FieldConfig)> = Vec::new();
            while let Some((name, config)) = map.next_entry::<String, FieldConfig>()? {
                if fields.iter().any(|(n, _)| *n == name) {
                    return Err(de::Error::custom(format!("duplicate field '{name}'")));
                }
                fields.push((name, config));
            }
            Ok(fields)
        }
    }

    deserializer.deserialize_map(FieldsVisitor)
}

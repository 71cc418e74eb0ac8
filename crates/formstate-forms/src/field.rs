//! A single form field.
//!
//! A [`FormField`] owns one value, its declared shape, the error state the UI
//! renders, and the validators bound to it. Every mutation that the UI should
//! see ends with a [`Refresh`] sent on the form's shared signal, unless the
//! caller suppresses it to batch several changes.
//!
//! List values are replaced, never mutated in place: every push or remove
//! installs a new list, so consumers caching the previous list still see the
//! old contents.

use std::borrow::Cow;
use std::sync::Arc;

use formstate_core::{FormError, FormResult, Value, ValueType};
use formstate_signals::{Refresh, Signal};

use crate::config::FieldConfig;
use crate::validators::{Validator, ValidatorSpec};

/// A change event coming from a text-like UI control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeEvent {
    /// The control's current text.
    pub value: String,
}

impl ChangeEvent {
    /// Creates a change event carrying `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// One named field of a form.
#[derive(Debug)]
pub struct FormField {
    name: String,
    value: Option<Value>,
    value_type: ValueType,
    error: bool,
    error_text: Option<String>,
    validators: Vec<Validator>,
    validate_on_change: bool,
    refresh: Arc<Signal<Refresh>>,
}

impl FormField {
    /// Creates a field from its configuration.
    ///
    /// The declared shape is taken from `config.value_type`, otherwise
    /// inferred from the default value, otherwise `String`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::TypeMismatch`] if the default contradicts the
    /// declared shape, or [`FormError::InvalidPattern`] if a validator's
    /// pattern does not compile.
    pub fn new(
        name: impl Into<String>,
        config: &FieldConfig,
        refresh: Arc<Signal<Refresh>>,
    ) -> FormResult<Self> {
        let name = name.into();
        let inferred = config.default_value.as_ref().map(Value::value_type);
        let value_type = match (config.value_type, inferred) {
            (Some(expected), Some(found)) if expected != found => {
                return Err(FormError::TypeMismatch {
                    field: name,
                    expected,
                    found,
                });
            }
            (Some(declared), _) => declared,
            (None, Some(found)) => found,
            (None, None) => ValueType::String,
        };
        let validators = bind_all(&name, &config.validators)?;

        Ok(Self {
            name,
            value: config.default_value.clone(),
            value_type,
            error: false,
            error_text: None,
            validators,
            validate_on_change: config.validate_on_change,
            refresh,
        })
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared shape.
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the current value, or the shape's fallback when unset.
    ///
    /// Never empty-handed: an unset boolean reads as `false`, a number as
    /// `0`, a string as `""`, and a list as `[]`.
    pub fn value(&self) -> Cow<'_, Value> {
        self.value
            .as_ref()
            .map_or_else(|| Cow::Owned(Value::fallback(self.value_type)), Cow::Borrowed)
    }

    /// Returns the stored value without applying the fallback.
    pub const fn raw_value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Returns `true` if the last validation of this field failed.
    pub const fn error(&self) -> bool {
        self.error
    }

    /// Returns the message of the last failed validation.
    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    /// Returns the bound validators in evaluation order.
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Returns `true` if every value change triggers validation.
    pub const fn validates_on_change(&self) -> bool {
        self.validate_on_change
    }

    /// Sets the value and notifies.
    pub fn set_value(&mut self, new_value: impl Into<Value>) {
        self.set_value_with(new_value, true);
    }

    /// Sets the value, notifying only if `notify` is `true`.
    ///
    /// The stored value is left untouched when it already equals `new_value`.
    /// Fields declared with `validate_on_change` are validated either way.
    pub fn set_value_with(&mut self, new_value: impl Into<Value>, notify: bool) {
        self.store(new_value.into());
        if self.validate_on_change {
            self.run_validators();
        }
        if notify {
            self.notify();
        }
    }

    /// Sets the error state and notifies.
    pub fn set_error(&mut self, is_valid: bool, error_text: Option<String>) {
        self.apply_error(is_valid, error_text);
        self.notify();
    }

    /// Applies a change event from a UI control.
    ///
    /// The text is converted to the declared shape: booleans accept
    /// "true"/"1"/"yes"/"on", numbers are parsed, and anything that does not
    /// parse is stored as text.
    pub fn handle_change(&mut self, event: &ChangeEvent) {
        let raw = event.value.as_str();
        let value = match self.value_type {
            ValueType::Boolean => Value::Bool(matches!(
                raw.to_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )),
            ValueType::Number => raw
                .trim()
                .parse::<f64>()
                .map_or_else(|_| Value::from(raw), Value::Number),
            ValueType::String | ValueType::Array => Value::from(raw),
        };
        self.set_value(value);
    }

    /// Validates the field and notifies. Returns `true` if every validator passed.
    pub fn validate(&mut self) -> bool {
        let valid = self.run_validators();
        self.notify();
        valid
    }

    /// Replaces the bound validators with fresh instances of `specs`.
    ///
    /// The previous list is discarded, not merged. If `validate` is `true`
    /// the field is validated against the new rules right away.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidPattern`] if a pattern does not compile;
    /// the previous validators are kept in that case.
    pub fn replace_validators(&mut self, specs: &[ValidatorSpec], validate: bool) -> FormResult<()> {
        self.validators = bind_all(&self.name, specs)?;
        if validate {
            self.validate();
        }
        Ok(())
    }

    /// Flips a boolean field.
    ///
    /// On a field of another shape a warning is logged and the value is
    /// replaced by the negation of its truthiness.
    pub fn toggle(&mut self) {
        if self.value_type != ValueType::Boolean {
            tracing::warn!(field = %self.name, "toggle() called on a non-boolean field");
        }
        let flipped = !self.value().is_truthy();
        self.set_value(flipped);
    }

    /// Appends `item` to a list field. A list `item` is appended element-wise.
    pub fn push_to_array(&mut self, item: impl Into<Value>) {
        let mut items = self.list_for("push_to_array");
        match item.into() {
            Value::List(more) => items.extend(more),
            single => items.push(single),
        }
        self.set_value(Value::List(items));
    }

    /// Removes every occurrence of `item` from a list field. A list `item`
    /// removes each of its elements.
    pub fn remove_from_array(&mut self, item: impl Into<Value>) {
        let mut items = self.list_for("remove_from_array");
        match item.into() {
            Value::List(unwanted) => items.retain(|v| !unwanted.contains(v)),
            single => items.retain(|v| *v != single),
        }
        self.set_value(Value::List(items));
    }

    /// Adds `item` if absent or removes it if present.
    ///
    /// Returns `true` if the item was added.
    pub fn toggle_in_array(&mut self, item: impl Into<Value>) -> bool {
        let item = item.into();
        let exists = self.list_for("toggle_in_array").contains(&item);
        if exists {
            self.remove_from_array(item);
        } else {
            self.push_to_array(item);
        }
        !exists
    }

    // ── Crate-internal ───────────────────────────────────────────────

    /// Runs the validators without notifying.
    ///
    /// Validators run in order and stop at the first failure, whose message
    /// becomes the field's error text. On success a stale error is cleared.
    pub(crate) fn run_validators(&mut self) -> bool {
        let value = self.value().into_owned();
        let failure = self
            .validators
            .iter()
            .map(|validator| validator.validate(&value))
            .find(|result| !result.valid);

        match failure {
            Some(result) => {
                tracing::debug!(field = %self.name, error = ?result.error_text, "field invalid");
                self.apply_error(false, result.error_text);
                false
            }
            None => {
                if self.error {
                    self.apply_error(true, None);
                }
                true
            }
        }
    }

    /// Stores a value without validating or notifying.
    ///
    /// Bulk writes use this so the form can run one validation pass at the
    /// end, whatever the fields' `validate_on_change` settings.
    pub(crate) fn store(&mut self, new_value: Value) {
        if new_value.value_type() != self.value_type {
            tracing::warn!(
                field = %self.name,
                expected = %self.value_type,
                found = %new_value.value_type(),
                "value does not match the field's declared type"
            );
        }
        if self.value.as_ref() != Some(&new_value) {
            self.value = Some(new_value);
        }
    }

    /// Restores the value given at construction and clears the error state.
    pub(crate) fn restore(&mut self, default_value: Option<Value>) {
        self.value = default_value;
        self.apply_error(true, None);
    }

    fn apply_error(&mut self, is_valid: bool, error_text: Option<String>) {
        self.error = !is_valid;
        self.error_text = error_text;
    }

    fn notify(&self) {
        tracing::trace!(field = %self.name, "refresh");
        self.refresh.send(&Refresh);
    }

    /// Returns a copy of the current list, warning if the field is not
    /// list-shaped. A scalar value becomes a one-element list; an unset
    /// value becomes an empty one.
    fn list_for(&self, operation: &str) -> Vec<Value> {
        if !self.value_type.is_array() {
            tracing::warn!(
                field = %self.name,
                operation,
                "array operation called on a non-array field"
            );
        }
        match self.value.as_ref() {
            Some(Value::List(items)) => items.clone(),
            Some(scalar) => vec![scalar.clone()],
            None => Vec::new(),
        }
    }
}

fn bind_all(field: &str, specs: &[ValidatorSpec]) -> FormResult<Vec<Validator>> {
    specs.iter().map(|spec| Validator::bind(field, spec)).collect()
}

//! Field value types.
//!
//! The [`Value`] enum is the in-memory representation of everything a form
//! field can hold: a boolean, a number, a string, or a list of those.
//! [`ValueType`] is the declared shape of a field, used to pick a fallback
//! when the field holds nothing and to decide which mutating operations make
//! sense for it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared shape of a field's value.
///
/// A field either declares its shape explicitly or has it inferred from its
/// default value via [`Value::value_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// A `true`/`false` flag.
    Boolean,
    /// A floating-point number.
    Number,
    /// A UTF-8 string.
    String,
    /// A list of scalar values.
    Array,
}

impl ValueType {
    /// Returns `true` if values of this shape are lists.
    pub const fn is_array(self) -> bool {
        matches!(self, Self::Array)
    }

    /// Returns the lowercase name of this shape.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field value.
///
/// Serialized untagged, so JSON or TOML literals map onto the matching
/// variant directly (`true`, `3`, `"text"`, `[1, 2]`).
///
/// # Examples
///
/// ```
/// use formstate_core::value::{Value, ValueType};
///
/// let v = Value::from("hello");
/// assert_eq!(v.value_type(), ValueType::String);
/// assert_eq!(v.length(), Some(5));
///
/// let v = Value::from(vec![1, 2]);
/// assert_eq!(v.coerce_string(), "1,2");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// A list of values.
    List(Vec<Value>),
}

impl Value {
    /// Returns the value used when a field of the given shape holds nothing.
    ///
    /// - `Boolean` -> `false`
    /// - `Number` -> `0`
    /// - `String` -> `""`
    /// - `Array` -> `[]`
    pub const fn fallback(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Boolean => Self::Bool(false),
            ValueType::Number => Self::Number(0.0),
            ValueType::String => Self::String(String::new()),
            ValueType::Array => Self::List(Vec::new()),
        }
    }

    /// Returns the shape of this value.
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Boolean,
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
            Self::List(_) => ValueType::Array,
        }
    }

    /// Returns `true` unless the value is `false`, zero, NaN, or an empty string.
    ///
    /// Lists are always truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::List(_) => true,
        }
    }

    /// Returns the length of a string (in characters) or a list.
    ///
    /// Booleans and numbers have no length.
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::List(items) => Some(items.len()),
            Self::Bool(_) | Self::Number(_) => None,
        }
    }

    /// Converts the value to the string a pattern rule is tested against.
    ///
    /// Integral numbers print without a fractional part and lists join
    /// their elements with `,`.
    pub fn coerce_string(&self) -> String {
        self.to_string()
    }

    /// Returns the inner string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner boolean, if this is a boolean.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the inner number, if this is a number.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the inner list, if this is a list.
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

#[allow(clippy::cast_precision_loss)]
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

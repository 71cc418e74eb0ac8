//! Error types for the formstate crates.
//!
//! Validation failures are never errors: they are recorded on the field and
//! the form for the UI to render. [`FormError`] only covers construction and
//! configuration problems, such as a pattern that does not compile or a bulk
//! write that names a field the form does not have.

use thiserror::Error;

use crate::value::ValueType;

/// The primary error type for the formstate crates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A field name was not declared on the form.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Several field names were not declared on the form.
    #[error("Unknown fields: {}", .0.join(", "))]
    UnknownFields(Vec<String>),

    /// A caller-supplied regular expression failed to compile.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// The compiler's explanation.
        reason: String,
    },

    /// A default value does not match the field's declared shape.
    #[error("Field '{field}' is declared as {expected} but its default is {found}")]
    TypeMismatch {
        /// The field name.
        field: String,
        /// The declared shape.
        expected: ValueType,
        /// The shape of the supplied default.
        found: ValueType,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A declarative document could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;

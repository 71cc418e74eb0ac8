//! # formstate-core
//!
//! Core types shared by the formstate crates. This crate has no dependency on
//! the other formstate crates and provides the value model every field is
//! built on.
//!
//! ## Modules
//!
//! - [`value`] - Field values and their declared shapes
//! - [`error_text`] - Static or deferred validation messages
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Library settings and TOML loading
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod error_text;
pub mod logging;
pub mod settings;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{FormError, FormResult};
pub use error_text::ErrorText;
pub use settings::Settings;
pub use value::{Value, ValueType};

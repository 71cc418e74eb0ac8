//! # formstate
//!
//! Client-side form state for Rust.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient access.
//! You can depend on `formstate` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use formstate::forms::{FieldConfig, Form, FormConfig};
//! use formstate::forms::validators::{email, not_empty};
//!
//! let mut form = Form::new(
//!     FormConfig::new("signup")
//!         .field("name", FieldConfig::new().validator(not_empty()))
//!         .field("email", FieldConfig::new().validator(email())),
//! )
//! .unwrap();
//!
//! assert!(!form.validate());
//! form.set_form_data([("name", "Ada"), ("email", "ada@example.com")]).unwrap();
//! assert!(form.is_valid());
//! ```

/// Field values, error text, settings, logging, and error types.
pub use formstate_core as core;

/// Fields, validators, forms, and submission.
#[cfg(feature = "forms")]
pub use formstate_forms as forms;

/// Refresh signals for decoupled redraw callbacks.
#[cfg(feature = "signals")]
pub use formstate_signals as signals;

pub use serde;
pub use serde_json;
pub use tokio_util;
pub use tracing;
pub use tracing_subscriber;

/// The types most programs need, in one import.
pub mod prelude {
    pub use formstate_core::{ErrorText, FormError, FormResult, Settings, Value, ValueType};

    #[cfg(feature = "forms")]
    pub use formstate_forms::{
        validators, ChangeEvent, FieldConfig, Form, FormConfig, FormData, FormField, FormState,
        Submission, ValidatorSpec,
    };

    #[cfg(feature = "signals")]
    pub use formstate_signals::{Refresh, Signal};
}

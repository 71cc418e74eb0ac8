//! # formstate-forms
//!
//! Client-side form state. A [`Form`](form::Form) owns named
//! [`FormField`](field::FormField)s, each holding a value, an error state, and
//! the validators bound to it. The form aggregates validation, mediates
//! submit and reset, and tells the UI to redraw through a shared signal.
//!
//! ## Modules
//!
//! - [`config`] - Declarative field and form configuration
//! - [`field`] - A single field and its value operations
//! - [`validators`] - Validation rules and their factories
//! - [`form`] - The form container
//! - [`submission`] - Submission state, payload, and handler types

pub mod config;
pub mod field;
pub mod form;
pub mod submission;
pub mod validators;

pub use config::{FieldConfig, FormConfig};
pub use field::{ChangeEvent, FormField};
pub use form::Form;
pub use submission::{FormData, FormState, SubmitHandler, Submission};
pub use validators::{ValidResult, Validator, ValidatorSpec};

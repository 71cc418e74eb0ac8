//! Submission lifecycle types.
//!
//! A valid submit hands the handler a [`Submission`]: the field values plus a
//! [`CancellationToken`] that is cancelled when a newer submit supersedes this
//! one. Cancellation is advisory; the form never waits on or tears down the
//! handler's work.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use formstate_core::Value;

/// Field name -> value, as produced by [`Form::get_form_data`](crate::form::Form::get_form_data).
///
/// The map is unordered. Use [`Form::fields`](crate::form::Form::fields) when
/// declaration order matters.
pub type FormData = HashMap<String, Value>;

/// The callback invoked with each valid submission.
///
/// It may return a state to record on the form right away, typically
/// [`FormState::Sending`] when it starts background work.
pub type SubmitHandler = Arc<dyn Fn(Submission) -> Option<FormState> + Send + Sync>;

/// Where the form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormState {
    /// Nothing submitted yet, or reset since.
    #[default]
    Init,
    /// A submission is in flight.
    Sending,
    /// The last submission succeeded.
    Success,
    /// The last submission failed.
    Fail,
}

impl FormState {
    /// Returns `true` once a submission has finished, successfully or not.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Success | Self::Fail)
    }
}

/// One submit attempt as seen by the handler.
#[derive(Debug, Clone)]
pub struct Submission {
    /// The submitted values.
    pub data: FormData,
    /// Cancelled when a newer submit supersedes this one.
    pub cancel: CancellationToken,
}

impl Submission {
    /// Returns `true` if a newer submit has superseded this one.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

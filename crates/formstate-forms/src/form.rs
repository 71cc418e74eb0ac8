//! The form container.
//!
//! A [`Form`] owns its fields in declaration order, aggregates their
//! validation into a single `is_valid` flag, and mediates submit and reset.
//! All fields share one [`Signal<Refresh>`]; the UI binding connects to it via
//! [`Form::on_refresh`] and redraws whenever it fires.
//!
//! Bulk operations ([`Form::set_form_data`], [`Form::reset`],
//! [`Form::validate`]) apply their changes silently and notify exactly once.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use formstate_core::logging::form_span;
use formstate_core::{FormError, FormResult, Value};
use formstate_signals::{Refresh, Signal};

use crate::config::FormConfig;
use crate::field::FormField;
use crate::submission::{FormData, FormState, SubmitHandler, Submission};

/// A reactive set of named fields.
///
/// # Examples
///
/// ```
/// use formstate_forms::config::{FieldConfig, FormConfig};
/// use formstate_forms::form::Form;
/// use formstate_forms::validators::{email, not_empty};
///
/// let mut form = Form::new(
///     FormConfig::new("signup")
///         .field("name", FieldConfig::new().validator(not_empty()))
///         .field("email", FieldConfig::new().validator(email())),
/// )
/// .unwrap();
///
/// assert!(!form.validate());
/// form.set_form_data([("name", "Alice"), ("email", "alice@example.com")]).unwrap();
/// assert!(form.is_valid());
/// ```
pub struct Form {
    name: String,
    fields: Vec<FormField>,
    is_valid: bool,
    state: FormState,
    initial_config: Arc<FormConfig>,
    on_submit: Option<SubmitHandler>,
    in_flight: Option<CancellationToken>,
    refresh: Arc<Signal<Refresh>>,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("is_valid", &self.is_valid)
            .field("state", &self.state)
            .field("has_on_submit", &self.on_submit.is_some())
            .field("in_flight", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

impl Form {
    /// Creates a form from its configuration.
    ///
    /// The config is kept as the immutable snapshot [`reset`](Self::reset)
    /// restores from. No validation runs and nothing is notified.
    ///
    /// # Errors
    ///
    /// Returns the first field construction error (shape mismatch or
    /// invalid pattern).
    pub fn new(config: FormConfig) -> FormResult<Self> {
        let refresh = Arc::new(Signal::new());
        let fields = config
            .fields()
            .iter()
            .map(|(name, field_config)| FormField::new(name.clone(), field_config, Arc::clone(&refresh)))
            .collect::<FormResult<Vec<_>>>()?;

        tracing::debug!(form = %config.name, fields = fields.len(), "form created");

        Ok(Self {
            name: config.name.clone(),
            fields,
            is_valid: false,
            state: FormState::Init,
            initial_config: Arc::new(config),
            on_submit: None,
            in_flight: None,
            refresh,
        })
    }

    /// Sets the submit handler.
    #[must_use]
    pub fn with_on_submit(
        mut self,
        handler: impl Fn(Submission) -> Option<FormState> + Send + Sync + 'static,
    ) -> Self {
        self.on_submit = Some(Arc::new(handler));
        self
    }

    /// Replaces the submit handler. Bindings call this when the callback they
    /// were given changes; the form and its state are kept.
    pub fn set_on_submit(&mut self, handler: SubmitHandler) {
        self.on_submit = Some(handler);
    }

    /// Removes the submit handler.
    pub fn clear_on_submit(&mut self) {
        self.on_submit = None;
    }

    /// Returns the form name used in log output.
    pub fn name(&self) -> &str {
        &self.name
    }

    // ── Notification ─────────────────────────────────────────────────

    /// Returns the signal fired whenever the UI should redraw.
    pub fn refresh_signal(&self) -> Arc<Signal<Refresh>> {
        Arc::clone(&self.refresh)
    }

    /// Connects a redraw callback under `receiver_id`.
    pub fn on_refresh(&self, receiver_id: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) {
        self.refresh
            .connect(receiver_id, Arc::new(move |_: &Refresh| callback()));
    }

    fn notify(&self) {
        tracing::trace!(form = %self.name, "refresh");
        self.refresh.send(&Refresh);
    }

    // ── Fields ───────────────────────────────────────────────────────

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Returns the named field.
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the named field mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    /// Sets one field's value and notifies.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if the form has no such field.
    pub fn set_field_value(&mut self, name: &str, value: impl Into<Value>) -> FormResult<()> {
        self.field_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?
            .set_value(value);
        Ok(())
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Returns the result of the most recent [`validate`](Self::validate).
    ///
    /// `false` until the form has been validated.
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Validates every field, records the conjunction, and notifies once.
    ///
    /// All fields are validated even after one fails, so every error is
    /// shown at once.
    pub fn validate(&mut self) -> bool {
        let is_valid = self
            .fields
            .iter_mut()
            .map(FormField::run_validators)
            .fold(true, |acc, valid| acc && valid);

        tracing::debug!(form = %self.name, is_valid, "form validated");
        self.is_valid = is_valid;
        self.notify();
        is_valid
    }

    // ── Data ─────────────────────────────────────────────────────────

    /// Returns every field's current value, keyed by field name.
    pub fn get_form_data(&self) -> FormData {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.value().into_owned()))
            .collect()
    }

    /// Writes many field values, then validates and notifies once.
    ///
    /// Known fields are always written, even when some names are unknown.
    /// Fields declared with `validate_on_change` are not validated per write;
    /// the single pass at the end covers them.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownFields`] listing (sorted) the names the
    /// form does not declare.
    pub fn set_form_data<I, K, V>(&mut self, data: I) -> FormResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut unknown = Vec::new();
        for (name, value) in data {
            let name = name.as_ref();
            match self.field_mut(name) {
                Some(field) => field.store(value.into()),
                None => unknown.push(name.to_string()),
            }
        }

        self.validate();

        if unknown.is_empty() {
            Ok(())
        } else {
            unknown.sort();
            tracing::warn!(form = %self.name, ?unknown, "set_form_data named unknown fields");
            Err(FormError::UnknownFields(unknown))
        }
    }

    /// Restores every field to the default it was configured with, clears
    /// errors, returns to [`FormState::Init`], and notifies once.
    ///
    /// Values written after construction are discarded. No validation pass
    /// runs: `is_valid` is forced to `false` and stays there until the next
    /// [`validate`](Self::validate), so a reset form never reads as valid.
    pub fn reset(&mut self) {
        let config = Arc::clone(&self.initial_config);
        for field in &mut self.fields {
            let default = config.get(field.name()).and_then(|c| c.default_value.clone());
            field.restore(default);
        }
        self.is_valid = false;
        self.state = FormState::Init;
        tracing::debug!(form = %self.name, "form reset");
        self.notify();
    }

    /// Returns the configuration the form was created from.
    pub fn initial_config(&self) -> &FormConfig {
        &self.initial_config
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Validates and, if valid, hands the values to the submit handler.
    ///
    /// A submit that passes validation cancels the token of the previous
    /// submission (if any) and creates a fresh one for this attempt. The
    /// handler runs synchronously; any state it returns is recorded.
    /// Returns the validation result.
    pub fn handle_submit(&mut self) -> bool {
        let span = form_span(&self.name);
        let _guard = span.enter();

        let is_valid = self.validate();
        if !is_valid {
            tracing::debug!("submit rejected: form invalid");
            return false;
        }

        if let Some(previous) = self.in_flight.take() {
            tracing::debug!("cancelling superseded submission");
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        if let Some(handler) = self.on_submit.clone() {
            let submission = Submission {
                data: self.get_form_data(),
                cancel: token,
            };
            if let Some(state) = handler(submission) {
                self.set_state(state);
            }
        }
        true
    }

    /// Cancels the in-flight submission, if any. Returns `true` if one was
    /// cancelled.
    pub fn abort(&mut self) -> bool {
        match self.in_flight.take() {
            Some(token) => {
                tracing::debug!(form = %self.name, "submission aborted");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Returns the cancellation token of the latest submission.
    pub const fn submission_token(&self) -> Option<&CancellationToken> {
        self.in_flight.as_ref()
    }

    /// Records the submission state and notifies.
    pub fn set_state(&mut self, state: FormState) {
        self.state = state;
        self.notify();
    }

    /// Returns the submission state.
    pub const fn state(&self) -> FormState {
        self.state
    }

    /// Returns `true` while a submission is in flight.
    pub fn is_sending(&self) -> bool {
        self.state == FormState::Sending
    }

    /// Returns `true` once a submission has finished, successfully or not.
    pub const fn is_sent(&self) -> bool {
        self.state.is_finished()
    }

    /// Returns `true` if the last submission succeeded.
    pub fn is_success(&self) -> bool {
        self.state == FormState::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::validators::{max_length, min_length, not_empty};
    use formstate_core::ValueType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn make_test_form() -> Form {
        Form::new(
            FormConfig::new("test")
                .field(
                    "username",
                    FieldConfig::new()
                        .validator(not_empty())
                        .validator(min_length(3))
                        .validator(max_length(20)),
                )
                .field("age", FieldConfig::with_default(30))
                .field("tags", FieldConfig::new().value_type(ValueType::Array)),
        )
        .unwrap()
    }

    fn count_refreshes(form: &Form) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        form.on_refresh("counter", move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let form = make_test_form();
        let names: Vec<&str> = form.fields().iter().map(FormField::name).collect();
        assert_eq!(names, ["username", "age", "tags"]);
        assert!(form.field("missing").is_none());
    }

    #[test]
    fn test_new_rejects_bad_field() {
        let result = Form::new(
            FormConfig::new("bad").field("n", FieldConfig::with_default(1).value_type(ValueType::String)),
        );
        assert!(matches!(result, Err(FormError::TypeMismatch { .. })));
    }

    #[test]
    fn test_initially_not_valid() {
        let form = make_test_form();
        assert!(!form.is_valid());
        assert_eq!(form.state(), FormState::Init);
    }

    #[test]
    fn test_validate_is_conjunction() {
        let mut form = make_test_form();
        let count = count_refreshes(&form);

        assert!(!form.validate());
        assert!(!form.is_valid());
        assert!(form.field("username").unwrap().error());

        form.field_mut("username").unwrap().set_value("alice");
        assert!(form.validate());
        assert!(form.is_valid());
        assert!(!form.field("username").unwrap().error());

        // validate, set_value, validate
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_validate_runs_every_field() {
        let mut form = Form::new(
            FormConfig::new("two")
                .field("a", FieldConfig::new().validator(not_empty()))
                .field("b", FieldConfig::new().validator(not_empty())),
        )
        .unwrap();
        assert!(!form.validate());
        assert!(form.field("a").unwrap().error());
        assert!(form.field("b").unwrap().error());
    }

    #[test]
    fn test_get_form_data_uses_fallbacks() {
        let form = make_test_form();
        let data = form.get_form_data();
        assert_eq!(data.len(), 3);
        assert_eq!(data["username"], Value::from(""));
        assert_eq!(data["age"], Value::from(30));
        assert_eq!(data["tags"], Value::List(vec![]));
    }

    #[test]
    fn test_set_form_data_notifies_once() {
        let mut form = Form::new(
            FormConfig::new("ab")
                .field("a", FieldConfig::with_default(0))
                .field("b", FieldConfig::with_default(0)),
        )
        .unwrap();
        let count = count_refreshes(&form);

        form.set_form_data([("a", 1), ("b", 2)]).unwrap();
        assert_eq!(form.field("a").unwrap().value().as_f64(), Some(1.0));
        assert_eq!(form.field("b").unwrap().value().as_f64(), Some(2.0));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(form.is_valid());
    }

    #[test]
    fn test_set_form_data_validates_live_fields_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let r = runs.clone();
        let mut form = Form::new(
            FormConfig::new("live").field(
                "a",
                FieldConfig::new()
                    .validator(min_length(5).deferred_error_text(move || {
                        r.fetch_add(1, Ordering::SeqCst);
                        "Too short".to_string()
                    }))
                    .validate_on_change(true),
            ),
        )
        .unwrap();

        form.set_form_data([("a", "ab")]).unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(form.field("a").unwrap().error_text(), Some("Too short"));
        assert!(!form.is_valid());
    }

    #[test]
    fn test_set_form_data_unknown_fields() {
        let mut form = make_test_form();
        let err = form
            .set_form_data([("zeta", Value::from(1)), ("username", Value::from("bob")), ("alpha", Value::from(2))])
            .unwrap_err();
        assert_eq!(err, FormError::UnknownFields(vec!["alpha".into(), "zeta".into()]));
        assert_eq!(form.field("username").unwrap().value().as_str(), Some("bob"));
    }

    #[test]
    fn test_set_field_value() {
        let mut form = make_test_form();
        form.set_field_value("age", 31).unwrap();
        assert_eq!(form.field("age").unwrap().value().as_f64(), Some(31.0));
        assert_eq!(
            form.set_field_value("nope", 1),
            Err(FormError::UnknownField("nope".into()))
        );
    }

    #[test]
    fn test_form_data_covers_fields_in_declaration_order() {
        let form = make_test_form();
        let data = form.get_form_data();
        let names: Vec<&str> = form.fields().iter().map(FormField::name).collect();
        assert_eq!(names, ["username", "age", "tags"]);
        assert_eq!(data.len(), names.len());
        assert!(names.iter().all(|name| data.contains_key(*name)));
    }

    #[test]
    fn test_reset_restores_construction_defaults() {
        let mut form = make_test_form();
        form.set_form_data([
            ("username", Value::from("x")),
            ("age", Value::from(99)),
            ("tags", Value::from(vec!["t"])),
        ])
        .unwrap();
        form.set_state(FormState::Fail);
        assert!(form.field("username").unwrap().error());

        let count = count_refreshes(&form);
        form.reset();

        assert_eq!(form.field("username").unwrap().value().as_str(), Some(""));
        assert_eq!(form.field("age").unwrap().value().as_f64(), Some(30.0));
        assert_eq!(*form.field("tags").unwrap().value(), Value::List(vec![]));
        assert!(!form.field("username").unwrap().error());
        assert_eq!(form.state(), FormState::Init);
        assert!(!form.is_valid());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_submit_invalid_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let mut form = make_test_form().with_on_submit(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            None
        });

        assert!(!form.handle_submit());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(form.submission_token().is_none());
    }

    #[test]
    fn test_submit_valid_passes_data() {
        let received = Arc::new(Mutex::new(None));
        let r = received.clone();
        let mut form = make_test_form().with_on_submit(move |submission| {
            *r.lock().unwrap() = Some(submission.data);
            Some(FormState::Sending)
        });
        form.field_mut("username").unwrap().set_value("alice");

        assert!(form.handle_submit());
        let data = received.lock().unwrap().take().unwrap();
        assert_eq!(data["username"], Value::from("alice"));
        assert_eq!(data["age"], Value::from(30));
        assert!(form.is_sending());
    }

    #[test]
    fn test_resubmit_cancels_previous_token() {
        let tokens = Arc::new(Mutex::new(Vec::new()));
        let t = tokens.clone();
        let mut form = make_test_form().with_on_submit(move |submission| {
            t.lock().unwrap().push(submission.cancel);
            None
        });
        form.field_mut("username").unwrap().set_value("alice");

        assert!(form.handle_submit());
        assert!(form.handle_submit());

        let tokens = tokens.lock().unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_cancelled());
        assert!(!tokens[1].is_cancelled());
    }

    #[test]
    fn test_abort() {
        let mut form = make_test_form();
        assert!(!form.abort());
        form.field_mut("username").unwrap().set_value("alice");
        form.handle_submit();
        let token = form.submission_token().unwrap().clone();
        assert!(form.abort());
        assert!(token.is_cancelled());
        assert!(form.submission_token().is_none());
    }

    #[test]
    fn test_set_on_submit_replaces_handler() {
        let which = Arc::new(Mutex::new(Vec::new()));
        let w1 = which.clone();
        let w2 = which.clone();
        let mut form = make_test_form().with_on_submit(move |_| {
            w1.lock().unwrap().push(1);
            None
        });
        form.field_mut("username").unwrap().set_value("alice");
        form.handle_submit();
        form.set_on_submit(Arc::new(move |_: Submission| -> Option<FormState> {
            w2.lock().unwrap().push(2);
            None
        }));
        form.handle_submit();
        form.clear_on_submit();
        form.handle_submit();
        assert_eq!(*which.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_state_helpers() {
        let mut form = make_test_form();
        assert!(!form.is_sending() && !form.is_sent() && !form.is_success());
        form.set_state(FormState::Sending);
        assert!(form.is_sending() && !form.is_sent());
        form.set_state(FormState::Success);
        assert!(form.is_sent() && form.is_success());
        form.set_state(FormState::Fail);
        assert!(form.is_sent() && !form.is_success());
    }
}

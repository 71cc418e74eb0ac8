//! Validation error messages.
//!
//! [`ErrorText`] is either a fixed message or a producer that is evaluated
//! each time a rule fails. The deferred form lets callers plug in localized
//! text that follows whatever language is active at validation time.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

/// A function producing an error message on demand.
pub type TextProducer = Arc<dyn Fn() -> String + Send + Sync>;

/// The error message attached to a validator.
///
/// # Examples
///
/// ```
/// use formstate_core::ErrorText;
///
/// let fixed = ErrorText::from("Required");
/// assert_eq!(fixed.resolve(), "Required");
///
/// let deferred = ErrorText::deferred(|| format!("Required ({})", "en"));
/// assert_eq!(deferred.resolve(), "Required (en)");
/// ```
#[derive(Clone)]
pub enum ErrorText {
    /// A fixed message.
    Static(String),
    /// A message computed every time it is resolved.
    Deferred(TextProducer),
}

impl ErrorText {
    /// Creates a deferred message from a producer.
    pub fn deferred(producer: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Deferred(Arc::new(producer))
    }

    /// Evaluates the message.
    pub fn resolve(&self) -> String {
        match self {
            Self::Static(text) => text.clone(),
            Self::Deferred(producer) => producer(),
        }
    }
}

impl fmt::Debug for ErrorText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Deferred(_) => f.debug_tuple("Deferred").field(&"<fn>").finish(),
        }
    }
}

impl fmt::Display for ErrorText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

impl From<&str> for ErrorText {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

impl From<String> for ErrorText {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

// Only the static form has a serialized representation.
impl<'de> Deserialize<'de> for ErrorText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Static)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_static_resolve() {
        let text = ErrorText::from("Too short".to_string());
        assert_eq!(text.resolve(), "Too short");
        assert_eq!(text.to_string(), "Too short");
    }

    #[test]
    fn test_deferred_evaluated_on_each_resolve() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let text = ErrorText::deferred(move || {
            let n = calls_clone.fetch_add(1, Ordering::SeqCst);
            format!("call {n}")
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(text.resolve(), "call 0");
        assert_eq!(text.resolve(), "call 1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_hides_producer() {
        let text = ErrorText::deferred(|| "x".to_string());
        assert_eq!(format!("{text:?}"), r#"Deferred("<fn>")"#);
        let text = ErrorText::from("y");
        assert_eq!(format!("{text:?}"), r#"Static("y")"#);
    }

    #[test]
    fn test_deserialize_static() {
        let text: ErrorText = serde_json::from_str(r#""Enter a value""#).unwrap();
        assert_eq!(text.resolve(), "Enter a value");
    }
}

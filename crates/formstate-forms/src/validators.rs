//! Validation rules for form fields.
//!
//! Rules are declared as unbound [`ValidatorSpec`]s, built by the factory
//! functions in this module ([`not_empty`], [`min_length`], [`email`], ...).
//! A field instantiates one [`Validator`] per spec when it is constructed or
//! when its rules are replaced, so callers never bind a rule to a field by
//! hand.
//!
//! The set of rules is closed: [`Rule`] is a tagged union with one variant per
//! supported check.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use formstate_core::{ErrorText, FormError, FormResult, Value};

const DEFAULT_REGEXP: &str = r"[0-9]+";

const DEFAULT_EMAIL_REGEXP: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

const DEFAULT_DOMAIN_REGEXP: &str = r"([a-zа-яё0-9_.-]+)\.([a-zа-яё0-9-]+)";

static REGEXP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(DEFAULT_REGEXP).expect("valid regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_EMAIL_REGEXP).expect("valid regex"));
static DOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_DOMAIN_REGEXP).expect("valid regex"));

/// Identifies which rule a [`ValidatorSpec`] instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Always valid.
    Any,
    /// Fails on `""`, `0`, `false`, and empty lists.
    NotEmpty,
    /// Fails when the value is shorter than `min_length`.
    MinLength,
    /// Fails when the value is longer than `max_length`.
    MaxLength,
    /// Fails when the stringified value does not match a pattern.
    Regexp,
    /// Fails when the stringified value is not an email address.
    Email,
    /// Fails when the stringified value does not contain a domain name.
    Domain,
}

/// Parameters shared by all rules. Each rule reads only the ones it needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidatorParams {
    /// Message reported when the rule fails. A built-in message is used if absent.
    pub error_text: Option<ErrorText>,
    /// Lower bound for [`RuleKind::MinLength`].
    pub min_length: Option<usize>,
    /// Upper bound for [`RuleKind::MaxLength`].
    pub max_length: Option<usize>,
    /// Pattern overriding the default of the regexp, email, and domain rules.
    pub regexp: Option<String>,
}

/// An unbound validator declaration: a rule kind plus its parameters.
///
/// `ValidatorSpec` is cheap to clone and can be shared between fields and
/// forms. It deserializes from `{ "rule": "min_length", "min_length": 3 }`.
///
/// # Examples
///
/// ```
/// use formstate_forms::validators::{min_length, RuleKind};
///
/// let spec = min_length(3).error_text("Too short");
/// assert_eq!(spec.kind, RuleKind::MinLength);
/// assert_eq!(spec.params.min_length, Some(3));
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorSpec {
    /// The rule to instantiate.
    #[serde(rename = "rule")]
    pub kind: RuleKind,
    /// The rule's parameters.
    #[serde(flatten)]
    pub params: ValidatorParams,
}

impl ValidatorSpec {
    /// Creates a spec from a rule kind and parameters.
    pub const fn new(kind: RuleKind, params: ValidatorParams) -> Self {
        Self { kind, params }
    }

    /// Sets the message reported when the rule fails.
    #[must_use]
    pub fn error_text(mut self, text: impl Into<ErrorText>) -> Self {
        self.params.error_text = Some(text.into());
        self
    }

    /// Sets a message produced on demand each time the rule fails.
    #[must_use]
    pub fn deferred_error_text(mut self, producer: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.params.error_text = Some(ErrorText::deferred(producer));
        self
    }

    /// Overrides the default pattern of a regexp, email, or domain rule.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.params.regexp = Some(pattern.into());
        self
    }
}

// ── Factories ──────────────────────────────────────────────────────────

/// The base rule: always valid.
pub fn any() -> ValidatorSpec {
    ValidatorSpec::new(RuleKind::Any, ValidatorParams::default())
}

/// Requires a truthy scalar or a non-empty list.
pub fn not_empty() -> ValidatorSpec {
    ValidatorSpec::new(RuleKind::NotEmpty, ValidatorParams::default())
}

/// Requires `length >= min`.
pub fn min_length(min: usize) -> ValidatorSpec {
    ValidatorSpec::new(
        RuleKind::MinLength,
        ValidatorParams {
            min_length: Some(min),
            ..ValidatorParams::default()
        },
    )
}

/// Requires `length <= max`.
pub fn max_length(max: usize) -> ValidatorSpec {
    ValidatorSpec::new(
        RuleKind::MaxLength,
        ValidatorParams {
            max_length: Some(max),
            ..ValidatorParams::default()
        },
    )
}

/// Requires the stringified value to match `pattern` (unanchored).
pub fn regexp(pattern: impl Into<String>) -> ValidatorSpec {
    ValidatorSpec::new(RuleKind::Regexp, ValidatorParams::default()).pattern(pattern)
}

/// Requires the stringified value to be an email address.
pub fn email() -> ValidatorSpec {
    ValidatorSpec::new(RuleKind::Email, ValidatorParams::default())
}

/// Requires the stringified value to contain a domain name.
pub fn domain() -> ValidatorSpec {
    ValidatorSpec::new(RuleKind::Domain, ValidatorParams::default())
}

// ── Rules ──────────────────────────────────────────────────────────────

/// A compiled rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Always valid.
    Any,
    /// Truthy scalar or non-empty list.
    NotEmpty,
    /// `length >= n`.
    MinLength(usize),
    /// `length <= n`.
    MaxLength(usize),
    /// Generic pattern match.
    Regexp(Regex),
    /// Email pattern match.
    Email(Regex),
    /// Domain pattern match.
    Domain(Regex),
}

impl Rule {
    /// Compiles the rule described by `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidPattern`] if a caller-supplied pattern
    /// does not compile.
    pub fn from_spec(spec: &ValidatorSpec) -> FormResult<Self> {
        let params = &spec.params;
        Ok(match spec.kind {
            RuleKind::Any => Self::Any,
            RuleKind::NotEmpty => Self::NotEmpty,
            RuleKind::MinLength => Self::MinLength(params.min_length.unwrap_or(0)),
            RuleKind::MaxLength => Self::MaxLength(params.max_length.unwrap_or(0)),
            RuleKind::Regexp => Self::Regexp(compile(params.regexp.as_deref(), &REGEXP_RE)?),
            RuleKind::Email => Self::Email(compile(params.regexp.as_deref(), &EMAIL_RE)?),
            RuleKind::Domain => Self::Domain(compile(params.regexp.as_deref(), &DOMAIN_RE)?),
        })
    }

    /// Returns the kind of this rule.
    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::Any => RuleKind::Any,
            Self::NotEmpty => RuleKind::NotEmpty,
            Self::MinLength(_) => RuleKind::MinLength,
            Self::MaxLength(_) => RuleKind::MaxLength,
            Self::Regexp(_) => RuleKind::Regexp,
            Self::Email(_) => RuleKind::Email,
            Self::Domain(_) => RuleKind::Domain,
        }
    }

    /// Checks `value` against the rule.
    ///
    /// Length rules fail on values that have no length (booleans, numbers).
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::NotEmpty => match value {
                Value::List(items) => !items.is_empty(),
                other => other.is_truthy(),
            },
            Self::MinLength(min) => value.length().is_some_and(|len| len >= *min),
            Self::MaxLength(max) => value.length().is_some_and(|len| len <= *max),
            Self::Regexp(re) | Self::Email(re) | Self::Domain(re) => {
                re.is_match(&value.coerce_string())
            }
        }
    }

    fn default_message(&self, value: &Value) -> String {
        let unit = if matches!(value, Value::List(_)) {
            "items"
        } else {
            "characters"
        };
        match (self, value.length()) {
            (Self::Any, _) => String::new(),
            (Self::NotEmpty, _) => "This field is required.".to_string(),
            (Self::MinLength(min), Some(len)) => {
                format!("Ensure this value has at least {min} {unit} (it has {len}).")
            }
            (Self::MinLength(min), None) => format!("Ensure this value has at least {min} {unit}."),
            (Self::MaxLength(max), Some(len)) => {
                format!("Ensure this value has at most {max} {unit} (it has {len}).")
            }
            (Self::MaxLength(max), None) => format!("Ensure this value has at most {max} {unit}."),
            (Self::Regexp(_), _) => "Enter a valid value.".to_string(),
            (Self::Email(_), _) => "Enter a valid email address.".to_string(),
            (Self::Domain(_), _) => "Enter a valid domain name.".to_string(),
        }
    }
}

fn compile(pattern: Option<&str>, default: &Lazy<Regex>) -> FormResult<Regex> {
    match pattern {
        Some(p) => Regex::new(p).map_err(|e| FormError::InvalidPattern {
            pattern: p.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(Regex::clone(default)),
    }
}

// ── Bound validators ───────────────────────────────────────────────────

/// The outcome of checking one value against one validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidResult {
    /// Whether the value passed.
    pub valid: bool,
    /// The message to show when it did not.
    pub error_text: Option<String>,
}

impl ValidResult {
    /// A passing result.
    pub const VALID: Self = Self {
        valid: true,
        error_text: None,
    };

    /// A failing result with the given message.
    pub const fn invalid(error_text: String) -> Self {
        Self {
            valid: false,
            error_text: Some(error_text),
        }
    }
}

/// A rule bound to one field.
///
/// The binding is by field name only; a validator never holds a reference to
/// its field, and the field passes its current value in on every check.
#[derive(Clone)]
pub struct Validator {
    field: String,
    rule: Rule,
    error_text: Option<ErrorText>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("field", &self.field)
            .field("rule", &self.rule.kind())
            .field("error_text", &self.error_text)
            .finish()
    }
}

impl Validator {
    /// Instantiates `spec` for the field named `field`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidPattern`] if the [`ValidatorSpec`] carries a pattern
    /// that does not compile.
    pub fn bind(field: impl Into<String>, spec: &ValidatorSpec) -> FormResult<Self> {
        Ok(Self {
            field: field.into(),
            rule: Rule::from_spec(spec)?,
            error_text: spec.params.error_text.clone(),
        })
    }

    /// Returns the name of the field this validator belongs to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the compiled rule.
    pub const fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Checks `value`, resolving the error message only on failure.
    pub fn validate(&self, value: &Value) -> ValidResult {
        if self.rule.check(value) {
            return ValidResult::VALID;
        }
        let text = self
            .error_text
            .as_ref()
            .map_or_else(|| self.rule.default_message(value), ErrorText::resolve);
        ValidResult::invalid(text)
    }
}

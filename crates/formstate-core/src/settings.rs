//! Library settings.
//!
//! [`Settings`] holds the few knobs the formstate crates read at startup,
//! mostly for [`setup_logging`](crate::logging::setup_logging). Settings can
//! be built in code or loaded from a TOML document; keys missing from the
//! document keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{FormError, FormResult};

/// Settings for the formstate crates.
///
/// # Examples
///
/// ```
/// use formstate_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether debug mode is enabled. Selects human-readable log output.
    pub debug: bool,
    /// The log filter directive (e.g. "info", "formstate_forms=debug").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Configuration`] if the TOML is malformed or a key
    /// has the wrong type.
    pub fn from_toml_str(toml_str: &str) -> FormResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| FormError::Configuration(format!("Failed to parse settings TOML: {e}")))
    }

    /// Applies environment variable overrides.
    ///
    /// - `FORMSTATE_DEBUG` -> `debug` ("true"/"1"/"yes" => true, anything else => false)
    /// - `FORMSTATE_LOG_LEVEL` -> `log_level`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("FORMSTATE_DEBUG") {
            self.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
        }

        if let Ok(val) = std::env::var("FORMSTATE_LOG_LEVEL") {
            self.log_level = val;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
    }

    #[test]
    fn test_from_toml_str_basic() {
        let s = Settings::from_toml_str(
            r#"
            debug = false
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert!(!s.debug);
        assert_eq!(s.log_level, "debug");
    }

    #[test]
    fn test_from_toml_str_partial_keeps_defaults() {
        let s = Settings::from_toml_str("debug = false").unwrap();
        assert!(!s.debug);
        assert_eq!(s.log_level, "info");
    }

    #[test]
    fn test_from_toml_str_empty() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = Settings::from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(FormError::Configuration(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = Settings::from_toml_str("debug = \"sometimes\"");
        assert!(result.is_err());
    }
}

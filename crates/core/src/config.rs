//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the forms layer. The
//! parsing helpers take the raw environment value as an `Option<String>` so binaries own the
//! environment lookup and tests never have to mutate process-wide state.

use crate::constants::{
    DEFAULT_MINIMUM_PASSWORD_STRENGTH, DEFAULT_REST_ADDR, DEFAULT_SITE_NAME,
};
use crate::{RegistryError, RegistryResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    minimum_password_strength: f64,
    site_name: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidConfig`] if the strength is outside `0.0..=1.0` or the
    /// site name is blank.
    pub fn new(minimum_password_strength: f64, site_name: String) -> RegistryResult<Self> {
        if !(0.0..=1.0).contains(&minimum_password_strength) {
            return Err(RegistryError::InvalidConfig(format!(
                "minimum_password_strength must be between 0 and 1, got {minimum_password_strength}"
            )));
        }

        if site_name.trim().is_empty() {
            return Err(RegistryError::InvalidConfig(
                "site_name cannot be empty".into(),
            ));
        }

        Ok(Self {
            minimum_password_strength,
            site_name,
        })
    }

    pub fn minimum_password_strength(&self) -> f64 {
        self.minimum_password_strength
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            minimum_password_strength: DEFAULT_MINIMUM_PASSWORD_STRENGTH,
            site_name: DEFAULT_SITE_NAME.into(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the minimum password strength from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default of 0.3.
pub fn minimum_password_strength_from_env_value(value: Option<String>) -> RegistryResult<f64> {
    match non_blank(value) {
        None => Ok(DEFAULT_MINIMUM_PASSWORD_STRENGTH),
        Some(v) => v.parse::<f64>().map_err(|_| {
            RegistryError::InvalidConfig(format!(
                "MINIMUM_PASSWORD_STRENGTH is not a number: {v}"
            ))
        }),
    }
}

pub fn site_name_from_env_value(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| DEFAULT_SITE_NAME.into())
}

pub fn rest_addr_from_env_value(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| DEFAULT_REST_ADDR.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_defaults_when_missing_or_blank() {
        assert_eq!(
            minimum_password_strength_from_env_value(None).expect("default"),
            DEFAULT_MINIMUM_PASSWORD_STRENGTH
        );
        assert_eq!(
            minimum_password_strength_from_env_value(Some("  ".into())).expect("default"),
            DEFAULT_MINIMUM_PASSWORD_STRENGTH
        );
    }

    #[test]
    fn strength_parses_and_rejects_garbage() {
        assert_eq!(
            minimum_password_strength_from_env_value(Some(" 0.5 ".into())).expect("parse"),
            0.5
        );
        let err = minimum_password_strength_from_env_value(Some("strong".into()))
            .expect_err("should reject non-number");
        assert!(matches!(err, RegistryError::InvalidConfig(msg) if msg.contains("not a number")));
    }

    #[test]
    fn config_rejects_out_of_range_strength() {
        let err = CoreConfig::new(1.5, "site".into()).expect_err("should reject 1.5");
        assert!(matches!(err, RegistryError::InvalidConfig(msg) if msg.contains("between 0 and 1")));
    }

    #[test]
    fn config_rejects_blank_site_name() {
        let err = CoreConfig::new(0.3, " ".into()).expect_err("should reject blank");
        assert!(matches!(err, RegistryError::InvalidConfig(msg) if msg.contains("site_name")));
    }

    #[test]
    fn addr_and_site_fall_back_to_defaults() {
        assert_eq!(rest_addr_from_env_value(None), DEFAULT_REST_ADDR);
        assert_eq!(rest_addr_from_env_value(Some("127.0.0.1:8080".into())), "127.0.0.1:8080");
        assert_eq!(site_name_from_env_value(Some("".into())), DEFAULT_SITE_NAME);
    }
}

//! Configuration validation
//!
//! Every stage config implements [`Validatable`]; [`AnnotatorConfig::build`]
//! runs them all before handing out a [`ValidatedConfig`].
//!
//! [`AnnotatorConfig::build`]: super::AnnotatorConfig::build
//! [`ValidatedConfig`]: super::ValidatedConfig

use super::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration objects
pub trait Validatable {
    /// Validate the configuration
    ///
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;
}

/// Check `value` lies in `min..=max`
pub(crate) fn check_range(
    field: &str,
    value: usize,
    min: usize,
    max: usize,
    hint: &str,
) -> ConfigResult<()> {
    if value < min || value > max {
        return Err(ConfigError::range_with_hint(field, value, min, max, hint));
    }
    Ok(())
}

/// Check a string field is not blank
pub(crate) fn check_non_empty(field: &str, value: &str, hint: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::empty(field, hint));
    }
    Ok(())
}

//! Error types for the accretion engine.
//!
//! Only configuration can fail. Numeric trouble inside a tick is absorbed
//! locally (distance floors, slot resets) and surfaces through
//! [`Statistics`](crate::Statistics) instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("option `{option}` = {value} is out of range (expected {expected})")]
    OutOfRange {
        option: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("option `{option}` must be a finite number")]
    NotFinite { option: &'static str },

    #[error("unrecognized option `{0}`")]
    UnknownOption(String),

    #[error("configuration must be a JSON object")]
    NotAnObject,

    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid engine settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// `InvalidSettings("<name> must be <requirement>")` unless `ok`.
pub(crate) fn ensure_setting(ok: bool, name: &str, requirement: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidSettings(format!("{} must be {}", name, requirement)))
    }
}

pub(crate) fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub(crate) fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

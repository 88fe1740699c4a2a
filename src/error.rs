//! Configuration errors
//!
//! The simulation itself is infallible (it clamps rather than fails); the only
//! fallible surface is loading and validating host settings.

use std::fmt;

/// Errors raised while loading [`crate::Settings`]
#[derive(Debug)]
pub enum ConfigError {
    /// The settings file could not be read
    Io(std::io::Error),
    /// The settings file is not valid JSON for [`crate::Settings`]
    Parse(serde_json::Error),
    /// A value is outside its accepted range
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable description of the accepted range
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read settings: {}", e),
            ConfigError::Parse(e) => write!(f, "malformed settings: {}", e),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid setting `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

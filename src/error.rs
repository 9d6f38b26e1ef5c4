//! Error types for the avalanche forecast core

use thiserror::Error;

/// Main error type for the forecast extraction library
///
/// Extraction itself degrades to defaults instead of failing; the only
/// hard failure on the extraction path is an unknown zone identifier.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Zone identifier outside the fixed zone table
    #[error("Invalid zone: {zone}")]
    InvalidZone { zone: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ForecastError {
    /// Create a new invalid zone error
    pub fn invalid_zone<S: Into<String>>(zone: S) -> Self {
        Self::InvalidZone { zone: zone.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::InvalidZone { zone } => {
                format!("Unknown forecast zone '{zone}'. Expected northwest or southeast.")
            }
            ForecastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let zone_err = ForecastError::invalid_zone("aspen");
        assert!(matches!(zone_err, ForecastError::InvalidZone { .. }));
        assert_eq!(zone_err.to_string(), "Invalid zone: aspen");

        let config_err = ForecastError::config("bad level");
        assert!(matches!(config_err, ForecastError::Config { .. }));
    }

    #[test]
    fn test_user_messages() {
        let zone_err = ForecastError::invalid_zone("aspen");
        assert!(zone_err.user_message().contains("aspen"));

        let config_err = ForecastError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));
    }
}

//! Configuration management for the avyforecast tool
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ForecastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Trend analysis tuning
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Output formatting
    #[serde(default)]
    pub output: OutputConfig,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Parameters of the aggregate observation trend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Ratio one half must exceed the other by to call a direction
    #[serde(default = "default_observation_ratio")]
    pub observation_ratio: f64,
    /// Minimum number of daily data points
    #[serde(default = "default_min_observation_points")]
    pub min_observation_points: usize,
}

/// Output settings for the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_observation_ratio() -> f64 {
    1.5
}

fn default_min_observation_points() -> usize {
    3
}

fn default_pretty_json() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            observation_ratio: default_observation_ratio(),
            min_observation_points: default_min_observation_points(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: default_pretty_json(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            analysis: AnalysisConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // AVYFORECAST_LOGGING__LEVEL=debug
        builder = builder.add_source(
            Environment::with_prefix("AVYFORECAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("avyforecast").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.analysis.min_observation_points == 0 {
            self.analysis.min_observation_points = default_min_observation_points();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        let ratio = self.analysis.observation_ratio;
        if !(ratio > 1.0 && ratio <= 10.0) {
            return Err(ForecastError::config(format!(
                "Observation ratio must be greater than 1.0 and at most 10.0, got {ratio}"
            ))
            .into());
        }

        if !(2..=30).contains(&self.analysis.min_observation_points) {
            return Err(ForecastError::config(
                "Minimum observation points must be between 2 and 30",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.analysis.observation_ratio, 1.5);
        assert_eq!(config.analysis.min_observation_points, 3);
        assert!(config.output.pretty_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_error_is_config_error() {
        let mut config = AppConfig::default();
        config.analysis.min_observation_points = 1;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ForecastError>(),
            Some(ForecastError::Config { .. })
        ));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_invalid_format() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_config_validation_ratio_range() {
        let mut config = AppConfig::default();
        config.analysis.observation_ratio = 1.0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Observation ratio"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = AppConfig::default();
        config.logging.level.clear();
        config.analysis.min_observation_points = 0;
        config.apply_defaults();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.analysis.min_observation_points, 3);
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "avyforecast-config-test-{}.toml",
            std::process::id()
        ));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "[logging]\nlevel = \"debug\"\n\n[analysis]\nobservation_ratio = 2.0").unwrap();
        }

        let config = AppConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.analysis.observation_ratio, 2.0);
        assert_eq!(config.analysis.min_observation_points, 3);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AppConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("avyforecast"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}

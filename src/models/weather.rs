//! Mountain weather summary attached to a forecast

use serde::{Deserialize, Serialize};

/// Inclusive numeric range parsed from forecast text, e.g. "10 to 20 F"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lower bound
    pub low: i32,
    /// Upper bound
    pub high: i32,
}

impl ValueRange {
    #[must_use]
    pub fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }
}

/// Today's values from a structured weather product table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    /// Temperature as printed in the table
    pub temperature: Option<String>,
    /// Cloud cover description
    pub cloud_cover: Option<String>,
    /// Ridgeline wind speed, usually a range in mph
    pub wind_speed: Option<String>,
    /// Compass direction of the wind
    pub wind_direction: Option<String>,
    /// Lower bound of the 12 hour snowfall, "0" for trace amounts
    pub snowfall_12hr: Option<String>,
    /// Lower bound of the 24 hour snowfall, "0" for trace amounts
    pub snowfall_24hr: Option<String>,
}

impl WeatherConditions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Weather section of a forecast
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// Leading part of the weather text (at most 500 characters)
    pub summary: String,
    /// Complete weather text
    pub full_text: String,
    /// Temperature range in degrees Fahrenheit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_f: Option<ValueRange>,
    /// Wind speed range in mph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_mph: Option<ValueRange>,
    /// Snowfall range in inches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowfall_in: Option<ValueRange>,
    /// Structured table values, when the source had a weather product
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<WeatherConditions>,
}

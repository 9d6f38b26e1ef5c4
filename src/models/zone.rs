//! Forecast zone table

use crate::ForecastError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the forecast center's fixed geographic regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Northwest,
    Southeast,
}

impl Zone {
    /// All zones in table order
    pub const ALL: [Zone; 2] = [Zone::Northwest, Zone::Southeast];

    /// Short identifier used by callers and storage
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Zone::Northwest => "northwest",
            Zone::Southeast => "southeast",
        }
    }

    /// Human-readable zone name
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Zone::Northwest => "Northwest Mountains",
            Zone::Southeast => "Southeast Mountains",
        }
    }

    /// Zone identifier used inside API payloads
    #[must_use]
    pub fn api_zone_id(self) -> &'static str {
        match self {
            Zone::Northwest => "northwest_mountains",
            Zone::Southeast => "southeast_mountains",
        }
    }
}

impl FromStr for Zone {
    type Err = ForecastError;

    /// Accepts `northwest`, `northwest_mountains` or `northwest-mountains`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Zone::ALL
            .into_iter()
            .find(|zone| normalized == zone.id() || normalized == zone.api_zone_id())
            .ok_or_else(|| ForecastError::invalid_zone(s))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("northwest", Zone::Northwest)]
    #[case("Southeast", Zone::Southeast)]
    #[case("northwest_mountains", Zone::Northwest)]
    #[case("southeast-mountains", Zone::Southeast)]
    #[case("  NORTHWEST  ", Zone::Northwest)]
    fn test_parse_zone(#[case] input: &str, #[case] expected: Zone) {
        assert_eq!(input.parse::<Zone>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_zone_is_rejected() {
        let err = "aspen".parse::<Zone>().unwrap_err();
        assert!(matches!(err, ForecastError::InvalidZone { zone } if zone == "aspen"));
    }

    #[test]
    fn test_zone_names() {
        assert_eq!(Zone::Northwest.display_name(), "Northwest Mountains");
        assert_eq!(Zone::Southeast.to_string(), "southeast");
        assert_eq!(serde_json::to_string(&Zone::Northwest).unwrap(), "\"northwest\"");
    }
}

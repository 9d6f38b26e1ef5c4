//! Trend classification results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Day-over-day direction of avalanche danger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Steady,
    Worsening,
    StormIncoming,
    InsufficientData,
}

impl Trend {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Steady => "steady",
            Trend::Worsening => "worsening",
            Trend::StormIncoming => "storm_incoming",
            Trend::InsufficientData => "insufficient_data",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which signal tier produced the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    StormKeywords,
    DangerChange,
    ProblemCountChange,
    Keywords,
    Default,
}

/// Output of the trend classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Classified direction
    pub trend: Trend,
    /// Tier that decided the direction
    pub signal: TrendSignal,
    /// Actionable sentence from the narrative, at most 300 characters
    pub key_message: Option<String>,
    /// Terrain recommendation from the narrative, at most 300 characters
    pub travel_advice: Option<String>,
}

/// Direction of an aggregate series of daily observation counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationTrend {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

impl fmt::Display for ObservationTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationTrend::Increasing => write!(f, "increasing"),
            ObservationTrend::Decreasing => write!(f, "decreasing"),
            ObservationTrend::Stable => write!(f, "stable"),
            ObservationTrend::InsufficientData => write!(f, "insufficient_data"),
        }
    }
}

//! Flat record handed to the storage collaborator

use super::{
    AvalancheProblem, Forecast, Trend, TrendResult, WeatherSummary, danger_label,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One upsert row keyed by (zone_id, valid_date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Zone identifier, part of the upsert key
    pub zone_id: String,
    /// Zone display name
    pub zone_name: String,
    /// Publication date
    pub issue_date: NaiveDate,
    /// Day the forecast applies to, part of the upsert key
    pub valid_date: NaiveDate,
    /// Highest danger of the three bands
    pub danger_level: u8,
    /// Scale name of `danger_level`
    pub danger_text: String,
    /// Above treeline danger
    pub danger_alpine: u8,
    /// Near treeline danger
    pub danger_treeline: u8,
    /// Below treeline danger
    pub danger_below_treeline: u8,
    /// Bottom line text
    pub bottom_line: String,
    /// Forecast discussion text
    pub discussion: String,
    /// Day-over-day trend
    pub trend: Trend,
    /// Actionable sentence from the narrative
    pub key_message: Option<String>,
    /// Terrain recommendation from the narrative
    pub travel_advice: Option<String>,
    /// Avalanche problems in published order
    pub problems: Vec<AvalancheProblem>,
    /// Mountain weather, when available
    pub weather: Option<WeatherSummary>,
}

impl ForecastRecord {
    #[must_use]
    pub fn new(forecast: &Forecast, trend: &TrendResult) -> Self {
        let danger_level = forecast.overall_danger();
        Self {
            zone_id: forecast.zone.id().to_string(),
            zone_name: forecast.zone_name.clone(),
            issue_date: forecast.issue_date,
            valid_date: forecast.valid_date,
            danger_level,
            danger_text: danger_label(danger_level).to_string(),
            danger_alpine: forecast.danger.alpine,
            danger_treeline: forecast.danger.treeline,
            danger_below_treeline: forecast.danger.below_treeline,
            bottom_line: forecast.bottom_line.clone(),
            discussion: forecast.discussion.clone(),
            trend: trend.trend,
            key_message: trend.key_message.clone(),
            travel_advice: trend.travel_advice.clone(),
            problems: forecast.problems.clone(),
            weather: forecast.weather.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DangerRatings, TrendSignal, Zone};

    #[test]
    fn test_record_flattens_forecast_and_trend() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let forecast = Forecast {
            zone: Zone::Southeast,
            zone_name: "Southeast Mountains".to_string(),
            source_id: Some(42),
            issue_date: date,
            valid_date: date,
            danger: DangerRatings::new(2, 3, 1),
            bottom_line: "Avoid wind-loaded slopes.".to_string(),
            discussion: String::new(),
            problems: Vec::new(),
            weather: None,
        };
        let trend = TrendResult {
            trend: Trend::Worsening,
            signal: TrendSignal::DangerChange,
            key_message: Some("Avoid wind-loaded slopes".to_string()),
            travel_advice: None,
        };

        let record = ForecastRecord::new(&forecast, &trend);
        assert_eq!(record.zone_id, "southeast");
        assert_eq!(record.danger_level, 3);
        assert_eq!(record.danger_text, "Considerable");
        assert_eq!(record.trend, Trend::Worsening);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["trend"], "worsening");
        assert_eq!(json["valid_date"], "2025-02-03");
    }
}

//! Normalized avalanche forecast model and history helpers

use super::{AvalancheProblem, WeatherSummary, Zone};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sentinel for a danger band that could not be determined
pub const DANGER_NOT_DETERMINED: u8 = 0;

/// Danger ratings per elevation band, each 1-5 or 0 when not determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DangerRatings {
    /// Above treeline
    pub alpine: u8,
    /// Near treeline
    pub treeline: u8,
    /// Below treeline
    pub below_treeline: u8,
}

impl DangerRatings {
    #[must_use]
    pub fn new(alpine: u8, treeline: u8, below_treeline: u8) -> Self {
        Self {
            alpine,
            treeline,
            below_treeline,
        }
    }

    /// All bands not determined
    #[must_use]
    pub fn undetermined() -> Self {
        Self::new(
            DANGER_NOT_DETERMINED,
            DANGER_NOT_DETERMINED,
            DANGER_NOT_DETERMINED,
        )
    }

    /// Overall danger: the highest of the three bands
    #[must_use]
    pub fn overall(&self) -> u8 {
        self.alpine.max(self.treeline).max(self.below_treeline)
    }
}

/// Name of a danger level on the North American scale
#[must_use]
pub fn danger_label(level: u8) -> &'static str {
    match level {
        1 => "Low",
        2 => "Moderate",
        3 => "Considerable",
        4 => "High",
        5 => "Extreme",
        _ => "Unknown",
    }
}

/// One zone's forecast for one day. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Zone the forecast covers
    pub zone: Zone,
    /// Display name of the zone
    pub zone_name: String,
    /// Product id when the forecast came from the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<u64>,
    /// Date the forecast was published
    pub issue_date: NaiveDate,
    /// Date the forecast applies to
    pub valid_date: NaiveDate,
    /// Danger rating per elevation band
    pub danger: DangerRatings,
    /// Short summary of the day's hazard, empty when not found
    pub bottom_line: String,
    /// Forecaster discussion, empty when not found
    pub discussion: String,
    /// Avalanche problems in the order they were published
    pub problems: Vec<AvalancheProblem>,
    /// Mountain weather, when the source carried any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSummary>,
}

impl Forecast {
    #[must_use]
    pub fn overall_danger(&self) -> u8 {
        self.danger.overall()
    }

    /// API drafts are published without alpine and treeline ratings
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.danger.alpine == DANGER_NOT_DETERMINED
            && self.danger.treeline == DANGER_NOT_DETERMINED
    }

    /// Bottom line and discussion joined, the text the trend classifier reads
    #[must_use]
    pub fn narrative(&self) -> String {
        format!("{} {}", self.bottom_line, self.discussion)
    }

    /// Copy of this forecast with a separately fetched weather summary
    #[must_use]
    pub fn with_weather(self, weather: Option<WeatherSummary>) -> Self {
        Self { weather, ..self }
    }
}

/// Drop drafts and keep the first forecast per valid date, up to `days`
/// entries. Input order is preserved, so pass newest first.
#[must_use]
pub fn select_daily_forecasts(forecasts: Vec<Forecast>, days: usize) -> Vec<Forecast> {
    let mut seen = HashSet::new();
    forecasts
        .into_iter()
        .filter(|f| !f.is_draft())
        .filter(|f| seen.insert((f.zone, f.valid_date)))
        .take(days)
        .collect()
}

/// The forecast for the same zone valid on the calendar day before `current`
#[must_use]
pub fn find_previous<'a>(history: &'a [Forecast], current: &Forecast) -> Option<&'a Forecast> {
    let previous_day = current.valid_date.pred_opt()?;
    history
        .iter()
        .find(|f| f.zone == current.zone && f.valid_date == previous_day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast(zone: Zone, date: &str, danger: DangerRatings) -> Forecast {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Forecast {
            zone,
            zone_name: zone.display_name().to_string(),
            source_id: None,
            issue_date: date,
            valid_date: date,
            danger,
            bottom_line: String::new(),
            discussion: String::new(),
            problems: Vec::new(),
            weather: None,
        }
    }

    #[test]
    fn test_overall_danger_is_max() {
        assert_eq!(DangerRatings::new(3, 2, 1).overall(), 3);
        assert_eq!(DangerRatings::new(1, 4, 2).overall(), 4);
        assert_eq!(DangerRatings::undetermined().overall(), 0);
    }

    #[test]
    fn test_danger_label() {
        assert_eq!(danger_label(1), "Low");
        assert_eq!(danger_label(3), "Considerable");
        assert_eq!(danger_label(5), "Extreme");
        assert_eq!(danger_label(0), "Unknown");
    }

    #[test]
    fn test_select_daily_forecasts() {
        let forecasts = vec![
            forecast(Zone::Southeast, "2025-01-10", DangerRatings::undetermined()),
            forecast(Zone::Southeast, "2025-01-10", DangerRatings::new(3, 3, 2)),
            forecast(Zone::Southeast, "2025-01-10", DangerRatings::new(2, 2, 1)),
            forecast(Zone::Southeast, "2025-01-09", DangerRatings::new(2, 2, 1)),
            forecast(Zone::Southeast, "2025-01-08", DangerRatings::new(2, 2, 1)),
        ];

        let selected = select_daily_forecasts(forecasts, 2);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].danger.alpine, 3);
        assert_eq!(selected[1].valid_date.to_string(), "2025-01-09");
    }

    #[test]
    fn test_find_previous() {
        let history = vec![
            forecast(Zone::Northwest, "2025-01-09", DangerRatings::new(2, 2, 1)),
            forecast(Zone::Southeast, "2025-01-08", DangerRatings::new(2, 2, 1)),
            forecast(Zone::Southeast, "2025-01-09", DangerRatings::new(3, 2, 1)),
        ];
        let current = forecast(Zone::Southeast, "2025-01-10", DangerRatings::new(2, 2, 1));

        let previous = find_previous(&history, &current).unwrap();
        assert_eq!(previous.zone, Zone::Southeast);
        assert_eq!(previous.danger.alpine, 3);

        let orphan = forecast(Zone::Southeast, "2025-02-01", DangerRatings::new(2, 2, 1));
        assert!(find_previous(&history, &orphan).is_none());
    }

    #[test]
    fn test_forecast_serde_uses_iso_dates() {
        let f = forecast(Zone::Northwest, "2025-01-10", DangerRatings::new(3, 2, 1));
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["valid_date"], "2025-01-10");
        assert_eq!(json["zone"], "northwest");
        let back: Forecast = serde_json::from_value(json).unwrap();
        assert_eq!(back, f);
    }
}

//! Forecast assembly from extracted fields

use super::ExtractedFields;
use crate::models::{DangerRatings, Forecast, Zone};
use chrono::NaiveDate;

/// Combine extractor output into a forecast. Bands without a rating take
/// `danger_defaults`; missing text fields become empty strings and a missing
/// date falls back to `captured_on`.
#[must_use]
pub fn assemble(
    zone: Zone,
    captured_on: NaiveDate,
    fields: ExtractedFields,
    danger_defaults: DangerRatings,
) -> Forecast {
    let date = fields.issue_date.unwrap_or(captured_on);
    Forecast {
        zone,
        zone_name: zone.display_name().to_string(),
        source_id: fields.source_id,
        issue_date: date,
        valid_date: date,
        danger: fields.danger.or(danger_defaults),
        bottom_line: fields.bottom_line.unwrap_or_default(),
        discussion: fields.discussion.unwrap_or_default(),
        problems: fields.problems,
        weather: fields.weather,
    }
}

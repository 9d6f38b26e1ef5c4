//! Fields of a decoded forecast API product
//!
//! The product is a loose JSON object. Each field, danger entry and problem
//! is read on its own, so a value of an unexpected type degrades only that
//! part to its default.

use super::danger::BandDangers;
use super::html::clean_html;
use super::weather::extract_weather_product;
use super::ExtractedFields;
use crate::models::{AspectElevationRose, AvalancheProblem, DestructiveSize, Likelihood, ProblemType};
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiDanger {
    valid_day: Option<String>,
    upper: Option<Value>,
    middle: Option<Value>,
    lower: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiProblem {
    name: Option<String>,
    likelihood: Option<String>,
    size: Option<Value>,
    location: Option<Value>,
    discussion: Option<String>,
    media: Option<Value>,
}

/// Decode one entry, logging and skipping it when its shape is unexpected
fn decode_entry<T: DeserializeOwned>(value: &Value, kind: &'static str) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(kind, error = %e, "Skipping payload entry with an unexpected shape");
            None
        }
    }
}

/// Decoded entries of the array at `key`; missing or non-array is empty
fn decode_list<T: DeserializeOwned>(payload: &Value, key: &'static str) -> Vec<T> {
    match payload.get(key) {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| decode_entry(entry, key))
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            warn!(key, value = %other, "Payload field is not a list, ignoring it");
            Vec::new()
        }
    }
}

/// String field at `key`
fn text_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

/// HTML-cleaned string field at `key`
fn html_field(payload: &Value, key: &str) -> Option<String> {
    text_field(payload, key).map(clean_html)
}

/// Number or numeric string as text
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A 1-5 rating, `None` for anything else
fn danger_level(value: Option<&Value>) -> Option<u8> {
    let level = match value? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u8::try_from(level).ok().filter(|l| (1..=5).contains(l))
}

/// Ratings of the `current` danger entry, else the first decodable one
fn band_dangers(payload: &Value) -> BandDangers {
    let entries: Vec<ApiDanger> = decode_list(payload, "danger");
    let Some(current) = entries
        .iter()
        .find(|d| d.valid_day.as_deref() == Some("current"))
        .or_else(|| entries.first())
    else {
        return BandDangers::default();
    };
    BandDangers {
        alpine: danger_level(current.upper.as_ref()),
        treeline: danger_level(current.middle.as_ref()),
        below_treeline: danger_level(current.lower.as_ref()),
    }
}

fn issue_date(payload: &Value) -> Option<NaiveDate> {
    let published = text_field(payload, "published_time")?;
    NaiveDate::parse_from_str(published.get(..10)?, "%Y-%m-%d").ok()
}

fn source_id(payload: &Value) -> Option<u64> {
    match payload.get("id")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl ApiProblem {
    fn size(&self) -> DestructiveSize {
        let bounds: Vec<String> = match &self.size {
            Some(Value::Array(values)) => values.iter().filter_map(scalar_text).collect(),
            Some(single) => scalar_text(single).into_iter().collect(),
            None => Vec::new(),
        };
        let parsed = match bounds.as_slice() {
            [min, max, ..] => DestructiveSize::from_bounds(min, max),
            [only] => DestructiveSize::from_bounds(only, only),
            [] => None,
        };
        parsed.unwrap_or_else(|| {
            debug!(size = ?self.size, "Unparsable problem size, using D2");
            DestructiveSize::default()
        })
    }

    fn rose(&self) -> AspectElevationRose {
        let locations: Vec<&str> = self
            .location
            .as_ref()
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .collect();
        AspectElevationRose::from_locations(&locations)
    }

    /// Problem discussion, else the media caption
    fn details(&self) -> Option<String> {
        let caption = || {
            self.media
                .as_ref()
                .and_then(|media| media.get("caption"))
                .and_then(Value::as_str)
                .map(clean_html)
        };
        self.discussion
            .as_deref()
            .map(clean_html)
            .filter(|d| !d.is_empty())
            .or_else(caption)
    }

    fn into_problem(self, problem_number: u32) -> AvalancheProblem {
        let problem_type = ProblemType::classify(self.name.as_deref().unwrap_or_default());
        let mut problem = AvalancheProblem::new(problem_number, problem_type);
        problem.likelihood = self
            .likelihood
            .as_deref()
            .and_then(Likelihood::parse)
            .unwrap_or_default();
        problem.size = self.size();
        problem.aspect_elevation_rose = self.rose();
        problem.with_details(self.details())
    }
}

/// Id of the separately published weather product this forecast references
#[must_use]
pub fn weather_product_id(payload: &Value) -> Option<u64> {
    payload
        .get("weather_data")?
        .get("weather_product_id")?
        .as_u64()
}

pub(crate) fn extract_payload_fields(payload: &Value) -> ExtractedFields {
    if !payload.is_object() {
        warn!("Forecast payload is not an object, using defaults");
        return ExtractedFields::default();
    }

    let problems = decode_list::<ApiProblem>(payload, "forecast_avalanche_problems")
        .into_iter()
        .zip(1u32..)
        .map(|(problem, number)| problem.into_problem(number))
        .collect();

    let weather = payload
        .get("weather_data")
        .filter(|data| data.is_array())
        .and_then(|_| extract_weather_product(payload));

    ExtractedFields {
        source_id: source_id(payload),
        issue_date: issue_date(payload),
        danger: band_dangers(payload),
        bottom_line: html_field(payload, "bottom_line"),
        discussion: html_field(payload, "hazard_discussion"),
        problems,
        weather,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Aspect, DangerRatings, Elevation};
    use rstest::rstest;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "id": 8812,
            "published_time": "2025-01-15T13:00:00+00:00",
            "bottom_line": "<p>Dangerous avalanche conditions exist.</p><p>Avoid steep wind-loaded slopes.</p>",
            "hazard_discussion": "Strong winds&nbsp;built fresh drifts.",
            "danger": [
                {"valid_day": "tomorrow", "upper": 2, "middle": 2, "lower": 1},
                {"valid_day": "current", "upper": 3, "middle": 3, "lower": 2}
            ],
            "forecast_avalanche_problems": [
                {
                    "name": "Wind Slab",
                    "likelihood": "likely",
                    "size": ["1", "2.5"],
                    "location": ["north upper", "northeast upper", "east middle", "bogus", "west nowhere"],
                    "discussion": "<p>Fresh drifts on leeward slopes.</p>"
                },
                {
                    "name": "Persistent Slab",
                    "likelihood": "very likely",
                    "size": [2, 2],
                    "location": [],
                    "media": {"caption": "Buried surface hoar"}
                }
            ],
            "weather_data": {"weather_product_id": 991}
        })
    }

    #[test]
    fn test_payload_fields() {
        let fields = extract_payload_fields(&sample_payload());

        assert_eq!(fields.source_id, Some(8812));
        assert_eq!(fields.issue_date, NaiveDate::from_ymd_opt(2025, 1, 15));
        assert_eq!(fields.danger.alpine, Some(3));
        assert_eq!(fields.danger.below_treeline, Some(2));
        assert_eq!(
            fields.bottom_line.as_deref(),
            Some("Dangerous avalanche conditions exist.\n\nAvoid steep wind-loaded slopes.")
        );
        assert_eq!(fields.discussion.as_deref(), Some("Strong winds built fresh drifts."));
        assert!(fields.weather.is_none());

        let wind = &fields.problems[0];
        assert_eq!(wind.problem_number, 1);
        assert_eq!(wind.problem_type, ProblemType::WindSlab);
        assert_eq!(wind.likelihood, Likelihood::Likely);
        assert_eq!(wind.size.to_string(), "D1-D2");
        assert_eq!(wind.aspect_elevation_rose.affected_count(), 3);
        assert!(wind.aspect_elevation_rose.is_affected(Aspect::E, Elevation::Treeline));
        assert_eq!(wind.details.as_deref(), Some("Fresh drifts on leeward slopes."));

        let persistent = &fields.problems[1];
        assert_eq!(persistent.problem_number, 2);
        assert_eq!(persistent.likelihood, Likelihood::VeryLikely);
        assert_eq!(persistent.size.to_string(), "D2");
        assert_eq!(persistent.details.as_deref(), Some("Buried surface hoar"));
    }

    #[test]
    fn test_first_danger_entry_when_no_current() {
        let payload = json!({"danger": [{"upper": 4, "middle": "3", "lower": null}]});
        let danger = extract_payload_fields(&payload).danger;
        assert_eq!(danger.alpine, Some(4));
        assert_eq!(danger.treeline, Some(3));
        assert_eq!(danger.below_treeline, None);
    }

    #[rstest]
    #[case(json!(0), None)]
    #[case(json!(6), None)]
    #[case(json!(-1), None)]
    #[case(json!("2"), Some(2))]
    #[case(json!(true), None)]
    fn test_danger_level(#[case] value: Value, #[case] expected: Option<u8>) {
        assert_eq!(danger_level(Some(&value)), expected);
    }

    #[test]
    fn test_bad_problem_keeps_other_fields() {
        let payload = json!({
            "bottom_line": "<p>Wind slabs are likely today.</p>",
            "danger": [{"valid_day": "current", "upper": 4, "middle": 3, "lower": 2}],
            "forecast_avalanche_problems": [
                {"name": "Wind Slab", "likelihood": "likely", "size": ["1", "2"]},
                {"name": 17, "likelihood": "possible"},
                "not a problem",
                {"name": "Persistent Slab", "size": "2"}
            ]
        });
        let fields = extract_payload_fields(&payload);

        assert_eq!(
            fields.danger.or(DangerRatings::undetermined()),
            DangerRatings::new(4, 3, 2)
        );
        assert_eq!(fields.bottom_line.as_deref(), Some("Wind slabs are likely today."));

        let numbered: Vec<(u32, ProblemType)> = fields
            .problems
            .iter()
            .map(|p| (p.problem_number, p.problem_type))
            .collect();
        assert_eq!(
            numbered,
            vec![(1, ProblemType::WindSlab), (2, ProblemType::PersistentSlab)]
        );
        assert_eq!(fields.problems[1].size.to_string(), "D2");
    }

    #[test]
    fn test_mistyped_fields_degrade_individually() {
        let payload = json!({
            "id": "8812",
            "bottom_line": 5,
            "hazard_discussion": "Drifts formed overnight.",
            "danger": "none",
            "forecast_avalanche_problems": {"name": "Wind Slab"}
        });
        let fields = extract_payload_fields(&payload);
        assert_eq!(fields.source_id, Some(8812));
        assert!(fields.bottom_line.is_none());
        assert_eq!(fields.discussion.as_deref(), Some("Drifts formed overnight."));
        assert_eq!(fields.danger, BandDangers::default());
        assert!(fields.problems.is_empty());
    }

    #[test]
    fn test_non_object_payload_is_all_defaults() {
        assert_eq!(extract_payload_fields(&json!([1, 2, 3])), ExtractedFields::default());
    }

    #[test]
    fn test_problem_defaults() {
        let payload = json!({"forecast_avalanche_problems": [{"size": ["big"], "likelihood": "sometimes"}]});
        let problem = &extract_payload_fields(&payload).problems[0];
        assert_eq!(problem.problem_type, ProblemType::Unknown);
        assert_eq!(problem.likelihood, Likelihood::Possible);
        assert_eq!(problem.size, DestructiveSize::default());
        assert!(problem.details.is_none());
    }

    #[test]
    fn test_weather_product_id() {
        assert_eq!(weather_product_id(&sample_payload()), Some(991));
        assert_eq!(weather_product_id(&json!({"weather_data": []})), None);
    }
}

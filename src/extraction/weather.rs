//! Mountain weather from page text and from structured weather products

use super::first_success;
use super::html::clean_html;
use crate::models::problem::truncate_chars;
use crate::models::{ValueRange, WeatherConditions, WeatherSummary};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

const SUMMARY_CHARS: usize = 500;
const WEATHER_WINDOW: usize = 40;

static TEMPERATURE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?\d+)\s*(?:to|-)\s*(-?\d+)\s*(?:°\s*)?(?:fahrenheit|degrees|f\b)").unwrap()
});
static WIND_RANGE_NEAR_WIND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"winds?\b[^.]*?(\d+)\s*(?:to|-)\s*(\d+)\s*mph").unwrap()
});
static WIND_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(?:to|-)\s*(\d+)\s*mph").unwrap());
static SNOW_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\d+)\s*(?:to|-)\s*(\d+)\s*(?:inches|inch|in\b|")"#).unwrap()
});

fn capture_range(regex: &Regex, text: &str) -> Option<ValueRange> {
    let caps = regex.captures(text)?;
    Some(ValueRange::new(caps[1].parse().ok()?, caps[2].parse().ok()?))
}

fn temperature(text: &str) -> Option<ValueRange> {
    capture_range(&TEMPERATURE_RANGE, text)
}

fn wind_near_wind_word(text: &str) -> Option<ValueRange> {
    capture_range(&WIND_RANGE_NEAR_WIND, text)
}

fn wind_anywhere(text: &str) -> Option<ValueRange> {
    capture_range(&WIND_RANGE, text)
}

fn snowfall(text: &str) -> Option<ValueRange> {
    capture_range(&SNOW_RANGE, text)
}

const TEMPERATURE_STRATEGIES: &[fn(&str) -> Option<ValueRange>] = &[temperature];
const WIND_STRATEGIES: &[fn(&str) -> Option<ValueRange>] = &[wind_near_wind_word, wind_anywhere];
const SNOW_STRATEGIES: &[fn(&str) -> Option<ValueRange>] = &[snowfall];

/// Build a summary from free weather text, with each numeric range optional
#[must_use]
pub fn summarize_weather_text(text: &str) -> WeatherSummary {
    let lower = text.to_lowercase();
    WeatherSummary {
        summary: truncate_chars(text, SUMMARY_CHARS),
        full_text: text.to_string(),
        temperature_f: first_success(lower.as_str(), TEMPERATURE_STRATEGIES),
        wind_mph: first_success(lower.as_str(), WIND_STRATEGIES),
        snowfall_in: first_success(lower.as_str(), SNOW_STRATEGIES),
        conditions: None,
    }
}

/// Weather from the lines of the page's weather region
#[must_use]
pub fn extract_weather_text(lines: &[String]) -> Option<WeatherSummary> {
    let parts: Vec<&str> = lines
        .iter()
        .take(WEATHER_WINDOW)
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(summarize_weather_text(&parts.join(" ")))
}

/// Cell text, with its prefix (`"24hr:"`) when present
fn cell_text(cell: &Value) -> String {
    let value = match cell.get("value") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    match cell.get("prefix").and_then(Value::as_str).map(str::trim) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix} {value}"),
        _ => value,
    }
}

/// Lower bound of a snowfall value; trace amounts count as zero
fn snow_amount(value: &str) -> Option<String> {
    let value = value.trim();
    let low = value
        .split(" to ")
        .next()
        .and_then(|v| v.split(" - ").next())
        .unwrap_or(value)
        .trim();
    match low.to_lowercase().as_str() {
        "" => None,
        "tr" | "trace" => Some("0".to_string()),
        _ => Some(low.to_string()),
    }
}

/// Column 1 is today in the product table; fall back to column 0
fn today_value(values: &[String]) -> Option<String> {
    let today = match values {
        [first, second, ..] if second.is_empty() => first,
        [_, second, ..] => second,
        [first] => first,
        [] => return None,
    };
    (!today.is_empty()).then(|| today.clone())
}

/// Row heading key and cell values, in table order
type ProductTable = Vec<(String, Vec<String>)>;

fn table_conditions(table: &ProductTable) -> WeatherConditions {
    let today = |key: &str| {
        table
            .iter()
            .find(|(heading, _)| heading == key)
            .and_then(|(_, values)| today_value(values))
    };

    let mut conditions = WeatherConditions {
        temperature: today("temperature"),
        cloud_cover: today("cloud_cover"),
        wind_speed: today("ridgeline_wind_speed"),
        wind_direction: today("wind_direction"),
        ..WeatherConditions::default()
    };

    for value in table.iter().flat_map(|(_, values)| values) {
        if let Some(rest) = value.split_once("24hr:").map(|(_, rest)| rest) {
            conditions.snowfall_24hr = conditions.snowfall_24hr.or_else(|| snow_amount(rest));
        } else if let Some(rest) = value.split_once("12hr:").map(|(_, rest)| rest) {
            conditions.snowfall_12hr = conditions.snowfall_12hr.or_else(|| snow_amount(rest));
        }
    }

    conditions
}

/// Parse a structured weather product (`weather_data[0].rows/data`) into a
/// summary. Returns `None` when the product carries no table.
#[must_use]
pub fn extract_weather_product(payload: &Value) -> Option<WeatherSummary> {
    let product = payload.get("weather_data")?.as_array()?.first()?;
    let rows = product.get("rows")?.as_array()?;
    let data = product.get("data")?.as_array()?;
    if rows.is_empty() || data.is_empty() {
        debug!("Weather product has an empty table");
        return None;
    }

    let mut table = ProductTable::new();
    for (row, cells) in rows.iter().zip(data) {
        let Some(heading) = row.get("heading").and_then(Value::as_str) else {
            continue;
        };
        let key = heading.trim().to_lowercase().replace(' ', "_");
        let values = cells
            .as_array()
            .map(|cells| cells.iter().map(cell_text).collect())
            .unwrap_or_default();
        table.push((key, values));
    }

    let discussion = payload
        .get("weather_discussion")
        .and_then(Value::as_str)
        .map(clean_html)
        .unwrap_or_default();

    let conditions = table_conditions(&table);
    let mut summary = summarize_weather_text(&discussion);
    summary.conditions = (!conditions.is_empty()).then_some(conditions);
    Some(summary)
}

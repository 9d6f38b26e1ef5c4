//! Forecast extraction
//!
//! Turns a captured page or API product into a [`Forecast`]:
//! - `scanner`: partitions page lines into named sections
//! - `danger`, `problems`, `narrative`, `weather`: per-section extractors
//! - `html`: tag stripping for markup and HTML-bearing payload fields
//! - `payload`: field mapping for decoded API products
//! - `assembler`: fills defaults and builds the forecast
//!
//! Extraction never fails on content. Missing sections degrade to defaults;
//! only an unknown zone is rejected.

pub mod assembler;
pub mod danger;
pub mod html;
pub mod narrative;
pub mod payload;
pub mod problems;
pub mod scanner;
pub mod weather;

pub use danger::BandDangers;
pub use html::clean_html;
pub use payload::weather_product_id;
pub use scanner::{Document, Section, SectionMap, scan_sections};
pub use weather::extract_weather_product;

use crate::Result;
use crate::models::{AvalancheProblem, DangerRatings, Forecast, WeatherSummary, Zone};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, instrument};

/// Captured content of one fetch
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    /// Rendered page text, one entry per line
    PageLines(Vec<String>),
    /// Page markup, cleaned to lines before scanning
    PageHtml(String),
    /// Decoded API forecast product
    ApiPayload(Value),
}

/// Immutable input to [`extract_forecast`]
#[derive(Debug, Clone, PartialEq)]
pub struct RawSource {
    pub body: RawBody,
    /// Day the caller fetched the content for
    pub captured_on: NaiveDate,
}

impl RawSource {
    #[must_use]
    pub fn page_text(text: &str, captured_on: NaiveDate) -> Self {
        Self {
            body: RawBody::PageLines(text.lines().map(str::to_string).collect()),
            captured_on,
        }
    }

    #[must_use]
    pub fn page_html(html: impl Into<String>, captured_on: NaiveDate) -> Self {
        Self {
            body: RawBody::PageHtml(html.into()),
            captured_on,
        }
    }

    #[must_use]
    pub fn api_payload(payload: Value, captured_on: NaiveDate) -> Self {
        Self {
            body: RawBody::ApiPayload(payload),
            captured_on,
        }
    }
}

/// Everything the extractors found, before defaults are applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub source_id: Option<u64>,
    pub issue_date: Option<NaiveDate>,
    pub danger: BandDangers,
    pub bottom_line: Option<String>,
    pub discussion: Option<String>,
    pub problems: Vec<AvalancheProblem>,
    pub weather: Option<WeatherSummary>,
}

/// Try each strategy in order and keep the first value produced
pub(crate) fn first_success<I: ?Sized, T>(
    input: &I,
    strategies: &[fn(&I) -> Option<T>],
) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(input))
}

fn extract_page_fields(lines: &[String]) -> ExtractedFields {
    let doc = Document::new(lines);
    ExtractedFields {
        source_id: None,
        issue_date: None,
        danger: danger::extract_danger(doc.section_lines(Section::Danger)),
        bottom_line: narrative::extract_bottom_line(doc.section_lines(Section::BottomLine)),
        discussion: narrative::extract_discussion(doc.section_lines(Section::Discussion)),
        problems: problems::extract_problems(&doc),
        weather: weather::extract_weather_text(doc.section_lines(Section::Weather)),
    }
}

/// Extract a normalized forecast for `zone_id` from captured content.
///
/// Fails only with `InvalidZone`, before any extraction runs.
#[instrument(skip(source), fields(captured_on = %source.captured_on))]
pub fn extract_forecast(source: &RawSource, zone_id: &str) -> Result<Forecast> {
    let zone: Zone = zone_id.parse()?;

    let (fields, danger_defaults) = match &source.body {
        RawBody::PageLines(lines) => (extract_page_fields(lines), danger::PAGE_DEFAULT_DANGER),
        RawBody::PageHtml(markup) => (
            extract_page_fields(&html::html_to_lines(markup)),
            danger::PAGE_DEFAULT_DANGER,
        ),
        RawBody::ApiPayload(payload) => (
            payload::extract_payload_fields(payload),
            DangerRatings::undetermined(),
        ),
    };

    let forecast = assembler::assemble(zone, source.captured_on, fields, danger_defaults);
    info!(
        zone = %forecast.zone,
        valid_date = %forecast.valid_date,
        danger = forecast.overall_danger(),
        problems = forecast.problems.len(),
        "Extracted forecast"
    );
    Ok(forecast)
}

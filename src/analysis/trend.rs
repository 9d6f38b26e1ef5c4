//! Day-over-day trend classification
//!
//! Signals are checked in priority order and the first decisive one wins:
//! storm language in the narrative, a change in overall danger, a change in
//! the number of problems, then general sentiment phrases. Without a usable
//! previous forecast only the two phrase tiers apply.

use super::matcher::PhraseTable;
use crate::models::problem::truncate_chars;
use crate::models::{DANGER_NOT_DETERMINED, Forecast, Trend, TrendResult, TrendSignal};
use std::cmp::Ordering;
use std::sync::LazyLock;
use tracing::{debug, instrument};

/// Longest key message or travel advice kept, in characters
pub const MAX_EXCERPT_CHARS: usize = 300;
const MIN_ACTIONABLE_CHARS: usize = 15;
const FALLBACK_SENTENCE_CHARS: usize = 30;

const STORM_PHRASES: &[&str] = &[
    "storm expected",
    "storm approaching",
    "storm arriving",
    "snow expected",
    "snow arriving",
    "inches expected",
    "accumulation expected",
    "danger is expected to rise",
    "loading will",
    "new load",
];

const WORSENING_PHRASES: &[&str] = &[
    "dangerous avalanche conditions",
    "heightened avalanche conditions",
    "increasing",
    "elevated danger",
];

const IMPROVING_PHRASES: &[&str] = &[
    "adjusting",
    "stabiliz",
    "decreased",
    "isolated",
    "stubborn",
    "unlikely",
    "slowly improved",
    "conditions have improved",
];

const STEADY_PHRASES: &[&str] = &[
    "little change",
    "unchanged",
    "similar to yesterday",
    "no significant change",
    "remains the same",
];

const ACTIONABLE_PATTERNS: &[&str] = &[
    r"expect\s+\w+",
    r"avoid\s+\w+",
    r"stay\s+(below|under|off|away)",
    r"do\s+not",
    r"give\s+yourself.*margin",
    r"safest.*terrain",
    r"you can trigger",
    r"dangerous\s+\w+",
];

const TRAVEL_ADVICE_PATTERNS: &[&str] = &[
    r"the safest[^.]+\.",
    r"you can reduce[^.]+\.",
    r"avoid[^.]+\.",
    r"lower elevation[^.]+\.",
    r"wind.protected[^.]+\.",
    r"best[^.]*riding[^.]+\.",
];

static STORM: LazyLock<PhraseTable<Trend>> = LazyLock::new(|| {
    PhraseTable::from_phrases(&[(Trend::StormIncoming, STORM_PHRASES)]).unwrap()
});

static SENTIMENT: LazyLock<PhraseTable<Trend>> = LazyLock::new(|| {
    PhraseTable::from_phrases(&[
        (Trend::Worsening, WORSENING_PHRASES),
        (Trend::Improving, IMPROVING_PHRASES),
        (Trend::Steady, STEADY_PHRASES),
    ])
    .unwrap()
});

static ACTIONABLE: LazyLock<PhraseTable<()>> =
    LazyLock::new(|| PhraseTable::from_patterns(&[((), ACTIONABLE_PATTERNS)]).unwrap());

static TRAVEL_ADVICE: LazyLock<PhraseTable<()>> =
    LazyLock::new(|| PhraseTable::from_patterns(&[((), TRAVEL_ADVICE_PATTERNS)]).unwrap());

/// Collapse internal whitespace and cap the length
fn excerpt(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_EXCERPT_CHARS)
}

/// First actionable sentence, else the first reasonably long one
#[must_use]
pub fn extract_key_message(text: &str) -> Option<String> {
    let sentences: Vec<&str> = text.split(['.', '!', '?']).map(str::trim).collect();

    sentences
        .iter()
        .find(|s| s.chars().count() >= MIN_ACTIONABLE_CHARS && ACTIONABLE.is_match(s))
        .or_else(|| {
            sentences
                .iter()
                .find(|s| s.chars().count() > FALLBACK_SENTENCE_CHARS)
        })
        .map(|s| excerpt(s))
}

/// First terrain recommendation in pattern priority order
#[must_use]
pub fn extract_travel_advice(text: &str) -> Option<String> {
    TRAVEL_ADVICE
        .first_match(text)
        .map(|(_, m)| excerpt(m.as_str()))
}

/// Trend implied by a change from `previous` to `current`
fn direction(current: usize, previous: usize) -> Option<Trend> {
    match current.cmp(&previous) {
        Ordering::Less => Some(Trend::Improving),
        Ordering::Greater => Some(Trend::Worsening),
        Ordering::Equal => None,
    }
}

fn danger_change(current: &Forecast, previous: &Forecast) -> Option<Trend> {
    let (now, before) = (current.overall_danger(), previous.overall_danger());
    if now == DANGER_NOT_DETERMINED || before == DANGER_NOT_DETERMINED {
        return None;
    }
    direction(usize::from(now), usize::from(before))
}

fn problem_count_change(current: &Forecast, previous: &Forecast) -> Option<Trend> {
    direction(current.problems.len(), previous.problems.len())
}

/// Same zone and valid exactly one calendar day earlier
fn is_day_before(current: &Forecast, previous: &Forecast) -> bool {
    previous.zone == current.zone && current.valid_date.pred_opt() == Some(previous.valid_date)
}

fn decide(current: &Forecast, previous: Option<&Forecast>, narrative: &str) -> (Trend, TrendSignal) {
    if STORM.is_match(narrative) {
        return (Trend::StormIncoming, TrendSignal::StormKeywords);
    }

    if let Some(previous) = previous {
        if let Some(trend) = danger_change(current, previous) {
            return (trend, TrendSignal::DangerChange);
        }
        if let Some(trend) = problem_count_change(current, previous) {
            return (trend, TrendSignal::ProblemCountChange);
        }
    }

    match SENTIMENT.category(narrative) {
        Some(trend) => (trend, TrendSignal::Keywords),
        None => (Trend::Steady, TrendSignal::Default),
    }
}

/// Classify the trend of `current` against the previous day's forecast for
/// the same zone. A `previous` from another zone or date is ignored.
#[instrument(skip_all, fields(zone = %current.zone, valid_date = %current.valid_date))]
pub fn classify_trend(current: &Forecast, previous: Option<&Forecast>) -> TrendResult {
    let previous = previous.filter(|p| {
        let usable = is_day_before(current, p);
        if !usable {
            debug!(
                previous_zone = %p.zone,
                previous_date = %p.valid_date,
                "Ignoring previous forecast that is not the prior day for this zone"
            );
        }
        usable
    });

    let narrative = current.narrative();
    let (trend, signal) = decide(current, previous, &narrative);
    debug!(%trend, ?signal, "Classified trend");

    TrendResult {
        trend,
        signal,
        key_message: extract_key_message(&narrative),
        travel_advice: extract_travel_advice(&narrative),
    }
}

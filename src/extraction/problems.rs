//! Avalanche problems from rendered page text
//!
//! Page text only names each problem and describes it. The likelihood and
//! size scales are rendered as static labels without the selected value, so
//! problems from pages always carry the default likelihood and size.

use super::scanner::{PROBLEM_MARKER, classify_heading};
use super::{Document, Section, danger::band_marker};
use crate::models::problem::PROBLEM_TYPE_HINTS;
use crate::models::{Aspect, AvalancheProblem, ProblemType};
use tracing::debug;

/// Lines to search after a marker for the problem type
const TYPE_LOOKAHEAD: usize = 4;
/// Lines to search after a marker for the description
const DETAILS_WINDOW: usize = 50;
/// The description starts at the first line longer than this
const DETAILS_START_CHARS: usize = 50;
/// Continuation lines must be longer than this
const DETAILS_CONTINUE_CHARS: usize = 20;
/// A line shorter than this ends the description
const DETAILS_STOP_CHARS: usize = 10;

const LABEL_MAX_CHARS: usize = 30;
const LABELS: &[&str] = &[
    "problem type",
    "aspect/elevation",
    "aspect",
    "elevation",
    "likelihood",
    "destructive size",
    "size",
];

const SCALE_WORD_MAX_CHARS: usize = 25;
const SCALE_WORDS: &[&str] = &[
    "unlikely",
    "possible",
    "likely",
    "very likely",
    "almost certain",
    "certain",
    "small",
    "large",
    "very large",
    "historic",
    "d1",
    "d2",
    "d3",
    "d4",
    "d5",
];

/// Problem marker line and what follows it
struct Marker<'a> {
    inline: &'a str,
    following: &'a [String],
}

fn type_from_inline(marker: &Marker<'_>) -> Option<ProblemType> {
    Some(ProblemType::classify(marker.inline)).filter(|t| *t != ProblemType::Unknown)
}

fn type_from_lookahead(marker: &Marker<'_>) -> Option<ProblemType> {
    let found = marker
        .following
        .iter()
        .map(|line| line.trim())
        .take(TYPE_LOOKAHEAD)
        .take_while(|line| !PROBLEM_MARKER.is_match(line))
        .filter(|line| !line.to_uppercase().contains("PROBLEM TYPE"))
        .filter(|line| {
            let lower = line.to_lowercase();
            PROBLEM_TYPE_HINTS.iter().any(|hint| lower.contains(hint))
        })
        .map(ProblemType::classify)
        .find(|t| *t != ProblemType::Unknown);
    if let Some(problem_type) = found {
        debug!(%problem_type, "Problem type found after marker");
    }
    found
}

const TYPE_STRATEGIES: &[fn(&Marker<'_>) -> Option<ProblemType>] =
    &[type_from_inline, type_from_lookahead];

fn is_label(line: &str) -> bool {
    if line.chars().count() > LABEL_MAX_CHARS {
        return false;
    }
    let lower = line.to_lowercase();
    LABELS.iter().any(|label| lower.starts_with(label))
}

/// `N`, `NE, E`, `SW W NW`
fn is_compass_tokens(line: &str) -> bool {
    let mut tokens = line
        .split(|c: char| c.is_whitespace() || c == ',' || c == '/')
        .filter(|t| !t.is_empty())
        .peekable();
    tokens.peek().is_some() && tokens.all(|t| Aspect::from_code(&t.to_uppercase()).is_some())
}

fn is_scale_word(line: &str) -> bool {
    if line.chars().count() > SCALE_WORD_MAX_CHARS {
        return false;
    }
    let lower = line.to_lowercase();
    SCALE_WORDS.iter().any(|word| {
        lower
            .strip_prefix(word)
            .is_some_and(|rest| rest.is_empty() || !rest.starts_with(char::is_alphanumeric))
    })
}

fn is_band_label(line: &str) -> bool {
    line.chars().count() <= LABEL_MAX_CHARS && band_marker(line).is_some()
}

fn is_skippable(line: &str) -> bool {
    is_label(line) || is_compass_tokens(line) || is_scale_word(line) || is_band_label(line)
}

/// Accumulate the description that follows a marker
fn collect_details(following: &[String]) -> Option<String> {
    let mut details: Option<String> = None;

    for line in following.iter().take(DETAILS_WINDOW) {
        let line = line.trim();
        if PROBLEM_MARKER.is_match(line) || classify_heading(line).is_some() {
            break;
        }
        if is_skippable(line) {
            continue;
        }

        let len = line.chars().count();
        if let Some(text) = details.as_mut() {
            if len > DETAILS_CONTINUE_CHARS {
                text.push(' ');
                text.push_str(line);
            } else if len < DETAILS_STOP_CHARS {
                break;
            }
        } else if len > DETAILS_START_CHARS {
            details = Some(line.to_string());
        }
    }

    details
}

/// Find every problem marker in `lines`, numbering them in discovery order
fn scan_problems(lines: &[String]) -> Vec<AvalancheProblem> {
    let mut problems = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = PROBLEM_MARKER.captures(line.trim()) else {
            continue;
        };
        let marker = Marker {
            inline: caps.get(2).map_or("", |m| m.as_str()),
            following: &lines[i + 1..],
        };

        let problem_type = TYPE_STRATEGIES
            .iter()
            .find_map(|strategy| strategy(&marker))
            .unwrap_or(ProblemType::Unknown);
        let number = u32::try_from(problems.len() + 1).unwrap_or(u32::MAX);
        problems.push(
            AvalancheProblem::new(number, problem_type)
                .with_details(collect_details(marker.following)),
        );
    }

    problems
}

/// Problems from the problems region, or from the whole page when the
/// region holds none
#[must_use]
pub fn extract_problems(doc: &Document<'_>) -> Vec<AvalancheProblem> {
    let scopes = [doc.section_lines(Section::Problems), doc.lines()];
    scopes
        .iter()
        .map(|lines| scan_problems(lines))
        .find(|problems| !problems.is_empty())
        .unwrap_or_default()
}

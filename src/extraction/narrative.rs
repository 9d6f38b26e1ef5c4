//! Bottom line and discussion text

use super::scanner::classify_heading;

const BOTTOM_LINE_WINDOW: usize = 10;
const BOTTOM_LINE_START_CHARS: usize = 30;
const BOTTOM_LINE_MAX_CONTINUATIONS: usize = 4;
const DISCUSSION_WINDOW: usize = 30;
/// Lines this long or shorter are labels, dates or bylines
const SUBSTANTIAL_CHARS: usize = 20;

const HEADING_WORDS: &[&str] = &["FORECAST", "AVALANCHE", "PROBLEM"];

/// A recognized heading, or an all-caps line naming a forecast section
fn looks_like_heading(line: &str) -> bool {
    if classify_heading(line).is_some() {
        return true;
    }
    let shouting =
        line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase);
    shouting && HEADING_WORDS.iter().any(|w| line.contains(w))
}

fn is_substantial(line: &str) -> bool {
    line.chars().count() > SUBSTANTIAL_CHARS
}

/// First long line of the bottom line region plus its continuation lines
#[must_use]
pub fn extract_bottom_line(lines: &[String]) -> Option<String> {
    let window = &lines[..lines.len().min(BOTTOM_LINE_WINDOW)];
    let start = window
        .iter()
        .position(|line| line.trim().chars().count() > BOTTOM_LINE_START_CHARS)?;

    let mut parts = vec![lines[start].trim()];
    parts.extend(
        lines[start + 1..]
            .iter()
            .map(|line| line.trim())
            .take(BOTTOM_LINE_MAX_CONTINUATIONS)
            .take_while(|line| is_substantial(line) && !looks_like_heading(line)),
    );
    Some(parts.join(" "))
}

/// Substantial lines of the discussion region joined into one paragraph
#[must_use]
pub fn extract_discussion(lines: &[String]) -> Option<String> {
    let parts: Vec<&str> = lines
        .iter()
        .take(DISCUSSION_WINDOW)
        .map(|line| line.trim())
        .filter(|line| is_substantial(line))
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

//! Section scanner for rendered forecast pages
//!
//! A single forward pass over the page lines drives a small state machine.
//! Heading lines move the machine between sections; every other line belongs
//! to whichever section is open. Example page layout:
//!
//! ```text
//! THE BOTTOM LINE
//! ...
//! AVALANCHE DANGER
//! Above Treeline ⇡
//! 3 - Considerable
//! ...
//! DANGER SCALE          <- legend repeats "1 - Low" .. "5 - Extreme"
//! AVALANCHE PROBLEMS
//! PROBLEM #1: Persistent Slab
//! ...
//! FORECAST DISCUSSION
//! ...
//! MOUNTAIN WEATHER FORECAST
//! ```
//!
//! The danger region opens at most once. The legend always follows the real
//! ratings, so once the danger region has been closed a later "AVALANCHE
//! DANGER" line cannot reopen it and legend values never reach the danger
//! extractor.

use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

/// Lines longer than this are prose, never headings
const MAX_HEADING_CHARS: usize = 48;

/// `PROBLEM #1: Persistent Slab`, `Avalanche Problem 2`
pub(crate) static PROBLEM_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:avalanche\s+)?problem\s*#?\s*(\d+)\s*:?\s*(.*)$").unwrap()
});

/// Named regions of a forecast page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Danger,
    DangerScale,
    Problems,
    BottomLine,
    Discussion,
    Weather,
}

/// Recognized heading kinds. `Other` closes the open section without
/// opening a tracked one (e.g. "RECENT OBSERVATIONS").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Heading {
    Danger,
    DangerScale,
    Problems,
    BottomLine,
    Discussion,
    Weather,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    InDanger,
    InDangerScale,
    InProblems,
    InBottomLine,
    InDiscussion,
    InWeather,
}

impl ScanState {
    fn section(self) -> Option<Section> {
        match self {
            ScanState::Outside => None,
            ScanState::InDanger => Some(Section::Danger),
            ScanState::InDangerScale => Some(Section::DangerScale),
            ScanState::InProblems => Some(Section::Problems),
            ScanState::InBottomLine => Some(Section::BottomLine),
            ScanState::InDiscussion => Some(Section::Discussion),
            ScanState::InWeather => Some(Section::Weather),
        }
    }

    /// Next state after a heading. `None` means the heading is inert.
    fn on_heading(self, heading: Heading, danger_opened: bool) -> Option<ScanState> {
        let next = match heading {
            Heading::Danger if danger_opened => return None,
            Heading::Danger => ScanState::InDanger,
            Heading::DangerScale => ScanState::InDangerScale,
            Heading::Problems => ScanState::InProblems,
            Heading::BottomLine => ScanState::InBottomLine,
            Heading::Discussion => ScanState::InDiscussion,
            Heading::Weather => ScanState::InWeather,
            Heading::Other => ScanState::Outside,
        };
        (next != self).then_some(next)
    }
}

/// Mixed-case text ending in sentence punctuation is prose, not a heading
fn reads_as_sentence(line: &str) -> bool {
    line.chars().any(char::is_lowercase) && line.ends_with(['.', '!', '?', ',', ';'])
}

/// Classify a line as a section heading by case-insensitive keyword match
pub(crate) fn classify_heading(line: &str) -> Option<Heading> {
    let line = line.trim();
    if line.is_empty() || line.chars().count() > MAX_HEADING_CHARS || reads_as_sentence(line) {
        return None;
    }
    if PROBLEM_MARKER.is_match(line) {
        return None;
    }

    let upper = line.to_uppercase();
    // Order matters: "AVALANCHE DANGER SCALE" is the legend
    if upper.contains("DANGER SCALE") {
        Some(Heading::DangerScale)
    } else if upper.contains("AVALANCHE PROBLEM") {
        Some(Heading::Problems)
    } else if upper.contains("AVALANCHE DANGER") {
        Some(Heading::Danger)
    } else if upper.contains("BOTTOM LINE") {
        Some(Heading::BottomLine)
    } else if upper.contains("FORECAST DISCUSSION") || upper.contains("HAZARD DISCUSSION") {
        Some(Heading::Discussion)
    } else if upper.contains("WEATHER")
        && (upper == "WEATHER"
            || ["MOUNTAIN", "FORECAST", "SUMMARY", "DISCUSSION", "OUTLOOK"]
                .iter()
                .any(|q| upper.contains(q)))
    {
        Some(Heading::Weather)
    } else if upper.starts_with("RECENT ") {
        Some(Heading::Other)
    } else {
        None
    }
}

/// Line ranges of each section found on a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    ranges: HashMap<Section, Range<usize>>,
}

impl SectionMap {
    /// Half-open range of content lines (heading excluded); empty when absent
    #[must_use]
    pub fn range(&self, section: Section) -> Range<usize> {
        self.ranges.get(&section).cloned().unwrap_or(0..0)
    }

    #[must_use]
    pub fn contains(&self, section: Section) -> bool {
        self.ranges.contains_key(&section)
    }

    fn close(&mut self, state: ScanState, start: usize, end: usize) {
        if let Some(section) = state.section() {
            self.ranges.entry(section).or_insert(start..end);
        }
    }
}

/// Partition lines into sections. Only the first occurrence of a section is
/// recorded.
#[must_use]
pub fn scan_sections<S: AsRef<str>>(lines: &[S]) -> SectionMap {
    let mut map = SectionMap::default();
    let mut state = ScanState::Outside;
    let mut start = 0;
    let mut danger_opened = false;

    for (i, line) in lines.iter().enumerate() {
        let Some(heading) = classify_heading(line.as_ref()) else {
            continue;
        };
        let Some(next) = state.on_heading(heading, danger_opened) else {
            continue;
        };

        map.close(state, start, i);
        if next == ScanState::InDanger {
            danger_opened = true;
        }
        state = next;
        start = i + 1;
    }
    map.close(state, start, lines.len());

    map
}

/// Page lines together with their section map
#[derive(Debug)]
pub struct Document<'a> {
    lines: &'a [String],
    sections: SectionMap,
}

impl<'a> Document<'a> {
    #[must_use]
    pub fn new(lines: &'a [String]) -> Self {
        Self {
            lines,
            sections: scan_sections(lines),
        }
    }

    #[must_use]
    pub fn lines(&self) -> &'a [String] {
        self.lines
    }

    #[must_use]
    pub fn sections(&self) -> &SectionMap {
        &self.sections
    }

    /// Content lines of a section, empty when the section is absent
    #[must_use]
    pub fn section_lines(&self, section: Section) -> &'a [String] {
        &self.lines[self.sections.range(section)]
    }
}

//! Danger ratings per elevation band

use super::first_success;
use crate::models::{DangerRatings, Elevation};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `3 - Considerable`, `2 – Moderate`
static DANGER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-5])\s*[-–]\s*\w+").unwrap());

/// Lines to look past a band marker for its rating
const RATING_LOOKAHEAD: usize = 2;

/// Defaults for bands a page does not rate
pub(crate) const PAGE_DEFAULT_DANGER: DangerRatings = DangerRatings {
    alpine: 2,
    treeline: 2,
    below_treeline: 1,
};

/// Per-band ratings found in the danger region, `None` when not found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandDangers {
    pub alpine: Option<u8>,
    pub treeline: Option<u8>,
    pub below_treeline: Option<u8>,
}

impl BandDangers {
    fn slot(&mut self, band: Elevation) -> &mut Option<u8> {
        match band {
            Elevation::Alpine => &mut self.alpine,
            Elevation::Treeline => &mut self.treeline,
            Elevation::BelowTreeline => &mut self.below_treeline,
        }
    }

    /// Fill unrated bands from `defaults`
    #[must_use]
    pub fn or(self, defaults: DangerRatings) -> DangerRatings {
        if self.alpine.is_none() || self.treeline.is_none() || self.below_treeline.is_none() {
            debug!(found = ?self, "Danger bands missing, using defaults");
        }
        DangerRatings::new(
            self.alpine.unwrap_or(defaults.alpine),
            self.treeline.unwrap_or(defaults.treeline),
            self.below_treeline.unwrap_or(defaults.below_treeline),
        )
    }
}

/// Elevation band a line labels, if any
pub(crate) fn band_marker(line: &str) -> Option<Elevation> {
    let lower = line.to_lowercase();
    if lower.contains("above treeline") || line.contains('⇡') {
        Some(Elevation::Alpine)
    } else if lower.contains("below treeline") || line.contains('⇣') {
        Some(Elevation::BelowTreeline)
    } else if lower.contains("near treeline")
        && !lower.contains("above")
        && !lower.contains("below")
    {
        Some(Elevation::Treeline)
    } else {
        None
    }
}

/// Map a danger scale word to its level
pub(crate) fn danger_word_level(word: &str) -> Option<u8> {
    match word.trim().to_lowercase().as_str() {
        "low" => Some(1),
        "moderate" | "mod" => Some(2),
        "considerable" | "cons" => Some(3),
        "high" => Some(4),
        "extreme" | "extr" => Some(5),
        _ => None,
    }
}

fn rating_from_token(line: &str) -> Option<u8> {
    DANGER_TOKEN
        .captures(line)
        .and_then(|caps| caps[1].parse().ok())
}

fn rating_from_word(line: &str) -> Option<u8> {
    danger_word_level(line)
}

const RATING_STRATEGIES: &[fn(&str) -> Option<u8>] = &[rating_from_token, rating_from_word];

/// Extract band ratings from the lines of the danger region. The first
/// rating found for a band wins.
#[must_use]
pub fn extract_danger<S: AsRef<str>>(lines: &[S]) -> BandDangers {
    let mut dangers = BandDangers::default();

    for (i, line) in lines.iter().enumerate() {
        let Some(band) = band_marker(line.as_ref()) else {
            continue;
        };
        let slot = dangers.slot(band);
        if slot.is_some() {
            continue;
        }

        for next in lines.iter().skip(i + 1).take(RATING_LOOKAHEAD) {
            let next = next.as_ref().trim();
            if band_marker(next).is_some() {
                break;
            }
            if let Some(level) = first_success(next, RATING_STRATEGIES) {
                *slot = Some(level);
                break;
            }
        }
    }

    dangers
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "Low")]
    #[case(2, "Moderate")]
    #[case(3, "Considerable")]
    #[case(4, "High")]
    #[case(5, "Extreme")]
    fn test_digit_becomes_rating(#[case] digit: u8, #[case] word: &str) {
        let token = format!("{digit} - {word}");
        let lines = ["Above Treeline ⇡", token.as_str()];
        assert_eq!(extract_danger(&lines).alpine, Some(digit));
    }

    #[test]
    fn test_all_bands() {
        let lines = [
            "Above Treeline ⇡",
            "3 - Considerable",
            "Near Treeline",
            "",
            "2 – Moderate",
            "Below Treeline ⇣",
            "1 - Low",
        ];
        let dangers = extract_danger(&lines);
        assert_eq!(dangers.alpine, Some(3));
        assert_eq!(dangers.treeline, Some(2));
        assert_eq!(dangers.below_treeline, Some(1));
    }

    #[test]
    fn test_first_rating_wins() {
        let lines = ["Above Treeline", "4 - High", "Above Treeline", "1 - Low"];
        assert_eq!(extract_danger(&lines).alpine, Some(4));
    }

    #[test]
    fn test_rating_out_of_lookahead_is_ignored() {
        let lines = ["Above Treeline", "", "", "3 - Considerable"];
        assert_eq!(extract_danger(&lines).alpine, None);
    }

    #[test]
    fn test_bare_danger_word_fallback() {
        let lines = ["Below Treeline", "Moderate"];
        assert_eq!(extract_danger(&lines).below_treeline, Some(2));
    }

    #[test]
    fn test_rating_not_taken_from_next_band() {
        let lines = ["Above Treeline", "Near Treeline", "3 - Considerable"];
        let dangers = extract_danger(&lines);
        assert_eq!(dangers.alpine, None);
        assert_eq!(dangers.treeline, Some(3));
    }

    #[test]
    fn test_defaults_fill_missing_bands() {
        let dangers = BandDangers {
            alpine: Some(4),
            ..BandDangers::default()
        };
        assert_eq!(dangers.or(PAGE_DEFAULT_DANGER), DangerRatings::new(4, 2, 1));
    }

    #[rstest]
    #[case("Near Treeline", Some(Elevation::Treeline))]
    #[case("near treeline and above", None)]
    #[case("ABOVE TREELINE", Some(Elevation::Alpine))]
    #[case("⇣", Some(Elevation::BelowTreeline))]
    #[case("Treeline", None)]
    fn test_band_marker(#[case] line: &str, #[case] expected: Option<Elevation>) {
        assert_eq!(band_marker(line), expected);
    }
}

//! Avalanche problem model

use super::AspectElevationRose;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of problem details, in characters
pub const MAX_DETAILS_CHARS: usize = 1000;

/// Closed set of avalanche problem types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    PersistentSlab,
    WindSlab,
    StormSlab,
    WetSlab,
    LooseDry,
    LooseWet,
    Cornice,
    Glide,
    Unknown,
}

/// Classification rules, first match wins. Every keyword of a rule must
/// appear in the lower-cased text. Bare "slab" falls through to persistent.
const PROBLEM_TYPE_RULES: &[(&[&str], ProblemType)] = &[
    (&["persistent", "slab"], ProblemType::PersistentSlab),
    (&["wind", "slab"], ProblemType::WindSlab),
    (&["storm", "slab"], ProblemType::StormSlab),
    (&["wet", "slab"], ProblemType::WetSlab),
    (&["loose", "dry"], ProblemType::LooseDry),
    (&["loose", "wet"], ProblemType::LooseWet),
    (&["cornice"], ProblemType::Cornice),
    (&["glide"], ProblemType::Glide),
    (&["slab"], ProblemType::PersistentSlab),
];

/// Words that mark a line as naming a problem type
pub(crate) const PROBLEM_TYPE_HINTS: &[&str] = &["slab", "loose", "cornice", "glide"];

impl ProblemType {
    /// Classify free text such as "Persistent Slab" or "Wet Loose"
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        PROBLEM_TYPE_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().all(|k| lower.contains(k)))
            .map_or(ProblemType::Unknown, |(_, problem_type)| *problem_type)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProblemType::PersistentSlab => "persistent_slab",
            ProblemType::WindSlab => "wind_slab",
            ProblemType::StormSlab => "storm_slab",
            ProblemType::WetSlab => "wet_slab",
            ProblemType::LooseDry => "loose_dry",
            ProblemType::LooseWet => "loose_wet",
            ProblemType::Cornice => "cornice",
            ProblemType::Glide => "glide",
            ProblemType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Likelihood of avalanches for a problem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Likelihood {
    Unlikely,
    #[default]
    Possible,
    Likely,
    #[serde(rename = "Very Likely")]
    VeryLikely,
    #[serde(rename = "Almost Certain")]
    AlmostCertain,
}

impl Likelihood {
    /// Parse case-insensitively, tolerating `_`/`-` separators
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text
            .trim()
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        match normalized.as_str() {
            "unlikely" => Some(Likelihood::Unlikely),
            "possible" => Some(Likelihood::Possible),
            "likely" => Some(Likelihood::Likely),
            "very likely" => Some(Likelihood::VeryLikely),
            "almost certain" | "certain" => Some(Likelihood::AlmostCertain),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Likelihood::Unlikely => "Unlikely",
            Likelihood::Possible => "Possible",
            Likelihood::Likely => "Likely",
            Likelihood::VeryLikely => "Very Likely",
            Likelihood::AlmostCertain => "Almost Certain",
        }
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destructive size range, `D<min>` or `D<min>-D<max>` with 1 <= min <= max <= 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DestructiveSize {
    min: u8,
    max: u8,
}

impl Default for DestructiveSize {
    /// D2
    fn default() -> Self {
        Self { min: 2, max: 2 }
    }
}

impl DestructiveSize {
    #[must_use]
    pub fn new(min: u8, max: u8) -> Option<Self> {
        ((1..=5).contains(&min) && (min..=5).contains(&max)).then_some(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> u8 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> u8 {
        self.max
    }

    /// Parse `"D2"`, `"D1-D3"` or `"D1-3"` (case-insensitive)
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_uppercase();
        let body = text.strip_prefix('D')?;
        match body.split_once('-') {
            Some((lo, hi)) => {
                let hi = hi.trim().strip_prefix('D').unwrap_or(hi.trim());
                Self::new(lo.trim().parse().ok()?, hi.parse().ok()?)
            }
            None => {
                let size = body.parse().ok()?;
                Self::new(size, size)
            }
        }
    }

    /// Build from API bounds; half sizes like "2.5" round down
    #[must_use]
    pub fn from_bounds(min: &str, max: &str) -> Option<Self> {
        let parse = |s: &str| -> Option<u8> {
            let value: f32 = s.trim().trim_start_matches(['D', 'd']).parse().ok()?;
            if value.is_finite() && value >= 0.0 {
                Some(value.floor() as u8)
            } else {
                None
            }
        };
        Self::new(parse(min)?, parse(max)?)
    }
}

impl fmt::Display for DestructiveSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "D{}", self.min)
        } else {
            write!(f, "D{}-D{}", self.min, self.max)
        }
    }
}

impl TryFrom<String> for DestructiveSize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid destructive size '{value}'"))
    }
}

impl From<DestructiveSize> for String {
    fn from(size: DestructiveSize) -> Self {
        size.to_string()
    }
}

/// A discrete hazard within a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvalancheProblem {
    /// 1-based position in discovery order
    pub problem_number: u32,
    /// Kind of avalanche problem
    pub problem_type: ProblemType,
    /// Chance of triggering, `Possible` when the source does not say
    pub likelihood: Likelihood,
    /// Destructive size range, `D2` when the source does not say
    pub size: DestructiveSize,
    /// Aspects and elevations where the problem exists
    pub aspect_elevation_rose: AspectElevationRose,
    /// Free text, at most [`MAX_DETAILS_CHARS`] characters
    pub details: Option<String>,
}

impl AvalancheProblem {
    /// Problem with default likelihood, size and an empty rose
    #[must_use]
    pub fn new(problem_number: u32, problem_type: ProblemType) -> Self {
        Self {
            problem_number,
            problem_type,
            likelihood: Likelihood::default(),
            size: DestructiveSize::default(),
            aspect_elevation_rose: AspectElevationRose::empty(),
            details: None,
        }
    }

    /// Attach details, capped and with empty text treated as absent
    #[must_use]
    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details
            .map(|d| truncate_chars(d.trim(), MAX_DETAILS_CHARS))
            .filter(|d| !d.is_empty());
        self
    }
}

/// Truncate to at most `max` characters on a char boundary
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Persistent Slab", ProblemType::PersistentSlab)]
    #[case("Deep Persistent Slab", ProblemType::PersistentSlab)]
    #[case("Wind Slab", ProblemType::WindSlab)]
    #[case("storm slab", ProblemType::StormSlab)]
    #[case("Wet Slab", ProblemType::WetSlab)]
    #[case("Dry Loose", ProblemType::LooseDry)]
    #[case("Loose Dry", ProblemType::LooseDry)]
    #[case("Wet Loose", ProblemType::LooseWet)]
    #[case("Cornice", ProblemType::Cornice)]
    #[case("Glide Avalanches", ProblemType::Glide)]
    #[case("Slab", ProblemType::PersistentSlab)]
    #[case("Something else", ProblemType::Unknown)]
    #[case("", ProblemType::Unknown)]
    fn test_classify_problem_type(#[case] text: &str, #[case] expected: ProblemType) {
        assert_eq!(ProblemType::classify(text), expected);
    }

    #[rstest]
    #[case("possible", Some(Likelihood::Possible))]
    #[case("Very Likely", Some(Likelihood::VeryLikely))]
    #[case("very_likely", Some(Likelihood::VeryLikely))]
    #[case("ALMOST CERTAIN", Some(Likelihood::AlmostCertain))]
    #[case("unlikely", Some(Likelihood::Unlikely))]
    #[case("maybe", None)]
    fn test_parse_likelihood(#[case] text: &str, #[case] expected: Option<Likelihood>) {
        assert_eq!(Likelihood::parse(text), expected);
    }

    #[rstest]
    #[case("D2", Some((2, 2)))]
    #[case("D1-D3", Some((1, 3)))]
    #[case("d1-3", Some((1, 3)))]
    #[case("D3-D1", None)]
    #[case("D6", None)]
    #[case("D0", None)]
    #[case("2", None)]
    fn test_parse_size(#[case] text: &str, #[case] expected: Option<(u8, u8)>) {
        assert_eq!(
            DestructiveSize::parse(text).map(|s| (s.min(), s.max())),
            expected
        );
    }

    #[test]
    fn test_size_display_and_serde() {
        assert_eq!(DestructiveSize::default().to_string(), "D2");
        let size = DestructiveSize::from_bounds("1", "2.5").unwrap();
        assert_eq!(size.to_string(), "D1-D2");
        assert_eq!(serde_json::to_string(&size).unwrap(), "\"D1-D2\"");
        let back: DestructiveSize = serde_json::from_str("\"D1-D2\"").unwrap();
        assert_eq!(back, size);
        assert!(serde_json::from_str::<DestructiveSize>("\"D9\"").is_err());
    }

    #[test]
    fn test_likelihood_serializes_display_form() {
        assert_eq!(
            serde_json::to_string(&Likelihood::VeryLikely).unwrap(),
            "\"Very Likely\""
        );
    }

    #[test]
    fn test_details_are_capped() {
        let long = "x".repeat(1500);
        let problem = AvalancheProblem::new(1, ProblemType::WindSlab).with_details(Some(long));
        assert_eq!(problem.details.unwrap().chars().count(), MAX_DETAILS_CHARS);

        let empty = AvalancheProblem::new(1, ProblemType::WindSlab).with_details(Some("  ".into()));
        assert!(empty.details.is_none());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("ééé", 2), "éé");
        assert_eq!(truncate_chars("ab", 5), "ab");
    }
}

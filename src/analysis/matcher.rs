//! Ordered pattern tables with first-match-wins lookup

use regex::{Match, Regex, RegexBuilder};

/// Case-insensitive patterns paired with a category. Lookup walks the table
/// in order, so earlier rows take priority over later ones.
#[derive(Debug, Clone)]
pub struct PhraseTable<C> {
    rules: Vec<(Regex, C)>,
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl<C: Copy> PhraseTable<C> {
    /// Table of literal phrases
    pub fn from_phrases(groups: &[(C, &[&str])]) -> Result<Self, regex::Error> {
        Self::build(groups, |phrase| case_insensitive(&regex::escape(phrase)))
    }

    /// Table of regular expressions
    pub fn from_patterns(groups: &[(C, &[&str])]) -> Result<Self, regex::Error> {
        Self::build(groups, case_insensitive)
    }

    fn build(
        groups: &[(C, &[&str])],
        compile: impl Fn(&str) -> Result<Regex, regex::Error>,
    ) -> Result<Self, regex::Error> {
        let mut rules = Vec::new();
        for (category, patterns) in groups {
            for pattern in *patterns {
                rules.push((compile(*pattern)?, *category));
            }
        }
        Ok(Self { rules })
    }

    /// First rule in table order that matches anywhere in `text`
    #[must_use]
    pub fn first_match<'t>(&self, text: &'t str) -> Option<(C, Match<'t>)> {
        self.rules
            .iter()
            .find_map(|(regex, category)| regex.find(text).map(|m| (*category, m)))
    }

    #[must_use]
    pub fn category(&self, text: &str) -> Option<C> {
        self.first_match(text).map(|(category, _)| category)
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.rules.iter().any(|(regex, _)| regex.is_match(text))
    }
}

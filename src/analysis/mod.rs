//! Forecast analysis
//!
//! - `matcher`: ordered pattern tables shared by the phrase lookups
//! - `trend`: day-over-day trend, key message and travel advice
//! - `observations`: aggregate trend of daily observation counts

pub mod matcher;
pub mod observations;
pub mod trend;

pub use matcher::PhraseTable;
pub use observations::{calculate_trend, calculate_trend_with};
pub use trend::{MAX_EXCERPT_CHARS, classify_trend, extract_key_message, extract_travel_advice};

//! Aggregate trend over a series of daily observation counts

use crate::config::AnalysisConfig;
use crate::models::ObservationTrend;

/// Trend of `daily_counts` (oldest first) with the default ratio and
/// minimum series length
#[must_use]
pub fn calculate_trend(daily_counts: &[u32]) -> ObservationTrend {
    calculate_trend_with(daily_counts, &AnalysisConfig::default())
}

/// Compare the sum of the first half of the series with the sum of the
/// second half. The second half takes the extra point of an odd series.
#[must_use]
pub fn calculate_trend_with(daily_counts: &[u32], config: &AnalysisConfig) -> ObservationTrend {
    if daily_counts.len() < config.min_observation_points {
        return ObservationTrend::InsufficientData;
    }

    let (first, second) = daily_counts.split_at(daily_counts.len() / 2);
    let sum = |half: &[u32]| half.iter().map(|&c| f64::from(c)).sum::<f64>();
    let (first, second) = (sum(first), sum(second));

    if second > first * config.observation_ratio {
        ObservationTrend::Increasing
    } else if first > second * config.observation_ratio {
        ObservationTrend::Decreasing
    } else {
        ObservationTrend::Stable
    }
}

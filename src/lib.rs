//! `avyforecast` - Avalanche forecast extraction and trend classification
//!
//! This library turns loosely structured avalanche forecast text (a rendered
//! page or a decoded API product) into a normalized [`Forecast`], and
//! classifies the day-over-day trend between consecutive forecasts of a zone.
//! It performs no I/O; fetching and storage belong to the caller.

pub mod analysis;
pub mod config;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod models;

// Re-export core types for public API
pub use analysis::{calculate_trend, calculate_trend_with, classify_trend};
pub use config::AppConfig;
pub use error::ForecastError;
pub use extraction::{
    RawBody, RawSource, clean_html, extract_forecast, extract_weather_product, weather_product_id,
};
pub use models::{
    AspectElevationRose, AvalancheProblem, DangerRatings, Forecast, ForecastRecord,
    ObservationTrend, Trend, TrendResult, Zone,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ForecastError>;

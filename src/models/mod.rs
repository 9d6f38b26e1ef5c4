//! Data models for the avalanche forecast core
//!
//! This module contains the domain models organized by concern:
//! - Zone: the fixed forecast zone table
//! - Rose: aspect/elevation grid of a problem
//! - Problem: avalanche problems and their attributes
//! - Forecast: the normalized daily forecast
//! - Weather: mountain weather summary
//! - Trend: trend classifier output
//! - Record: flat persistence payload

pub mod forecast;
pub mod problem;
pub mod record;
pub mod rose;
pub mod trend;
pub mod weather;
pub mod zone;

pub use forecast::{
    DANGER_NOT_DETERMINED, DangerRatings, Forecast, danger_label, find_previous,
    select_daily_forecasts,
};
pub use problem::{AvalancheProblem, DestructiveSize, Likelihood, MAX_DETAILS_CHARS, ProblemType};
pub use record::ForecastRecord;
pub use rose::{Aspect, AspectElevationRose, Elevation, ElevationCells};
pub use trend::{ObservationTrend, Trend, TrendResult, TrendSignal};
pub use weather::{ValueRange, WeatherConditions, WeatherSummary};
pub use zone::Zone;

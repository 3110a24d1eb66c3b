//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Coordinate validation and the forecast error taxonomy
//! - Unit conversions and derived metrics (real feel, precipitation, recommendation)
//! - Alignment of parallel forecast arrays into per-timestamp records
//! - The fetch lifecycle around the Open-Meteo forecast API
//! - Configuration handling
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod location;
pub mod metrics;
pub mod model;
pub mod provider;
pub mod schema;
pub mod series;
pub mod session;
pub mod units;

pub use config::Config;
pub use coordinate::{Coordinate, validate};
pub use error::{Axis, WeatherError};
pub use location::{FixedLocation, LocationProvider};
pub use metrics::{
    CurrentObservation, DerivedMetrics, PrecipitationCategory, RealFeelInputs, Recommendation,
    compute_apparent_temperature,
};
pub use model::{Forecast, ForecastMode, ForecastQuery};
pub use provider::{ForecastSource, open_meteo::OpenMeteoClient};
pub use series::{DailyRecord, HourlyMetrics, HourlyRecord, UvIndex};
pub use session::{FetchOutcome, FetchState, FetchTimeouts, ForecastSession, Status};

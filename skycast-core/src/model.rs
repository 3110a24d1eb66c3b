use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    coordinate::Coordinate,
    metrics::CurrentObservation,
    series::{DailyRecord, HourlyRecord},
};

/// Which forecast shape is requested and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMode {
    Current,
    Daily,
    Hourly,
}

impl ForecastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMode::Current => "current",
            ForecastMode::Daily => "daily",
            ForecastMode::Hourly => "hourly",
        }
    }

    pub const fn all() -> &'static [ForecastMode] {
        &[ForecastMode::Current, ForecastMode::Daily, ForecastMode::Hourly]
    }

    /// Top-level field the response must carry for this mode.
    pub fn response_field(&self) -> &'static str {
        match self {
            ForecastMode::Current => "current_weather",
            ForecastMode::Daily => "daily",
            ForecastMode::Hourly => "hourly",
        }
    }
}

impl fmt::Display for ForecastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ForecastMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "current" => Ok(ForecastMode::Current),
            "daily" => Ok(ForecastMode::Daily),
            "hourly" => Ok(ForecastMode::Hourly),
            _ => Err(anyhow::anyhow!(
                "Unknown forecast mode '{value}'. Supported modes: current, daily, hourly."
            )),
        }
    }
}

const CURRENT_PARAMS: &[(&str, &str)] = &[("current_weather", "true"), ("precipitation", "true")];

const DAILY_PARAMS: &[(&str, &str)] = &[
    ("daily", "temperature_2m_max,temperature_2m_min,precipitation_sum"),
    ("timezone", "auto"),
    ("forecast_days", "5"),
];

const HOURLY_PARAMS: &[(&str, &str)] = &[
    (
        "hourly",
        "temperature_2m,precipitation,weathercode,windspeed_10m,uv_index",
    ),
    ("forecast_days", "1"),
    ("timezone", "auto"),
];

/// A validated request, ready to hand to a [`crate::ForecastSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastQuery {
    pub coordinate: Coordinate,
    pub mode: ForecastMode,
}

impl ForecastQuery {
    pub fn new(coordinate: Coordinate, mode: ForecastMode) -> Self {
        Self { coordinate, mode }
    }

    /// Query string parameters for the provider.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let (lat, lon) = match self.mode {
            ForecastMode::Daily => (
                format!("{:.6}", self.coordinate.latitude()),
                format!("{:.6}", self.coordinate.longitude()),
            ),
            _ => (
                self.coordinate.latitude().to_string(),
                self.coordinate.longitude().to_string(),
            ),
        };

        let mut params = vec![("latitude", lat), ("longitude", lon)];

        let extra = match self.mode {
            ForecastMode::Current => CURRENT_PARAMS,
            ForecastMode::Daily => DAILY_PARAMS,
            ForecastMode::Hourly => HOURLY_PARAMS,
        };
        params.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));

        params
    }
}

/// Normalized result of one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "data", rename_all = "lowercase")]
pub enum Forecast {
    Current(CurrentObservation),
    Daily(Vec<DailyRecord>),
    Hourly(Vec<HourlyRecord>),
}

impl Forecast {
    pub fn mode(&self) -> ForecastMode {
        match self {
            Forecast::Current(_) => ForecastMode::Current,
            Forecast::Daily(_) => ForecastMode::Daily,
            Forecast::Hourly(_) => ForecastMode::Hourly,
        }
    }

    /// Number of records; a current observation counts as one.
    pub fn len(&self) -> usize {
        match self {
            Forecast::Current(_) => 1,
            Forecast::Daily(records) => records.len(),
            Forecast::Hourly(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

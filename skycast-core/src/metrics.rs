//! Derived, human-facing metrics computed from one observation.
//!
//! Every function here is pure; a refresh recomputes everything from the
//! newest observation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::{celsius_to_fahrenheit, kmh_to_mph, round_to};

/// Wind-chill style "real feel" polynomial.
///
/// Inputs are already-converted °F and mph. Negative `wind_mph` yields NaN;
/// use [`real_feel`] when the input may be negative.
pub fn compute_apparent_temperature(temp_f: f64, wind_mph: f64) -> f64 {
    let wind_factor = wind_mph.powf(0.16);
    35.74 + 0.6215 * temp_f - 35.75 * wind_factor + 0.4275 * temp_f * wind_factor
}

/// How real feel inputs are prepared before the polynomial runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealFeelInputs {
    /// Round °F and mph to one decimal first with [`round_to`] (halves away
    /// from zero).
    #[default]
    Rounded,
    FullPrecision,
}

/// Real feel in °F from °F and mph, applying the input policy.
///
/// Negative wind speeds are clamped to zero.
pub fn real_feel(temp_f: f64, wind_mph: f64, inputs: RealFeelInputs) -> f64 {
    let wind_mph = if wind_mph < 0.0 {
        tracing::warn!(wind_mph, "negative wind speed clamped to 0 for real feel");
        0.0
    } else {
        wind_mph
    };

    match inputs {
        RealFeelInputs::Rounded => {
            compute_apparent_temperature(round_to(temp_f, 1), round_to(wind_mph, 1))
        }
        RealFeelInputs::FullPrecision => compute_apparent_temperature(temp_f, wind_mph),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecipitationCategory {
    #[serde(rename = "No Precipitation")]
    None,
    Raining,
    Snowing,
}

impl PrecipitationCategory {
    pub fn classify(precipitation_mm: f64) -> Self {
        if precipitation_mm > 1.0 {
            PrecipitationCategory::Snowing
        } else if precipitation_mm > 0.0 {
            PrecipitationCategory::Raining
        } else {
            PrecipitationCategory::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipitationCategory::None => "No Precipitation",
            PrecipitationCategory::Raining => "Raining",
            PrecipitationCategory::Snowing => "Snowing",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            PrecipitationCategory::None => "☀️",
            PrecipitationCategory::Raining => "🌧️",
            PrecipitationCategory::Snowing => "❄️",
        }
    }
}

impl fmt::Display for PrecipitationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_str(), self.emoji())
    }
}

/// One actionable suggestion; see [`Recommendation::recommend`] for the rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "cold, wear a jacket")]
    Cold,
    #[serde(rename = "hot, stay hydrated")]
    Hot,
    #[serde(rename = "windy, secure loose items")]
    Windy,
    #[serde(rename = "bring an umbrella")]
    Umbrella,
    #[serde(rename = "enjoy the weather")]
    Enjoy,
}

impl Recommendation {
    /// First matching rule wins: cold, hot, windy, then precipitation.
    pub fn recommend(temp_f: f64, wind_mph: f64, precipitation_mm: f64) -> Self {
        if temp_f < 50.0 {
            Recommendation::Cold
        } else if temp_f > 85.0 {
            Recommendation::Hot
        } else if wind_mph > 15.0 {
            Recommendation::Windy
        } else if precipitation_mm > 0.0 {
            Recommendation::Umbrella
        } else {
            Recommendation::Enjoy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Cold => "cold, wear a jacket",
            Recommendation::Hot => "hot, stay hydrated",
            Recommendation::Windy => "windy, secure loose items",
            Recommendation::Umbrella => "bring an umbrella",
            Recommendation::Enjoy => "enjoy the weather",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observation as delivered by the provider, in metric units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentObservation {
    pub temperature_c: f64,
    pub windspeed_kmh: f64,
    pub precipitation_mm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub temperature_f: f64,
    pub windspeed_mph: f64,
    pub apparent_temperature_f: f64,
    pub precipitation_category: PrecipitationCategory,
    pub recommendation: Recommendation,
}

impl DerivedMetrics {
    pub fn from_observation(obs: &CurrentObservation, inputs: RealFeelInputs) -> Self {
        let temperature_f = celsius_to_fahrenheit(obs.temperature_c);
        let windspeed_mph = kmh_to_mph(obs.windspeed_kmh);

        Self {
            temperature_f,
            windspeed_mph,
            apparent_temperature_f: real_feel(temperature_f, windspeed_mph, inputs),
            precipitation_category: PrecipitationCategory::classify(obs.precipitation_mm),
            recommendation: Recommendation::recommend(
                temperature_f,
                windspeed_mph,
                obs.precipitation_mm,
            ),
        }
    }
}

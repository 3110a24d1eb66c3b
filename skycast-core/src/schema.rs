//! Open-Meteo payload shapes and the checks that turn a raw body into a [`Forecast`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::WeatherError,
    metrics::CurrentObservation,
    model::{Forecast, ForecastMode},
    series::{DailySeries, HourlySeries},
};

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    #[serde(default)]
    precipitation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_sum: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    windspeed_10m: Vec<f64>,
    precipitation: Vec<f64>,
    #[serde(default)]
    uv_index: Option<Vec<Option<f64>>>,
}

/// Parse a full response body for `mode`.
///
/// The whole body either satisfies the expected shape or the call fails;
/// there is no partial result.
pub fn parse_forecast(mode: ForecastMode, body: &Value) -> Result<Forecast, WeatherError> {
    match mode {
        ForecastMode::Current => {
            let raw: OmCurrentWeather = section(body, mode.response_field())?;
            Ok(Forecast::Current(CurrentObservation {
                temperature_c: raw.temperature,
                windspeed_kmh: raw.windspeed,
                precipitation_mm: raw.precipitation.unwrap_or(0.0),
            }))
        }
        ForecastMode::Daily => {
            let raw: OmDaily = section(body, mode.response_field())?;
            let series = DailySeries {
                time: raw.time,
                temp_min_c: raw.temperature_2m_min,
                temp_max_c: raw.temperature_2m_max,
                precipitation_sum_mm: raw.precipitation_sum,
            };
            Ok(Forecast::Daily(series.align()?))
        }
        ForecastMode::Hourly => {
            let raw: OmHourly = section(body, mode.response_field())?;
            let series = HourlySeries {
                time: raw.time,
                temperature_c: raw.temperature_2m,
                windspeed_kmh: raw.windspeed_10m,
                precipitation_mm: raw.precipitation,
                uv_index: raw.uv_index,
            };
            Ok(Forecast::Hourly(series.align()?))
        }
    }
}

fn section<T: DeserializeOwned>(body: &Value, field: &str) -> Result<T, WeatherError> {
    let value = match body.get(field) {
        None | Some(Value::Null) => return Err(WeatherError::missing_field(field)),
        Some(value) => value,
    };

    T::deserialize(value).map_err(|e| WeatherError::MalformedResponse {
        field: field.to_string(),
        detail: format!("has an unexpected shape: {e}"),
    })
}

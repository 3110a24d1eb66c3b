//! Parallel forecast arrays and their per-timestamp records.
//!
//! A series is a set of equal-length columns where index `i` in every column
//! describes the same day or hour. [`align`] checks that invariant and turns
//! the columns into records, keeping the provider's chronological order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::WeatherError,
    metrics::{RealFeelInputs, real_feel},
    units::{celsius_to_fahrenheit, kmh_to_mph, mm_to_inches},
};

/// Zip columns by index into `N` records.
///
/// `columns` lists each column's name and length; the first column sets `N`.
/// Any other length fails with `MalformedSeries` naming the offending column.
pub fn align<R>(
    columns: &[(&'static str, usize)],
    build: impl FnMut(usize) -> R,
) -> Result<Vec<R>, WeatherError> {
    let Some(&(_, expected)) = columns.first() else {
        return Ok(Vec::new());
    };

    if let Some(&(field, actual)) = columns.iter().find(|(_, len)| *len != expected) {
        return Err(WeatherError::MalformedSeries {
            field,
            expected,
            actual,
        });
    }

    Ok((0..expected).map(build).collect())
}

/// UV index for one hour, or an explicit marker that the provider had none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum UvIndex {
    Available(f64),
    Unavailable,
}

impl From<Option<f64>> for UvIndex {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => UvIndex::Available(v),
            _ => UvIndex::Unavailable,
        }
    }
}

impl fmt::Display for UvIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UvIndex::Available(v) => write!(f, "{}", v.round()),
            UvIndex::Unavailable => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub temp_min_c: Vec<f64>,
    pub temp_max_c: Vec<f64>,
    pub precipitation_sum_mm: Vec<f64>,
}

impl DailySeries {
    pub fn align(&self) -> Result<Vec<DailyRecord>, WeatherError> {
        align(
            &[
                ("time", self.time.len()),
                ("temperature_2m_min", self.temp_min_c.len()),
                ("temperature_2m_max", self.temp_max_c.len()),
                ("precipitation_sum", self.precipitation_sum_mm.len()),
            ],
            |i| DailyRecord {
                date: self.time[i].clone(),
                temp_min_c: self.temp_min_c[i],
                temp_max_c: self.temp_max_c[i],
                precipitation_sum_mm: self.precipitation_sum_mm[i],
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: String,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub precipitation_sum_mm: f64,
}

impl DailyRecord {
    /// Temperature span as shown to the user, e.g. `0°C-10°C`.
    pub fn range(&self) -> String {
        format!("{}°C-{}°C", self.temp_min_c, self.temp_max_c)
    }
}

/// Hourly columns. A `None` UV column means the provider sent no UV data at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_c: Vec<f64>,
    pub windspeed_kmh: Vec<f64>,
    pub precipitation_mm: Vec<f64>,
    pub uv_index: Option<Vec<Option<f64>>>,
}

impl HourlySeries {
    pub fn align(&self) -> Result<Vec<HourlyRecord>, WeatherError> {
        let mut columns = vec![
            ("time", self.time.len()),
            ("temperature_2m", self.temperature_c.len()),
            ("windspeed_10m", self.windspeed_kmh.len()),
            ("precipitation", self.precipitation_mm.len()),
        ];
        if let Some(uv) = &self.uv_index {
            columns.push(("uv_index", uv.len()));
        }

        align(&columns, |i| HourlyRecord {
            time: self.time[i].clone(),
            temperature_c: self.temperature_c[i],
            windspeed_kmh: self.windspeed_kmh[i],
            precipitation_mm: self.precipitation_mm[i],
            uv_index: self
                .uv_index
                .as_ref()
                .map_or(UvIndex::Unavailable, |uv| UvIndex::from(uv[i])),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub time: String,
    pub temperature_c: f64,
    pub windspeed_kmh: f64,
    pub precipitation_mm: f64,
    pub uv_index: UvIndex,
}

/// Display-unit view of one hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyMetrics {
    pub temperature_f: f64,
    pub windspeed_mph: f64,
    pub real_feel_f: f64,
    pub precipitation_in: f64,
    pub uv_index: UvIndex,
}

impl HourlyRecord {
    pub fn metrics(&self, inputs: RealFeelInputs) -> HourlyMetrics {
        let temperature_f = celsius_to_fahrenheit(self.temperature_c);
        let windspeed_mph = kmh_to_mph(self.windspeed_kmh);

        HourlyMetrics {
            temperature_f,
            windspeed_mph,
            real_feel_f: real_feel(temperature_f, windspeed_mph, inputs),
            precipitation_in: mm_to_inches(self.precipitation_mm),
            uv_index: self.uv_index,
        }
    }
}

use serde::Serialize;

use crate::error::{Axis, WeatherError};

/// A latitude/longitude pair that has passed [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Check a raw coordinate pair before any request is built from it.
///
/// Non-finite input is `InvalidCoordinate`; finite input outside
/// `[-90, 90]` / `[-180, 180]` is `CoordinateOutOfRange`.
pub fn validate(latitude: f64, longitude: f64) -> Result<Coordinate, WeatherError> {
    check_axis(Axis::Latitude, latitude, 90.0)?;
    check_axis(Axis::Longitude, longitude, 180.0)?;

    Ok(Coordinate {
        latitude,
        longitude,
    })
}

fn check_axis(axis: Axis, value: f64, limit: f64) -> Result<(), WeatherError> {
    if !value.is_finite() {
        return Err(WeatherError::InvalidCoordinate { axis });
    }
    if !(-limit..=limit).contains(&value) {
        return Err(WeatherError::CoordinateOutOfRange { axis, value });
    }
    Ok(())
}

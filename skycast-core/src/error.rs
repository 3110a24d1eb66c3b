use std::fmt;

use thiserror::Error;

/// Which half of a coordinate pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can go wrong between acquiring a coordinate and producing records.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("invalid {axis}: not a finite number")]
    InvalidCoordinate { axis: Axis },

    #[error("{axis} {value} out of range")]
    CoordinateOutOfRange { axis: Axis, value: f64 },

    /// Raised by the location collaborator; passed through untouched.
    #[error("location permission denied: {0}")]
    PermissionDenied(String),

    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("malformed response: `{field}` {detail}")]
    MalformedResponse { field: String, detail: String },

    #[error("malformed series: `{field}` has {actual} entries, expected {expected}")]
    MalformedSeries {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl WeatherError {
    pub fn transport(message: impl Into<String>) -> Self {
        WeatherError::Transport {
            message: message.into(),
            source: None,
        }
    }

    pub fn transport_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        WeatherError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        WeatherError::MalformedResponse {
            field: field.into(),
            detail: "is missing".to_string(),
        }
    }

    /// The one-line message shown to the user next to the retry affordance.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::InvalidCoordinate { axis } => format!("Invalid {axis}"),
            WeatherError::CoordinateOutOfRange { axis: Axis::Latitude, .. } => {
                "Latitude out of range".to_string()
            }
            WeatherError::CoordinateOutOfRange { axis: Axis::Longitude, .. } => {
                "Longitude out of range".to_string()
            }
            WeatherError::PermissionDenied(_) => {
                "Permission to access location was denied.".to_string()
            }
            WeatherError::Transport { .. } => {
                "Could not retrieve weather. Check your internet connection.".to_string()
            }
            WeatherError::MalformedResponse { .. } | WeatherError::MalformedSeries { .. } => {
                "Invalid data format from API".to_string()
            }
        }
    }
}

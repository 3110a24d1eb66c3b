use async_trait::async_trait;
use std::fmt::Debug;

use crate::WeatherError;

/// Source of the raw coordinate pair for a session.
///
/// Returns unvalidated values; the session validates them before use. A
/// provider that cannot obtain the user's consent returns
/// [`WeatherError::PermissionDenied`].
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn locate(&self) -> Result<(f64, f64), WeatherError>;
}

/// Coordinates supplied up front, from flags or the config file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn locate(&self) -> Result<(f64, f64), WeatherError> {
        Ok((self.latitude, self.longitude))
    }
}


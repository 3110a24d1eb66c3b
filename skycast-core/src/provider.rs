use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{WeatherError, model::ForecastQuery};

pub mod open_meteo;

/// Remote collaborator that turns a validated query into a raw JSON body.
///
/// Implementations report every network-level failure as
/// [`WeatherError::Transport`] and never retry on their own.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self, query: &ForecastQuery) -> Result<Value, WeatherError>;
}


use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{WeatherError, model::ForecastQuery};

use super::ForecastSource;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    base_url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn fetch(&self, query: &ForecastQuery) -> Result<Value, WeatherError> {
        let params = query.params();
        tracing::debug!(mode = %query.mode, ?params, "requesting Open-Meteo forecast");

        let res = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                WeatherError::transport_with(
                    format!("failed to send {} request to Open-Meteo", query.mode),
                    e,
                )
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::transport_with("failed to read Open-Meteo response body", e)
        })?;

        if !status.is_success() {
            return Err(WeatherError::transport(format!(
                "Open-Meteo {} request failed with status {}: {}",
                query.mode,
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::MalformedResponse {
            field: "body".to_string(),
            detail: format!("is not valid JSON: {e}"),
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

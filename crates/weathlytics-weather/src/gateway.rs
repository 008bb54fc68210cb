//! Weather gateway: the remote current-conditions API.

use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, StatusCode};
use tracing::instrument;
use weathlytics_core::WeatherConfig;

use crate::error::GatewayError;
use crate::types::WeatherResult;

const USER_AGENT: &str = concat!("Weathlytics/", env!("CARGO_PKG_VERSION"));

/// Source of current weather keyed by city name.
pub trait WeatherGateway: Send + Sync {
    /// Whether an access credential is configured.
    fn has_credential(&self) -> bool;

    /// Fetch current conditions for `city` in metric units.
    ///
    /// # Errors
    /// `GatewayError::CityNotFound` when the provider does not know the city;
    /// any other variant for transport, status or payload failures.
    async fn current_weather(&self, city: &str) -> Result<WeatherResult, GatewayError>;
}

/// OpenWeatherMap `data/2.5/weather` client.
#[derive(Debug, Clone)]
pub struct OpenWeatherGateway {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherGateway {
    /// Create a gateway for `base_url`. A missing key is allowed: requests are
    /// still sent and the provider's rejection surfaces as a failure.
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        let api_key = api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("No weather API key configured; requests will be rejected upstream");
        }

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, GatewayError> {
        Self::new(&config.api_url, config.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl WeatherGateway for OpenWeatherGateway {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self), level = "debug")]
    async fn current_weather(&self, city: &str) -> Result<WeatherResult, GatewayError> {
        let mut request = self.client.get(&self.base_url).query(&[("q", city)]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("appid", key.as_str())]);
        }
        request = request.query(&[("units", "metric")]);

        let response = request.send().await?;
        let status = response.status();

        // Classified on status alone; the body may be unreadable.
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::CityNotFound(city.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let payload: openweather::CurrentResponse =
            serde_json::from_str(&body).map_err(|e| GatewayError::Parse(e.to_string()))?;
        payload.into_result()
    }
}

/// OpenWeatherMap response structures
mod openweather {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub name: String,
        pub main: MainBlock,
        pub weather: Vec<ConditionBlock>,
        pub wind: WindBlock,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainBlock {
        pub temp: f64,
        pub feels_like: f64,
        pub humidity: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ConditionBlock {
        pub description: String,
        pub icon: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct WindBlock {
        pub speed: f64,
    }

    impl CurrentResponse {
        /// Only the first `weather` entry is used.
        pub fn into_result(self) -> Result<WeatherResult, GatewayError> {
            let condition = self
                .weather
                .into_iter()
                .next()
                .ok_or_else(|| GatewayError::Parse("empty `weather` array".to_string()))?;

            Ok(WeatherResult {
                location_name: self.name,
                temperature_c: self.main.temp,
                feels_like_c: self.main.feels_like,
                humidity_pct: self.main.humidity.round().clamp(0.0, 100.0) as u8,
                wind_speed: self.wind.speed,
                condition_description: condition.description,
                condition_icon_id: condition.icon,
                fetched_at: Utc::now(),
            })
        }
    }

}

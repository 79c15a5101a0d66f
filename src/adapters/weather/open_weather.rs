//! OpenWeatherMap adapter. Implements WeatherClient via the current-weather REST API.
//!
//! One request per plan per run; readings are never cached.

use crate::domain::{DomainError, WeatherCondition, WeatherReading};
use crate::ports::WeatherClient;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// HTTP-level timeout. The runner applies its own per-call bound on top.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Subset of the current-weather response we consume. The `weather` array
/// carries the condition group in `main` (e.g. "Rain", "Clear", "Clouds").
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    weather: Vec<WeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    main: String,
}

/// OpenWeatherMap API adapter.
///
/// Requires an API key from https://openweathermap.org/api.
pub struct OpenWeatherAdapter {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OpenWeatherAdapter {
    /// Create the adapter.
    ///
    /// # Arguments
    /// * `api_url` - Current-weather endpoint (override for tests/proxies)
    /// * `api_key` - OpenWeatherMap API key
    pub fn new(api_url: String, api_key: String) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Weather(format!("HTTP client build failed: {}", e)))?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    fn reading_from_response(resp: CurrentWeatherResponse) -> Result<WeatherReading, DomainError> {
        let group = resp
            .weather
            .first()
            .map(|w| w.main.as_str())
            .ok_or_else(|| {
                DomainError::Weather("provider returned no weather entries".to_string())
            })?;
        Ok(WeatherReading {
            condition: WeatherCondition::from_provider_group(group),
        })
    }
}

#[async_trait::async_trait]
impl WeatherClient for OpenWeatherAdapter {
    async fn current_conditions(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<WeatherReading, DomainError> {
        let res = self
            .client
            .get(&self.api_url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::Weather(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Weather(format!(
                "Weather API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let parsed: CurrentWeatherResponse = res
            .json()
            .await
            .map_err(|e| DomainError::Weather(format!("Failed to parse API response: {}", e)))?;

        Self::reading_from_response(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_maps_main_group_to_condition() {
        let resp: CurrentWeatherResponse = serde_json::from_str(
            r#"{"weather":[{"id":501,"main":"Rain","description":"moderate rain","icon":"10d"}],"main":{"temp":289.1}}"#,
        )
        .unwrap();
        let reading = OpenWeatherAdapter::reading_from_response(resp).unwrap();
        assert_eq!(reading.condition, WeatherCondition::Rain);
    }

    #[test]
    fn response_with_unknown_group_maps_to_unknown() {
        let resp: CurrentWeatherResponse =
            serde_json::from_str(r#"{"weather":[{"main":"Plasma Storm"}]}"#).unwrap();
        let reading = OpenWeatherAdapter::reading_from_response(resp).unwrap();
        assert_eq!(reading.condition, WeatherCondition::Unknown);
    }

    #[test]
    fn response_without_entries_is_an_error() {
        let resp: CurrentWeatherResponse = serde_json::from_str(r#"{"weather":[]}"#).unwrap();
        let err = OpenWeatherAdapter::reading_from_response(resp).unwrap_err();
        assert!(matches!(err, DomainError::Weather(_)));
    }
}

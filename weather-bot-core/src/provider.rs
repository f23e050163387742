use crate::model::{Coordinates, ForecastEntry, WeatherQuery, WeatherSnapshot};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;
use tracing::warn;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Why a provider call produced no data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("provider answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("failed to decode provider JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected provider payload: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err)
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, FetchError>;

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, FetchError>;
}

/// Current conditions by city or coordinates, with every failure collapsed to `None`.
///
/// Returns `None` without touching the network when neither argument is given.
pub async fn fetch_current<P>(
    provider: &P,
    city: Option<&str>,
    coordinates: Option<Coordinates>,
) -> Option<WeatherSnapshot>
where
    P: WeatherProvider + ?Sized,
{
    let query = WeatherQuery::from_parts(city, coordinates)?;

    match provider.current(&query).await {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            warn!(?query, error = %err, "current weather unavailable");
            None
        }
    }
}

/// Forecast for a city, with every failure collapsed to `None`.
pub async fn fetch_forecast<P>(provider: &P, city: &str) -> Option<Vec<ForecastEntry>>
where
    P: WeatherProvider + ?Sized,
{
    match provider.forecast(city).await {
        Ok(entries) => Some(entries),
        Err(err) => {
            warn!(city, error = %err, "forecast unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: Mutex<Vec<WeatherQuery>>,
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, FetchError> {
            self.calls.lock().unwrap().push(query.clone());
            Err(FetchError::Status { status: 404, body: "city not found".into() })
        }

        async fn forecast(&self, _city: &str) -> Result<Vec<ForecastEntry>, FetchError> {
            Err(FetchError::Timeout)
        }
    }

    #[tokio::test]
    async fn fetch_current_without_query_skips_provider() {
        let provider = CountingProvider::default();

        let result = fetch_current(&provider, None, None).await;

        assert!(result.is_none());
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_current_collapses_errors_to_none() {
        let provider = CountingProvider::default();

        let result = fetch_current(&provider, Some("Nosuchcity"), None).await;

        assert!(result.is_none());
        assert_eq!(
            provider.calls.lock().unwrap().as_slice(),
            &[WeatherQuery::City("Nosuchcity".into())]
        );
    }

    #[tokio::test]
    async fn fetch_forecast_collapses_timeout_to_none() {
        let provider = CountingProvider::default();
        assert!(fetch_forecast(&provider, "Buxoro").await.is_none());
    }

    #[test]
    fn status_error_message_mentions_status() {
        let err = FetchError::Status { status: 401, body: "Invalid API key".into() };
        assert!(err.to_string().contains("401"));
    }
}

use crate::{
    Config,
    model::{CurrentConditions, ForecastSeries, LocationQuery},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod demo;
pub mod openweather;

/// Why a weather fetch failed. The taxonomy matters for user messaging:
/// an unknown city reads differently from a flaky network.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("location not found")]
    NotFound,

    #[error("rate limited by the weather provider")]
    RateLimited,

    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("provider request failed with status {status}: {body}")]
    Api { status: u16, body: String },
}

impl FetchError {
    /// Message surfaced to the user. Only two categories are distinguished
    /// at this boundary; everything transient reads the same.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::NotFound => "City not found. Please check the spelling and try again.",
            _ => "Failed to fetch weather data. Please try again.",
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions and the 5-day forecast for one location.
    async fn fetch_current_and_forecast(
        &self,
        query: &LocationQuery,
    ) -> Result<(CurrentConditions, ForecastSeries), FetchError>;
}

/// Construct the live provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `skycast configure` and enter your API key,\n\
             or set the OPENWEATHER_API_KEY environment variable."
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_gets_the_city_message() {
        assert!(FetchError::NotFound.user_message().contains("City not found"));
    }

    #[test]
    fn transient_failures_share_the_generic_message() {
        let msgs = [
            FetchError::RateLimited.user_message(),
            FetchError::Decode("bad json".into()).user_message(),
            FetchError::Api { status: 500, body: "boom".into() }.user_message(),
        ];
        for msg in msgs {
            assert_eq!(msg, "Failed to fetch weather data. Please try again.");
        }
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        // Only meaningful when the env override is absent.
        if std::env::var(crate::config::ENV_API_KEY).is_ok() {
            return;
        }

        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(err.to_string().contains("Hint: run `skycast configure`"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        assert!(provider_from_config(&cfg).is_ok());
    }
}

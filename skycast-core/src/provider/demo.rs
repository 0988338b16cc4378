use chrono::{Duration, Utc};
use tracing::debug;

use crate::model::{Condition, CurrentConditions, ForecastDay, ForecastSeries, LocationQuery};

use super::{FetchError, WeatherProvider};

/// Offline provider with fixed values, for running without a network or an
/// API key. Exists to exercise the rendering path; it is not a simulation.
#[derive(Debug, Clone, Default)]
pub struct DemoProvider;

impl DemoProvider {
    pub fn new() -> Self {
        Self
    }
}

const DEMO_DAYS: [(f64, f64, f64, Condition, &str); ForecastSeries::LEN] = [
    (19.0, 14.0, 23.0, Condition::Clear, "clear sky"),
    (17.5, 12.0, 21.0, Condition::Clouds, "scattered clouds"),
    (15.0, 11.0, 18.0, Condition::Rain, "light rain"),
    (16.5, 12.5, 20.0, Condition::Clouds, "broken clouds"),
    (20.0, 15.0, 24.0, Condition::Clear, "clear sky"),
];

#[async_trait::async_trait]
impl WeatherProvider for DemoProvider {
    async fn fetch_current_and_forecast(
        &self,
        query: &LocationQuery,
    ) -> Result<(CurrentConditions, ForecastSeries), FetchError> {
        let location_name = match query {
            LocationQuery::City(name) => name.clone(),
            LocationQuery::Coordinates { .. } => "Current Location".to_string(),
        };

        debug!(location = %location_name, "serving demo weather");

        let current = CurrentConditions {
            location_name,
            temperature_c: 21.4,
            feels_like_c: 20.1,
            humidity_pct: 56,
            pressure_hpa: 1016,
            wind_speed_mps: 4.7,
            visibility_m: 10_000,
            condition: Condition::Clouds,
            description: "scattered clouds".to_string(),
        };

        let now = Utc::now();
        let days = DEMO_DAYS
            .iter()
            .enumerate()
            .map(|(i, &(temp, min, max, condition, description))| ForecastDay {
                timestamp: now + Duration::days(i as i64 + 1),
                temp_c: temp,
                temp_min_c: min,
                temp_max_c: max,
                condition,
                description: description.to_string(),
            })
            .collect();

        let forecast =
            ForecastSeries::new(days).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok((current, forecast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_echoes_the_requested_city() {
        let (current, forecast) = DemoProvider::new()
            .fetch_current_and_forecast(&LocationQuery::City("Paris".to_string()))
            .await
            .unwrap();

        assert_eq!(current.location_name, "Paris");
        assert_eq!(forecast.days().len(), 5);
    }

    #[tokio::test]
    async fn demo_names_coordinate_queries_current_location() {
        let (current, _) = DemoProvider::new()
            .fetch_current_and_forecast(&LocationQuery::Coordinates { lat: 40.7, lon: -74.0 })
            .await
            .unwrap();

        assert_eq!(current.location_name, "Current Location");
    }

    #[tokio::test]
    async fn demo_forecast_timestamps_ascend_and_min_max_are_ordered() {
        let (_, forecast) = DemoProvider::new()
            .fetch_current_and_forecast(&LocationQuery::City("Oslo".to_string()))
            .await
            .unwrap();

        for pair in forecast.days().windows(2) {
            assert!(pair[1].timestamp > pair[0].timestamp);
        }
        for day in forecast.days() {
            assert!(day.temp_min_c <= day.temp_max_c);
        }
    }
}

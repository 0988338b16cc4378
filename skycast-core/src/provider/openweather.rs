use chrono::{DateTime, NaiveDate, Timelike, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::{collections::BTreeMap, time::Duration};
use tracing::debug;

use crate::model::{Condition, CurrentConditions, ForecastDay, ForecastSeries, LocationQuery};

use super::{FetchError, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reported when the API omits the field; matches what OpenWeather caps it at.
const DEFAULT_VISIBILITY_M: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, FetchError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, FetchError> {
        let http =
            Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(FetchError::Network)?;

        Ok(Self { api_key, http, base_url })
    }

    fn query_params(&self, query: &LocationQuery) -> Vec<(&'static str, String)> {
        let mut params = match query {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };

        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));
        params
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
    ) -> Result<T, FetchError> {
        let url = format!("{}{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::Network)?;

        check_status(status, &body)?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn fetch_current(&self, query: &LocationQuery) -> Result<CurrentConditions, FetchError> {
        let parsed: OwCurrentResponse = self.get_json("/data/2.5/weather", query).await?;

        let (condition, description) = primary_condition(&parsed.weather);

        Ok(CurrentConditions {
            location_name: parsed.name,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_mps: parsed.wind.speed,
            visibility_m: parsed.visibility.unwrap_or(DEFAULT_VISIBILITY_M),
            condition,
            description,
        })
    }

    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<ForecastSeries, FetchError> {
        let parsed: OwForecastResponse = self.get_json("/data/2.5/forecast", query).await?;

        aggregate_daily(&parsed.list, Utc::now())
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current_and_forecast(
        &self,
        query: &LocationQuery,
    ) -> Result<(CurrentConditions, ForecastSeries), FetchError> {
        debug!(?query, "fetching weather from OpenWeather");

        let current = self.fetch_current(query).await?;
        let forecast = self.fetch_forecast(query).await?;

        debug!(location = %current.location_name, "fetch complete");
        Ok((current, forecast))
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), FetchError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(FetchError::NotFound),
        StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
        s => Err(FetchError::Api { status: s.as_u16(), body: truncate_body(body) }),
    }
}

/// Collapse the 3-hourly forecast list into one record per future calendar
/// day: mean temperature, day-wide min/max, condition of the entry nearest
/// midday. Entries for today are discarded; the result covers the next
/// five days.
fn aggregate_daily(
    entries: &[OwForecastEntry],
    now: DateTime<Utc>,
) -> Result<ForecastSeries, FetchError> {
    let today = now.date_naive();

    let mut by_day: BTreeMap<NaiveDate, Vec<(DateTime<Utc>, &OwForecastEntry)>> = BTreeMap::new();
    for entry in entries {
        let Some(ts) = unix_to_utc(entry.dt) else { continue };
        let date = ts.date_naive();
        if date > today {
            by_day.entry(date).or_default().push((ts, entry));
        }
    }

    let mut days = Vec::with_capacity(ForecastSeries::LEN);
    for (_, group) in by_day.into_iter().take(ForecastSeries::LEN) {
        let count = group.len() as f64;
        let temp_c = group.iter().map(|(_, e)| e.main.temp).sum::<f64>() / count;
        let temp_min_c =
            group.iter().map(|(_, e)| e.main.temp_min).fold(f64::INFINITY, f64::min);
        let temp_max_c =
            group.iter().map(|(_, e)| e.main.temp_max).fold(f64::NEG_INFINITY, f64::max);

        // The entry closest to midday is the most representative of the day.
        let (ts, midday) = group
            .iter()
            .min_by_key(|(ts, _)| (i64::from(ts.hour()) - 12).abs())
            .copied()
            .ok_or_else(|| FetchError::Decode("empty forecast day group".to_string()))?;

        let (condition, description) = primary_condition(&midday.weather);

        days.push(ForecastDay { timestamp: ts, temp_c, temp_min_c, temp_max_c, condition, description });
    }

    ForecastSeries::new(days).map_err(|e| FetchError::Decode(e.to_string()))
}

fn primary_condition(weather: &[OwWeather]) -> (Condition, String) {
    weather
        .first()
        .map(|w| (Condition::from_api(&w.main), w.description.clone()))
        .unwrap_or((Condition::Unknown, "unknown".to_string()))
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back up to a char boundary so multi-byte bodies can't split a codepoint.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}

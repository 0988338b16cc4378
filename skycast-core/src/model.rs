use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse weather category reported by the provider, used to pick a display glyph.
///
/// Provider codes outside the known set collapse into [`Condition::Unknown`],
/// which renders with the default glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
    Dust,
    Smoke,
    #[serde(other)]
    Unknown,
}

impl Condition {
    /// Parse a provider condition code (e.g. OpenWeather's `weather[0].main`).
    pub fn from_api(code: &str) -> Self {
        match code {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Rain" => Condition::Rain,
            "Drizzle" => Condition::Drizzle,
            "Thunderstorm" => Condition::Thunderstorm,
            "Snow" => Condition::Snow,
            "Mist" => Condition::Mist,
            "Fog" => Condition::Fog,
            "Haze" => Condition::Haze,
            "Dust" => Condition::Dust,
            "Smoke" => Condition::Smoke,
            _ => Condition::Unknown,
        }
    }

    /// Fixed glyph table; unrecognized conditions get the default glyph.
    pub const fn glyph(self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::Clouds => "☁️",
            Condition::Rain => "🌧️",
            Condition::Drizzle => "🌦️",
            Condition::Thunderstorm => "⛈️",
            Condition::Snow => "❄️",
            Condition::Mist | Condition::Fog | Condition::Haze | Condition::Smoke => "🌫️",
            Condition::Dust => "🌪️",
            Condition::Unknown => "🌤️",
        }
    }

    pub const fn all_known() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::Clouds,
            Condition::Rain,
            Condition::Drizzle,
            Condition::Thunderstorm,
            Condition::Snow,
            Condition::Mist,
            Condition::Fog,
            Condition::Haze,
            Condition::Dust,
            Condition::Smoke,
        ]
    }
}

/// What to ask the provider for: a coordinate pair from geolocation,
/// or a city name typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { lat: f64, lon: f64 },
    City(String),
}

impl LocationQuery {
    /// Build a city query from raw user input.
    ///
    /// Input is trimmed; returns `None` for whitespace-only input so the
    /// caller can skip the fetch entirely rather than surface an error.
    pub fn from_city_input(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() { None } else { Some(LocationQuery::City(trimmed.to_string())) }
    }
}

/// Current conditions for one location, replaced wholesale on every fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    pub visibility_m: u32,
    pub condition: Condition,
    pub description: String,
}

/// One day of the 5-day outlook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub timestamp: DateTime<Utc>,
    pub temp_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub condition: Condition,
    pub description: String,
}

/// Exactly five [`ForecastDay`] records in strictly ascending timestamp order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSeries(Vec<ForecastDay>);

impl ForecastSeries {
    pub const LEN: usize = 5;

    pub fn new(days: Vec<ForecastDay>) -> Result<Self> {
        if days.len() != Self::LEN {
            bail!("forecast series must contain exactly {} days, got {}", Self::LEN, days.len());
        }

        for pair in days.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                bail!(
                    "forecast timestamps must be strictly ascending: {} does not follow {}",
                    pair[1].timestamp,
                    pair[0].timestamp
                );
            }
        }

        Ok(Self(days))
    }

    pub fn days(&self) -> &[ForecastDay] {
        &self.0
    }
}

//! Pure rendering: app state in, displayable text out. No I/O here.

use crate::model::{CurrentConditions, ForecastSeries};
use crate::state::{AppState, LoadState};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Render whatever the current state calls for: a loading line, the stored
/// error message, or the full weather display. Idle renders nothing.
pub fn render(state: &AppState) -> String {
    match state.load_state() {
        LoadState::Idle => String::new(),
        LoadState::Loading => "Loading weather data...".to_string(),
        LoadState::Error => state.error().unwrap_or_default().to_string(),
        LoadState::Success => match state.weather() {
            Some((current, forecast)) => {
                format!("{}\n{}", render_current(current), render_forecast(forecast))
            }
            None => String::new(),
        },
    }
}

pub fn render_current(current: &CurrentConditions) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", current.location_name);
    let _ = writeln!(
        out,
        "{}  {}°C  {}",
        current.condition.glyph(),
        current.temperature_c.round(),
        current.description
    );
    let _ = writeln!(out, "Feels like {}°C", current.feels_like_c.round());
    let _ = writeln!(out, "💧 Humidity    {}%", current.humidity_pct);
    let _ = writeln!(out, "🌬️ Wind Speed  {} m/s", current.wind_speed_mps);
    let _ = writeln!(out, "📊 Pressure    {} hPa", current.pressure_hpa);
    let _ = writeln!(out, "👁️ Visibility  {} km", current.visibility_m / 1000);

    out
}

pub fn render_forecast(forecast: &ForecastSeries) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "5-Day Forecast");
    for day in forecast.days() {
        let _ = writeln!(
            out,
            "{}  {}  {}° / {}°  {}",
            format_date(day.timestamp),
            day.condition.glyph(),
            day.temp_max_c.round(),
            day.temp_min_c.round(),
            day.description
        );
    }

    out
}

/// Short weekday, month and day, e.g. "Mon, Aug 25".
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%a, %b %-d").to_string()
}

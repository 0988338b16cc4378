use anyhow::Context;
use clap::{Parser, Subcommand};
use skycast_core::{
    AppState, Config, LocationQuery, WeatherProvider,
    location::{self, IpApiGeolocator},
    provider::{demo::DemoProvider, provider_from_config},
    view,
};
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current conditions and the 5-day forecast once.
    Show {
        /// City name; when absent, geolocation decides, falling back to the
        /// default city.
        city: Option<String>,

        /// Latitude; use together with --lon to skip geolocation.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude; use together with --lat.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Use the offline demo provider (no API key needed).
        #[arg(long)]
        demo: bool,
    },

    /// Repeatedly prompt for city names and show each result.
    Interactive {
        /// Use the offline demo provider (no API key needed).
        #[arg(long)]
        demo: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon, demo } => show(city, lat.zip(lon), demo).await,
            Command::Interactive { demo } => interactive(demo).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn select_provider(config: &Config, demo: bool) -> anyhow::Result<Box<dyn WeatherProvider>> {
    if demo { Ok(Box::new(DemoProvider::new())) } else { provider_from_config(config) }
}

/// Startup location: geolocate once, fall back to the configured default city.
async fn startup_query(config: &Config) -> LocationQuery {
    let query = match IpApiGeolocator::new() {
        Ok(locator) => location::resolve(&locator, config.fallback_city()).await,
        Err(_) => LocationQuery::City(config.fallback_city().to_string()),
    };
    debug!(?query, "startup location resolved");
    query
}

/// Run one fetch through the state machine, printing each observable phase.
async fn submit(state: &mut AppState, provider: &dyn WeatherProvider, query: LocationQuery) {
    let id = state.begin_fetch();
    println!("{}", view::render(state));

    let result = provider.fetch_current_and_forecast(&query).await;
    if state.complete(id, result) {
        println!("{}", view::render(state));
    }
}

async fn show(city: Option<String>, coords: Option<(f64, f64)>, demo: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = select_provider(&config, demo)?;

    let query = if let Some((lat, lon)) = coords {
        LocationQuery::Coordinates { lat, lon }
    } else if let Some(input) = city {
        match LocationQuery::from_city_input(&input) {
            Some(query) => query,
            // Blank input is a no-op, not an error.
            None => return Ok(()),
        }
    } else {
        startup_query(&config).await
    };

    let mut state = AppState::new();
    submit(&mut state, provider.as_ref(), query).await;
    Ok(())
}

async fn interactive(demo: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = select_provider(&config, demo)?;
    let mut state = AppState::new();

    // Startup mirrors a fresh page load: geolocate, fall back to the default city.
    submit(&mut state, provider.as_ref(), startup_query(&config).await).await;

    loop {
        let input = match inquire::Text::new("City (empty keeps current, Esc quits):").prompt() {
            Ok(input) => input,
            Err(
                inquire::InquireError::OperationCanceled
                | inquire::InquireError::OperationInterrupted,
            ) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        match LocationQuery::from_city_input(&input) {
            Some(query) => submit(&mut state, provider.as_ref(), query).await,
            // Blank submits leave the previous display untouched.
            None => continue,
        }
    }

    Ok(())
}

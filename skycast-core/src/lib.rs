//! Core library for the `skycast` weather tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution with a default-city fallback
//! - The weather provider abstraction and its OpenWeather client
//! - The app state machine and text rendering
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod location;
pub mod model;
pub mod provider;
pub mod state;
pub mod view;

pub use config::{Config, ProviderConfig};
pub use location::{DEFAULT_CITY, GeolocationError, Geolocator, IpApiGeolocator};
pub use model::{Condition, CurrentConditions, ForecastDay, ForecastSeries, LocationQuery};
pub use provider::{FetchError, WeatherProvider, provider_from_config};
pub use state::{AppState, LoadState, RequestId};

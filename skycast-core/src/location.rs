use crate::model::LocationQuery;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// City used when geolocation is denied or unavailable.
pub const DEFAULT_CITY: &str = "New York";

const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("geolocation request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("geolocation service unavailable: {0}")]
    Unavailable(String),
}

/// One-shot "get current position" capability.
///
/// A single request, no retry, no tracking. Implementations decide what
/// "position" means for the platform they run on.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<(f64, f64), GeolocationError>;
}

/// Geolocates via the caller's public IP using the ip-api.com service.
#[derive(Debug, Clone)]
pub struct IpApiGeolocator {
    http: Client,
    base_url: String,
}

impl IpApiGeolocator {
    pub fn new() -> Result<Self, GeolocationError> {
        Self::with_base_url("http://ip-api.com".to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self, GeolocationError> {
        let http = Client::builder().timeout(GEOLOCATION_TIMEOUT).build()?;
        Ok(Self { http, base_url })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl Geolocator for IpApiGeolocator {
    async fn current_position(&self) -> Result<(f64, f64), GeolocationError> {
        let url = format!("{}/json", self.base_url);

        let parsed: IpApiResponse = self
            .http
            .get(&url)
            .query(&[("fields", "status,lat,lon")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if parsed.status != "success" {
            return Err(GeolocationError::Unavailable(format!(
                "ip-api reported status '{}'",
                parsed.status
            )));
        }

        match (parsed.lat, parsed.lon) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(GeolocationError::Unavailable(
                "ip-api response missing coordinates".to_string(),
            )),
        }
    }
}

/// Resolve where to fetch weather for, best effort.
///
/// Attempts geolocation exactly once; any failure silently falls back to
/// `fallback_city`. Denial is not an error the user ever sees.
pub async fn resolve(geolocator: &dyn Geolocator, fallback_city: &str) -> LocationQuery {
    match geolocator.current_position().await {
        Ok((lat, lon)) => {
            debug!(lat, lon, "geolocation succeeded");
            LocationQuery::Coordinates { lat, lon }
        }
        Err(err) => {
            debug!(error = %err, fallback_city, "geolocation unavailable, using fallback city");
            LocationQuery::City(fallback_city.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGeolocator(f64, f64);

    #[async_trait]
    impl Geolocator for FixedGeolocator {
        async fn current_position(&self) -> Result<(f64, f64), GeolocationError> {
            Ok((self.0, self.1))
        }
    }

    struct DeniedGeolocator;

    #[async_trait]
    impl Geolocator for DeniedGeolocator {
        async fn current_position(&self) -> Result<(f64, f64), GeolocationError> {
            Err(GeolocationError::Unavailable("permission denied".to_string()))
        }
    }

    #[tokio::test]
    async fn resolve_yields_coordinates_on_success() {
        let query = resolve(&FixedGeolocator(48.8566, 2.3522), DEFAULT_CITY).await;
        assert_eq!(query, LocationQuery::Coordinates { lat: 48.8566, lon: 2.3522 });
    }

    #[tokio::test]
    async fn resolve_falls_back_to_default_city_on_denial() {
        let query = resolve(&DeniedGeolocator, DEFAULT_CITY).await;
        assert_eq!(query, LocationQuery::City("New York".to_string()));
    }

    #[tokio::test]
    async fn ip_api_unreachable_maps_to_network_error() {
        // Reserved TEST-NET-1 address, nothing listens there.
        let locator = IpApiGeolocator::with_base_url("http://192.0.2.1:9".to_string()).unwrap();
        let err = locator.current_position().await.unwrap_err();
        assert!(matches!(err, GeolocationError::Network(_)));
    }
}

use crate::config::GeocoderSettings;
use crate::models::{Account, Coordinates, LocatedPoint};
use reqwest::{header::USER_AGENT, Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while geocoding
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoder unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Free-text place description to coordinates
pub trait Geocoder {
    /// `Ok(None)` when the service has no match for `query`
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Coordinates>, GeocodeError>> + Send;
}

/// Resolve an account's self-reported location
///
/// Any geocoding failure is treated like "no match": the account is simply
/// not placed on the map.
pub async fn locate<G: Geocoder>(geocoder: &G, account: &Account) -> Option<LocatedPoint> {
    if account.location().trim().is_empty() {
        return None;
    }

    match geocoder.geocode(account.location()).await {
        Ok(Some(coordinates)) => Some(LocatedPoint {
            name: account.screen_name.clone(),
            coordinates,
        }),
        Ok(None) => {
            tracing::debug!("No match for @{} location {:?}", account.screen_name, account.location());
            None
        }
        Err(e) => {
            tracing::warn!("Skipping @{}: {}", account.screen_name, e);
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Nominatim (OpenStreetMap) search client
pub struct NominatimClient {
    endpoint: String,
    user_agent: String,
    client: Client,
}

impl NominatimClient {
    pub fn new(
        endpoint: impl Into<String>,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
            client,
        })
    }

    pub fn from_settings(settings: &GeocoderSettings) -> Result<Self, GeocodeError> {
        Self::new(
            settings.endpoint.clone(),
            settings.user_agent.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// First search hit for `query`
    pub async fn search(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        if query.trim().is_empty() {
            return Ok(None);
        }

        let url = format!("{}/search", self.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    GeocodeError::Unavailable(e.to_string())
                } else {
                    GeocodeError::RequestError(e)
                }
            })?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::Unavailable(format!("search returned {}", status)));
        }
        if !status.is_success() {
            return Err(GeocodeError::InvalidResponse(format!("search returned {}", status)));
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude {:?}", place.lat)))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude {:?}", place.lon)))?;

        Ok(Some(Coordinates::new(latitude, longitude)))
    }
}

impl Geocoder for NominatimClient {
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Coordinates>, GeocodeError>> + Send {
        self.search(query)
    }
}

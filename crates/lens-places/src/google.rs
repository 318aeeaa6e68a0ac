//! Google Places Nearby Search client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

use lens_core::{defaults, Coordinates, Error, PlaceCandidate, Result};

use crate::provider::PlacesProvider;

/// Configuration for the Google Places client.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// Full Nearby Search endpoint URL.
    pub base_url: String,
    /// API key; requests fail with a configuration error without one.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::PLACES_URL.to_string(),
            api_key: None,
            timeout: defaults::HTTP_TIMEOUT,
        }
    }
}

impl PlacesConfig {
    /// Load from `GOOGLE_PLACES_API_KEY`, `GOOGLE_PLACES_URL` and
    /// `LENS_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(defaults::ENV_PLACES_URL)
                .unwrap_or_else(|_| defaults::PLACES_URL.to_string()),
            api_key: std::env::var(defaults::ENV_PLACES_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty()),
            timeout: defaults::http_timeout_from_env(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Places base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Places provider backed by the Google Places Nearby Search API.
pub struct GooglePlacesClient {
    client: Client,
    config: PlacesConfig,
}

impl GooglePlacesClient {
    pub fn new(config: PlacesConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(PlacesConfig::from_env())
    }

    pub fn config(&self) -> &PlacesConfig {
        &self.config
    }
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlaceResult {
    name: Option<String>,
    geometry: Option<Geometry>,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    opening_hours: Option<OpeningHours>,
    place_id: Option<String>,
    types: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LatLng {
    lat: Option<f64>,
    lng: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpeningHours {
    open_now: Option<bool>,
}

impl From<PlaceResult> for PlaceCandidate {
    fn from(r: PlaceResult) -> Self {
        let coordinates = r
            .geometry
            .and_then(|g| g.location)
            .and_then(|l| match (l.lat, l.lng) {
                (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
                _ => None,
            });
        let map_url = r
            .place_id
            .as_ref()
            .map(|id| format!("https://www.google.com/maps/place/?q=place_id:{}", id));

        PlaceCandidate {
            name: r.name.unwrap_or_else(|| "Unknown".to_string()),
            coordinates,
            address: r.vicinity.or(r.formatted_address),
            rating: r.rating,
            rating_count: r.user_ratings_total,
            distance_m: None,
            open_now: r.opening_hours.and_then(|h| h.open_now),
            external_id: r.place_id,
            categories: r.types.unwrap_or_default(),
            map_url,
        }
    }
}

/// Parse a Nearby Search body, skipping individual malformed results.
fn parse_nearby_response(body: NearbySearchResponse) -> Result<Vec<PlaceCandidate>> {
    match body.status.as_deref() {
        None | Some("OK") | Some("ZERO_RESULTS") => {}
        Some(status) => {
            return Err(Error::Request(format!(
                "Places API status {}: {}",
                status,
                body.error_message.unwrap_or_default()
            )));
        }
    }

    let mut places = Vec::with_capacity(body.results.len());
    for raw in body.results {
        match serde_json::from_value::<PlaceResult>(raw) {
            Ok(result) => places.push(PlaceCandidate::from(result)),
            Err(e) => trace!(error = %e, "Skipping malformed place result"),
        }
    }
    Ok(places)
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn nearby_search(
        &self,
        at: Coordinates,
        radius_m: u32,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} not set", defaults::ENV_PLACES_API_KEY)))?;

        let location = format!("{},{}", at.lat, at.lng);
        let radius = radius_m.to_string();
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("key", api_key),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", category),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus { status, body });
        }

        let body: NearbySearchResponse = response.json().await?;
        let places = parse_nearby_response(body)?;
        debug!(category, result_count = places.len(), "Places search complete");
        Ok(places)
    }

    fn name(&self) -> &str {
        "google_places"
    }
}

//! Ticketmaster Discovery API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

use lens_core::{defaults, Coordinates, Error, EventCandidate, Result};

use crate::provider::EventsProvider;

#[derive(Debug, Clone)]
pub struct EventsConfig {
    /// Full `events.json` endpoint URL.
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::EVENTS_URL.to_string(),
            api_key: None,
            timeout: defaults::HTTP_TIMEOUT,
        }
    }
}

impl EventsConfig {
    /// Load from `TICKETMASTER_API_KEY`, `TICKETMASTER_URL` and
    /// `LENS_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(defaults::ENV_EVENTS_URL)
                .unwrap_or_else(|_| defaults::EVENTS_URL.to_string()),
            api_key: std::env::var(defaults::ENV_EVENTS_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty()),
            timeout: defaults::http_timeout_from_env(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Events base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Events provider backed by the Ticketmaster Discovery API.
pub struct TicketmasterClient {
    client: Client,
    config: EventsConfig,
}

impl TicketmasterClient {
    pub fn new(config: EventsConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(EventsConfig::from_env())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DiscoveryResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<EmbeddedEvents>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EmbeddedEvents {
    events: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEvent {
    name: Option<String>,
    url: Option<String>,
    /// Distance from the query point in the requested unit (km).
    distance: Option<f64>,
    dates: Option<Dates>,
    classifications: Vec<Classification>,
    #[serde(rename = "_embedded")]
    embedded: Option<EmbeddedVenues>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Dates {
    start: Option<Start>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Start {
    date_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Classification {
    segment: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EmbeddedVenues {
    venues: Vec<Venue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Venue {
    name: Option<String>,
    address: Option<VenueAddress>,
    city: Option<Named>,
    state: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VenueAddress {
    line1: Option<String>,
}

impl Venue {
    /// `line1, city, state` with missing parts left out.
    fn address(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.address.as_ref().and_then(|a| a.line1.as_deref()),
            self.city.as_ref().and_then(|c| c.name.as_deref()),
            self.state.as_ref().and_then(|s| s.name.as_deref()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

impl From<RawEvent> for EventCandidate {
    fn from(e: RawEvent) -> Self {
        let venue = e.embedded.and_then(|v| v.venues.into_iter().next());
        let distance_m = e
            .distance
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|km| (km * 1000.0).min(u32::MAX as f64) as u32);

        EventCandidate {
            name: e.name.unwrap_or_else(|| "Event".to_string()),
            start_time: e.dates.and_then(|d| d.start).and_then(|s| s.date_time),
            venue: venue.as_ref().and_then(|v| v.name.clone()),
            address: venue.as_ref().and_then(Venue::address),
            distance_m,
            category: e
                .classifications
                .into_iter()
                .next()
                .and_then(|c| c.segment)
                .and_then(|s| s.name),
            url: e.url,
        }
    }
}

fn parse_discovery_response(body: DiscoveryResponse) -> Vec<EventCandidate> {
    let raw = body.embedded.map(|e| e.events).unwrap_or_default();
    let mut events = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value::<RawEvent>(value) {
            Ok(event) => events.push(EventCandidate::from(event)),
            Err(e) => trace!(error = %e, "Skipping malformed event"),
        }
    }
    events
}

#[async_trait]
impl EventsProvider for TicketmasterClient {
    async fn search_events(
        &self,
        at: Coordinates,
        radius_km: u32,
        size: usize,
    ) -> Result<Vec<EventCandidate>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} not set", defaults::ENV_EVENTS_API_KEY)))?;

        let latlong = format!("{},{}", at.lat, at.lng);
        let radius = radius_km.to_string();
        let size = size.to_string();
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("apikey", api_key),
                ("latlong", latlong.as_str()),
                ("radius", radius.as_str()),
                ("unit", "km"),
                ("size", size.as_str()),
                ("sort", "date,asc"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus { status, body });
        }

        let body: DiscoveryResponse = response.json().await?;
        let events = parse_discovery_response(body);
        debug!(result_count = events.len(), "Events search complete");
        Ok(events)
    }

    fn name(&self) -> &str {
        "ticketmaster"
    }
}

//! Nearby suggestion aggregation.
//!
//! Place suggestions fan out one query per category, join them, fill in
//! distances, then deduplicate, score and truncate. Every upstream result
//! is cached for ten minutes under a key built from the category, the
//! coordinates rounded to four decimals and the radius. Requests racing on
//! the same key make one upstream call between them.
//!
//! Nothing here returns an error: a missing key, a network failure, a
//! timeout or a non-success status turns that one sub-result into an empty
//! list and is logged at WARN.

use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use lens_core::defaults::{
    EVENTS_FETCH_SIZE, EVENTS_RADIUS_KM, EXTERNAL_API_CACHE_TTL, FOOD_CATEGORIES,
    LANDMARK_CATEGORIES, PLACES_RADIUS_M, SUGGESTION_LIMIT,
};
use lens_core::{
    Coordinates, Deadline, EphemeralCache, Error, EventCandidate, PlaceCandidate, Result,
};

use crate::dedup::dedupe_events;
use crate::geo::{coord_key, distance_m};
use crate::provider::{EventsProvider, PlacesProvider};
use crate::scoring::rank_places;

/// Nearby place query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub coordinates: Coordinates,
    pub radius_m: u32,
    pub max_results: usize,
}

impl NearbyQuery {
    /// Query with the default radius (1500 m) and result count (6).
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            radius_m: PLACES_RADIUS_M,
            max_results: SUGGESTION_LIMIT,
        }
    }

    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Nearby event query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventQuery {
    pub coordinates: Coordinates,
    pub radius_km: u32,
    pub max_results: usize,
}

impl EventQuery {
    /// Query with the default radius (20 km) and result count (6).
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            radius_km: EVENTS_RADIUS_KM,
            max_results: SUGGESTION_LIMIT,
        }
    }

    pub fn with_radius_km(mut self, radius_km: u32) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Cache key for one category fetch.
pub fn places_cache_key(category: &str, at: Coordinates, radius_m: u32) -> String {
    format!("places:{}:{}:{}", category, coord_key(at), radius_m)
}

/// Cache key for one events fetch.
pub fn events_cache_key(at: Coordinates, radius_km: u32) -> String {
    format!("events:{}:{}", coord_key(at), radius_km)
}

/// Merges, ranks and caches suggestions from the places and events APIs.
pub struct SuggestionAggregator {
    places: Arc<dyn PlacesProvider>,
    events: Arc<dyn EventsProvider>,
    cache: EphemeralCache,
    call_timeout: Duration,
}

impl SuggestionAggregator {
    pub fn new(
        places: Arc<dyn PlacesProvider>,
        events: Arc<dyn EventsProvider>,
        cache: EphemeralCache,
    ) -> Self {
        Self {
            places,
            events,
            cache,
            call_timeout: lens_core::defaults::HTTP_TIMEOUT,
        }
    }

    /// Override the per-call timeout (default 8 s). The request deadline
    /// still bounds it.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Ranked tourist attractions, museums and parks.
    pub async fn get_nearby_landmarks(
        &self,
        query: &NearbyQuery,
        deadline: Deadline,
    ) -> Vec<PlaceCandidate> {
        self.nearby(&LANDMARK_CATEGORIES, query, deadline, "nearby_landmarks")
            .await
    }

    /// Ranked restaurants, cafes and bakeries.
    pub async fn get_nearby_food(
        &self,
        query: &NearbyQuery,
        deadline: Deadline,
    ) -> Vec<PlaceCandidate> {
        self.nearby(&FOOD_CATEGORIES, query, deadline, "nearby_food")
            .await
    }

    /// Upcoming events in upstream date order, deduplicated.
    pub async fn get_nearby_events(
        &self,
        query: &EventQuery,
        deadline: Deadline,
    ) -> Vec<EventCandidate> {
        let start = Instant::now();
        let key = events_cache_key(query.coordinates, query.radius_km);

        let size = query.max_results.max(EVENTS_FETCH_SIZE);
        let timeout = deadline.bound(self.call_timeout);
        let fetched = bounded(
            timeout,
            self.cache
                .get_or_try_insert_with(&key, EXTERNAL_API_CACHE_TTL, || async {
                    let events = self
                        .events
                        .search_events(query.coordinates, query.radius_km, size)
                        .await?;
                    Ok::<_, Error>(dedupe_events(events))
                }),
        )
        .await;

        let events = match fetched {
            Ok(lookup) => lookup.into_value(),
            Err(e) => {
                warn!(
                    subsystem = "events",
                    provider = self.events.name(),
                    error = %e,
                    "Events fetch failed, returning empty list"
                );
                Vec::new()
            }
        };

        let mut events = events;
        events.truncate(query.max_results);
        info!(
            subsystem = "events",
            op = "nearby_events",
            result_count = events.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Nearby events complete"
        );
        events
    }

    async fn nearby(
        &self,
        categories: &[&str],
        query: &NearbyQuery,
        deadline: Deadline,
        op: &'static str,
    ) -> Vec<PlaceCandidate> {
        let start = Instant::now();

        let fetches = categories
            .iter()
            .map(|category| self.fetch_category(category, query, deadline));
        let mut merged: Vec<PlaceCandidate> = join_all(fetches).await.into_iter().flatten().collect();

        for place in &mut merged {
            place.distance_m = place
                .coordinates
                .map(|at| distance_m(query.coordinates, at));
        }

        let ranked = rank_places(merged, query.radius_m, query.max_results);
        info!(
            subsystem = "places",
            op,
            result_count = ranked.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Nearby places complete"
        );
        ranked
    }

    /// One category, served from cache when possible. Concurrent misses on
    /// the same key share one upstream call. Failures degrade to an empty
    /// list and are not cached.
    async fn fetch_category(
        &self,
        category: &str,
        query: &NearbyQuery,
        deadline: Deadline,
    ) -> Vec<PlaceCandidate> {
        let key = places_cache_key(category, query.coordinates, query.radius_m);
        let timeout = deadline.bound(self.call_timeout);
        let fetched = bounded(
            timeout,
            self.cache
                .get_or_try_insert_with(&key, EXTERNAL_API_CACHE_TTL, || {
                    self.places
                        .nearby_search(query.coordinates, query.radius_m, category)
                }),
        )
        .await;

        match fetched {
            Ok(lookup) => {
                debug!(
                    subsystem = "places",
                    category,
                    cache_hit = !lookup.is_fresh(),
                    result_count = lookup.value().len(),
                    "Category fetched"
                );
                lookup.into_value()
            }
            Err(e) => {
                warn!(
                    subsystem = "places",
                    provider = self.places.name(),
                    category,
                    error = %e,
                    "Places fetch failed, returning empty list"
                );
                Vec::new()
            }
        }
    }
}

/// Run an external call under a timeout, mapping elapsed to
/// [`Error::Timeout`].
async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(timeout.as_millis() as u64)),
    }
}

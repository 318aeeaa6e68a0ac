//! External suggestion sources.

use async_trait::async_trait;
use lens_core::{Coordinates, EventCandidate, PlaceCandidate, Result};

/// Category-scoped nearby place search.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Places of one category around `at`.
    ///
    /// Returned candidates carry coordinates when known; distances are filled
    /// in by the caller.
    async fn nearby_search(
        &self,
        at: Coordinates,
        radius_m: u32,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// Radius-scoped event search, results in upstream date order.
#[async_trait]
pub trait EventsProvider: Send + Sync {
    async fn search_events(
        &self,
        at: Coordinates,
        radius_km: u32,
        size: usize,
    ) -> Result<Vec<EventCandidate>>;

    fn name(&self) -> &str;
}

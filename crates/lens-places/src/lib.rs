//! # lens-places
//!
//! Nearby place and event suggestions for landmark-lens.
//!
//! This crate provides:
//! - Provider traits for category-scoped place search and radius-scoped
//!   event search
//! - Google Places and Ticketmaster clients implementing them
//! - Haversine distances and rounded coordinate cache keys
//! - Place scoring, deduplication and ranking
//! - [`SuggestionAggregator`], which fans out per-category queries, caches
//!   each upstream result and degrades failures to empty lists
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lens_core::{Coordinates, Deadline, EphemeralCache};
//! use lens_places::{GooglePlacesClient, NearbyQuery, SuggestionAggregator, TicketmasterClient};
//!
//! #[tokio::main]
//! async fn main() -> lens_core::Result<()> {
//!     let aggregator = SuggestionAggregator::new(
//!         Arc::new(GooglePlacesClient::from_env()?),
//!         Arc::new(TicketmasterClient::from_env()?),
//!         EphemeralCache::from_env(),
//!     );
//!     let query = NearbyQuery::new(Coordinates::new(48.8584, 2.2945));
//!     let landmarks = aggregator.get_nearby_landmarks(&query, Deadline::none()).await;
//!     println!("{} landmarks nearby", landmarks.len());
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod dedup;
pub mod geo;
pub mod google;
pub mod provider;
pub mod scoring;
pub mod ticketmaster;

pub use aggregator::{
    events_cache_key, places_cache_key, EventQuery, NearbyQuery, SuggestionAggregator,
};
pub use dedup::{dedupe_events, dedupe_places, EventKey, PlaceKey};
pub use geo::{coord_key, distance_m, haversine_m};
pub use google::{GooglePlacesClient, PlacesConfig};
pub use provider::{EventsProvider, PlacesProvider};
pub use scoring::{rank_places, score_place, ScoreWeights};
pub use ticketmaster::{EventsConfig, TicketmasterClient};

//! Identity keys and first-seen deduplication for suggestions.
//!
//! Category queries overlap (a museum is often also a tourist attraction),
//! and the events API returns the same show more than once. Deduplication
//! keeps the first occurrence and preserves input order.

use std::collections::HashSet;

use lens_core::{EventCandidate, PlaceCandidate};

/// Identity of a place: external id, falling back to name + address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlaceKey {
    External(String),
    NameAddress(String, Option<String>),
}

impl PlaceKey {
    pub fn of(place: &PlaceCandidate) -> Self {
        match place.external_id.as_deref() {
            Some(id) if !id.is_empty() => Self::External(id.to_string()),
            _ => Self::NameAddress(place.name.clone(), place.address.clone()),
        }
    }
}

/// Identity of an event: lower-cased name and venue plus the start date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub name: String,
    pub venue: String,
    pub date: String,
}

impl EventKey {
    pub fn of(event: &EventCandidate) -> Self {
        Self {
            name: event.name.trim().to_lowercase(),
            venue: event
                .venue
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
            date: event
                .start_time
                .as_deref()
                .and_then(date_part)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// `YYYY-MM-DD` part of an ISO-8601 date-time, if it has a time part.
fn date_part(start_time: &str) -> Option<&str> {
    start_time.split_once('T').map(|(date, _)| date)
}

/// Drop places whose identity key was already seen.
pub fn dedupe_places(places: Vec<PlaceCandidate>) -> Vec<PlaceCandidate> {
    let mut seen = HashSet::new();
    places
        .into_iter()
        .filter(|p| seen.insert(PlaceKey::of(p)))
        .collect()
}

/// Drop events whose identity key was already seen.
pub fn dedupe_events(events: Vec<EventCandidate>) -> Vec<EventCandidate> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|e| seen.insert(EventKey::of(e)))
        .collect()
}

//! Scripted providers for aggregator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use lens_core::{Coordinates, Error, EventCandidate, PlaceCandidate, Result};
use lens_places::{EventsProvider, PlacesProvider};

/// What a scripted provider does for one category.
#[derive(Clone)]
pub enum Script<T> {
    Return(Vec<T>),
    Fail,
    Hang(Duration),
    /// Answer after a delay.
    Slow(Duration, Vec<T>),
}

/// Places provider answering from a per-category script.
pub struct ScriptedPlaces {
    scripts: HashMap<String, Script<PlaceCandidate>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedPlaces {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, category: &str, script: Script<PlaceCandidate>) -> Self {
        self.scripts.insert(category.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PlacesProvider for ScriptedPlaces {
    async fn nearby_search(
        &self,
        _at: Coordinates,
        _radius_m: u32,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>> {
        self.calls.lock().unwrap().push(category.to_string());
        match self.scripts.get(category).cloned() {
            Some(Script::Return(places)) => Ok(places),
            Some(Script::Fail) => Err(Error::UpstreamStatus {
                status: 503,
                body: "unavailable".to_string(),
            }),
            Some(Script::Hang(d)) => {
                tokio::time::sleep(d).await;
                Ok(Vec::new())
            }
            Some(Script::Slow(d, places)) => {
                tokio::time::sleep(d).await;
                Ok(places)
            }
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Events provider returning one scripted answer.
pub struct ScriptedEvents {
    script: Script<EventCandidate>,
    calls: AtomicUsize,
    last_size: AtomicUsize,
}

impl ScriptedEvents {
    pub fn new(script: Script<EventCandidate>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_size: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Script::Return(Vec::new()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_size(&self) -> usize {
        self.last_size.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventsProvider for ScriptedEvents {
    async fn search_events(
        &self,
        _at: Coordinates,
        _radius_km: u32,
        size: usize,
    ) -> Result<Vec<EventCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_size.store(size, Ordering::SeqCst);
        match &self.script {
            Script::Return(events) => Ok(events.clone()),
            Script::Fail => Err(Error::Config("TICKETMASTER_API_KEY not set".to_string())),
            Script::Hang(d) => {
                tokio::time::sleep(*d).await;
                Ok(Vec::new())
            }
            Script::Slow(d, events) => {
                tokio::time::sleep(*d).await;
                Ok(events.clone())
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn place(id: &str, name: &str, at: Option<Coordinates>, rating: Option<f64>) -> PlaceCandidate {
    PlaceCandidate {
        name: name.to_string(),
        external_id: Some(id.to_string()),
        coordinates: at,
        rating,
        ..Default::default()
    }
}

pub fn event(name: &str, venue: &str, start: &str) -> EventCandidate {
    EventCandidate {
        name: name.to_string(),
        venue: Some(venue.to_string()),
        start_time: Some(start.to_string()),
        ..Default::default()
    }
}

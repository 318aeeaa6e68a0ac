//! In-memory scan history for stats tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use lens_core::{Error, NewScan, Result, ScanHistoryStore, ScanRecord};

/// Scan history keyed by user, newest first.
#[derive(Default)]
pub struct MemoryHistory {
    scans: HashMap<String, Vec<ScanRecord>>,
    fail_scans: bool,
    fail_city: bool,
    limits: Mutex<Vec<usize>>,
}

impl MemoryHistory {
    pub fn with_scans(mut self, user_id: &str, scans: Vec<ScanRecord>) -> Self {
        self.scans.insert(user_id.to_string(), scans);
        self
    }

    pub fn failing_scans(mut self) -> Self {
        self.fail_scans = true;
        self
    }

    pub fn failing_city(mut self) -> Self {
        self.fail_city = true;
        self
    }

    /// Limits passed to `get_scans_for_user`, in call order.
    pub fn limits(&self) -> Vec<usize> {
        self.limits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScanHistoryStore for MemoryHistory {
    async fn get_scans_for_user(&self, user_id: &str, limit: usize) -> Result<Vec<ScanRecord>> {
        self.limits.lock().unwrap().push(limit);
        if self.fail_scans {
            return Err(Error::Request("history unavailable".to_string()));
        }
        Ok(self
            .scans
            .get(user_id)
            .map(|s| s.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_top_city_for_user(&self, user_id: &str) -> Result<Option<String>> {
        if self.fail_city {
            return Err(Error::Request("city query failed".to_string()));
        }
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for city in self
            .scans
            .get(user_id)
            .into_iter()
            .flatten()
            .filter_map(|s| s.city.as_deref())
            .filter(|c| !c.is_empty())
        {
            let n = counts.entry(city).or_insert(0);
            if *n == 0 {
                order.push(city);
            }
            *n += 1;
        }
        let mut best: Option<(&str, usize)> = None;
        for city in order {
            let n = counts[city];
            if best.map_or(true, |(_, b)| n > b) {
                best = Some((city, n));
            }
        }
        Ok(best.map(|(c, _)| c.to_string()))
    }

    async fn save_scan(&self, _scan: NewScan) -> Result<()> {
        Ok(())
    }
}

pub fn scan(name: &str, timestamp: &str, tags: &[&str], city: Option<&str>) -> ScanRecord {
    ScanRecord {
        landmark_name: Some(name.to_string()),
        timestamp: Some(timestamp.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        city: city.map(String::from),
    }
}

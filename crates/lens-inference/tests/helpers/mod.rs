//! In-memory stores and a scripted backend for identify tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use lens_core::{
    Error, NewScan, ProfileStore, RecognitionResult, ResolvedProfile, Result, ScanHistoryStore,
    ScanRecord, UserProfile,
};
use lens_inference::{parse_recognition, RecognitionBackend};

/// Profile store over a map; `failing()` errors on every lookup.
#[derive(Default)]
pub struct MemoryProfiles {
    profiles: HashMap<String, UserProfile>,
    fail: bool,
    lookups: Mutex<Vec<String>>,
}

impl MemoryProfiles {
    pub fn with(mut self, profile: UserProfile) -> Self {
        self.profiles.insert(profile.user_id.clone(), profile);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.lookups.lock().unwrap().push(user_id.to_string());
        if self.fail {
            return Err(Error::Request("profile store unreachable".to_string()));
        }
        Ok(self.profiles.get(user_id).cloned())
    }
}

/// Scan store recording saves; `failing()` rejects every save.
#[derive(Default)]
pub struct MemoryScans {
    saved: Mutex<Vec<NewScan>>,
    fail: bool,
}

impl MemoryScans {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn saved(&self) -> Vec<NewScan> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScanHistoryStore for MemoryScans {
    async fn get_scans_for_user(&self, _user_id: &str, _limit: usize) -> Result<Vec<ScanRecord>> {
        Ok(Vec::new())
    }

    async fn get_top_city_for_user(&self, _user_id: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn save_scan(&self, scan: NewScan) -> Result<()> {
        if self.fail {
            return Err(Error::Internal("insert failed".to_string()));
        }
        self.saved.lock().unwrap().push(scan);
        Ok(())
    }
}

/// Backend answering with fixed model text and recording the profiles it
/// was asked with.
pub struct ScriptedBackend {
    text: String,
    seen: Mutex<Vec<ResolvedProfile>>,
}

impl ScriptedBackend {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<ResolvedProfile> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecognitionBackend for ScriptedBackend {
    async fn identify(
        &self,
        _image: &[u8],
        _mime_type: &str,
        profile: &ResolvedProfile,
    ) -> Result<RecognitionResult> {
        self.seen.lock().unwrap().push(profile.clone());
        parse_recognition(&self.text)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

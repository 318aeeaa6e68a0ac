//! The identify pipeline: profile resolution, memoized recognition,
//! finalization and scan persistence.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use lens_core::defaults::{HTTP_TIMEOUT, IMAGE_MIME_TYPE, RECOGNITION_CACHE_TTL};
use lens_core::{
    AgeBracket, Clock, Coordinates, Deadline, EphemeralCache, Error, NewScan, ProfileStore,
    RecognitionResult, ResolvedProfile, Result, ScanHistoryStore, SystemClock, UserProfile,
};

use crate::finalizer::finalize;
use crate::interests::resolve_profile;
use crate::vision::RecognitionBackend;

/// One identification request.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyRequest {
    pub image: Vec<u8>,
    pub mime_type: String,
    pub user_id: Option<String>,
    /// Explicit bracket; overrides the stored profile.
    pub age_bracket: Option<AgeBracket>,
    /// Explicit raw interests; a non-empty list overrides the stored profile.
    pub interests: Vec<String>,
    /// Where the photo was taken, persisted with the scan.
    pub coordinates: Option<Coordinates>,
}

impl IdentifyRequest {
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            mime_type: IMAGE_MIME_TYPE.to_string(),
            user_id: None,
            age_bracket: None,
            interests: Vec::new(),
            coordinates: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_age_bracket(mut self, age_bracket: AgeBracket) -> Self {
        self.age_bracket = Some(age_bracket);
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}

/// SHA-256 of the full image, hex encoded.
pub fn image_fingerprint(image: &[u8]) -> String {
    hex::encode(Sha256::digest(image))
}

/// Cache key for a finalized result:
/// `identify:{age}:{interests}:{byte length}:{fingerprint}`.
pub fn identify_cache_key(profile: &ResolvedProfile, image: &[u8]) -> String {
    format!(
        "identify:{}:{}:{}:{}",
        profile.age_bracket,
        profile.interests.join(","),
        image.len(),
        image_fingerprint(image)
    )
}

/// Identifies landmarks, memoizing finalized results for an hour.
pub struct LandmarkIdentifier {
    backend: Arc<dyn RecognitionBackend>,
    cache: EphemeralCache,
    profiles: Option<Arc<dyn ProfileStore>>,
    scans: Option<Arc<dyn ScanHistoryStore>>,
    clock: Arc<dyn Clock>,
    call_timeout: Duration,
}

impl LandmarkIdentifier {
    pub fn new(backend: Arc<dyn RecognitionBackend>, cache: EphemeralCache) -> Self {
        Self {
            backend,
            cache,
            profiles: None,
            scans: None,
            clock: Arc::new(SystemClock),
            call_timeout: HTTP_TIMEOUT,
        }
    }

    pub fn with_profile_store(mut self, profiles: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn with_scan_store(mut self, scans: Arc<dyn ScanHistoryStore>) -> Self {
        self.scans = Some(scans);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Identify the landmark in `request.image`.
    ///
    /// Errors from the recognition backend propagate whatever their
    /// [`ErrorKind`](lens_core::ErrorKind); there is no fallback result.
    /// Profile lookups and scan persistence never fail the request.
    /// Concurrent requests for the same image and profile share one backend
    /// call; only the request that made the call saves a scan.
    pub async fn identify(
        &self,
        request: &IdentifyRequest,
        deadline: Deadline,
    ) -> Result<RecognitionResult> {
        let start = Instant::now();
        let scanned_at = self.clock.now();
        let user_id = request.user_id.as_deref().filter(|id| !id.trim().is_empty());

        let stored = match user_id {
            Some(id) => self.load_profile(id).await,
            None => None,
        };
        let profile = resolve_profile(request.age_bracket, &request.interests, stored.as_ref());

        let key = identify_cache_key(&profile, &request.image);
        let timeout = deadline.bound(self.call_timeout);
        let recognize = self
            .cache
            .get_or_try_insert_with(&key, RECOGNITION_CACHE_TTL, || async {
                let raw = self
                    .backend
                    .identify(&request.image, &request.mime_type, &profile)
                    .await?;
                Ok::<_, Error>(finalize(raw, &profile))
            });
        let lookup = match tokio::time::timeout(timeout, recognize).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(timeout.as_millis() as u64)),
        }
        .map_err(|e| {
            error!(
                subsystem = "inference",
                op = "identify",
                model = self.backend.model_name(),
                image_bytes = request.image.len(),
                error = %e,
                "Recognition failed"
            );
            e
        })?;

        if !lookup.is_fresh() {
            debug!(subsystem = "inference", op = "identify", "Returning cached recognition");
            return Ok(lookup.into_value());
        }
        let result = lookup.into_value();

        if let Some(id) = user_id {
            self.save_scan(id, request, &result, scanned_at).await;
        }

        info!(
            subsystem = "inference",
            op = "identify",
            model = self.backend.model_name(),
            confidence = result.confidence_score.unwrap_or_default(),
            needs_confirmation = result.needs_confirmation,
            duration_ms = start.elapsed().as_millis() as u64,
            "Landmark identified"
        );
        Ok(result)
    }

    async fn load_profile(&self, user_id: &str) -> Option<UserProfile> {
        let store = self.profiles.as_ref()?;
        match store.get_profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    user_id,
                    error = %e,
                    "Profile lookup failed, using request values only"
                );
                None
            }
        }
    }

    async fn save_scan(
        &self,
        user_id: &str,
        request: &IdentifyRequest,
        result: &RecognitionResult,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) {
        let Some(store) = self.scans.as_ref() else {
            return;
        };
        let scan = NewScan {
            user_id: user_id.to_string(),
            landmark_name: result.landmark_name.clone(),
            description: result.description.clone(),
            coordinates: request.coordinates,
            tags: result.tags.clone(),
            timestamp,
        };
        if let Err(e) = store.save_scan(scan).await {
            warn!(
                subsystem = "inference",
                user_id,
                error = %e,
                "Failed to save scan"
            );
        }
    }
}

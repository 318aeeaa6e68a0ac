//! Centralized default constants for landmark-lens.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

use std::time::Duration;

// =============================================================================
// CACHE
// =============================================================================

/// Default TTL for cache entries (1 hour).
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL for memoized recognition results (1 hour).
pub const RECOGNITION_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL for places and events API results (10 minutes).
pub const EXTERNAL_API_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Maximum number of live cache entries before eviction kicks in.
pub const CACHE_MAX_ENTRIES: usize = 10_000;

/// Decimal places kept when folding coordinates into cache keys (~11 m).
pub const CACHE_COORD_PRECISION: usize = 4;

// =============================================================================
// RECOGNITION / FINALIZER
// =============================================================================

/// Results scoring below this require user confirmation.
pub const CONFIRM_THRESHOLD: f64 = 0.65;

/// Inferred confidence when the response looks uncertain.
pub const UNCERTAIN_CONFIDENCE: f64 = 0.55;

/// Inferred confidence when nothing suggests uncertainty.
pub const DEFAULT_CONFIDENCE: f64 = 0.80;

/// Maximum number of normalized interests kept per request.
pub const MAX_INTERESTS: usize = 8;

pub const MAX_TAGS: usize = 6;
pub const MAX_SUGGESTED_QUESTIONS: usize = 3;
pub const MAX_FUN_FACTS: usize = 2;
pub const MAX_CANDIDATES: usize = 3;

/// Default MIME type for uploaded images.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Gemini REST base URL.
pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model used for landmark recognition.
pub const GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Output token ceiling for recognition calls.
pub const GEMINI_MAX_OUTPUT_TOKENS: u32 = 800;

// =============================================================================
// SUGGESTIONS
// =============================================================================

/// Default Google Places Nearby Search endpoint.
pub const PLACES_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// Default Ticketmaster Discovery endpoint.
pub const EVENTS_URL: &str = "https://app.ticketmaster.com/discovery/v2/events.json";

/// Default search radius for places, in meters.
pub const PLACES_RADIUS_M: u32 = 1500;

/// Default search radius for events, in kilometers.
pub const EVENTS_RADIUS_KM: u32 = 20;

/// Default number of suggestions returned per list.
pub const SUGGESTION_LIMIT: usize = 6;

/// Minimum page size requested from the events API. Upstream returns
/// duplicate listings, so more are fetched than are finally returned.
pub const EVENTS_FETCH_SIZE: usize = 20;

/// Place categories queried for nearby landmarks.
pub const LANDMARK_CATEGORIES: [&str; 3] = ["tourist_attraction", "museum", "park"];

/// Place categories queried for nearby food.
pub const FOOD_CATEGORIES: [&str; 3] = ["restaurant", "cafe", "bakery"];

/// Weight of proximity in the place score.
pub const DISTANCE_WEIGHT: f64 = 0.55;

/// Weight of rating in the place score.
pub const RATING_WEIGHT: f64 = 0.35;

/// Flat bonus for places that are open right now.
pub const OPEN_NOW_BONUS: f64 = 0.15;

/// Upper bound of the places rating scale.
pub const MAX_RATING: f64 = 5.0;

/// Mean earth radius in meters (spherical model).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// =============================================================================
// HTTP
// =============================================================================

/// Timeout applied to every external call.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(8);

// =============================================================================
// STATS
// =============================================================================

/// Span of one streak window, in calendar days.
pub const STREAK_WINDOW_DAYS: i64 = 3;

/// Streak walk never goes further back than this.
pub const STREAK_MAX_LOOKBACK_DAYS: i64 = 365;

/// Trailing window for `scans_this_week`.
pub const WEEK_DAYS: i64 = 7;

/// Default number of scans in the journey summary.
pub const WRAPPED_LIMIT: usize = 50;

/// Number of tag buckets in the journey summary.
pub const WRAPPED_TOP_TAGS: usize = 6;

/// Bucket name for scans without tags.
pub const WRAPPED_UNTAGGED_BUCKET: &str = "Landmarks";

/// Internal "fetch everything" limit for stats aggregation.
pub const INTERNAL_FETCH_LIMIT: usize = 10_000;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

pub const ENV_PLACES_API_KEY: &str = "GOOGLE_PLACES_API_KEY";
pub const ENV_PLACES_URL: &str = "GOOGLE_PLACES_URL";
pub const ENV_EVENTS_API_KEY: &str = "TICKETMASTER_API_KEY";
pub const ENV_EVENTS_URL: &str = "TICKETMASTER_URL";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_GEMINI_URL: &str = "GEMINI_URL";
pub const ENV_CACHE_MAX_ENTRIES: &str = "LENS_CACHE_MAX_ENTRIES";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "LENS_HTTP_TIMEOUT_SECS";

/// Read the shared HTTP timeout override, falling back to [`HTTP_TIMEOUT`].
pub fn http_timeout_from_env() -> Duration {
    std::env::var(ENV_HTTP_TIMEOUT_SECS)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(HTTP_TIMEOUT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_weights_favor_distance() {
        assert!(DISTANCE_WEIGHT > RATING_WEIGHT);
        let max = DISTANCE_WEIGHT + RATING_WEIGHT + OPEN_NOW_BONUS;
        assert!((max - 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_defaults_straddle_threshold() {
        assert!(UNCERTAIN_CONFIDENCE < CONFIRM_THRESHOLD);
        assert!(DEFAULT_CONFIDENCE >= CONFIRM_THRESHOLD);
    }

    #[test]
    fn test_api_results_expire_before_recognition_results() {
        assert!(EXTERNAL_API_CACHE_TTL < RECOGNITION_CACHE_TTL);
    }
}

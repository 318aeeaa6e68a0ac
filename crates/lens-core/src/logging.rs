//! Structured logging schema and field name constants for landmark-lens.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query them uniformly across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Fatal request failures |
//! | WARN  | Degraded sub-result, empty fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Cache hits/misses, decision points |
//! | TRACE | Per-record iteration (candidates, scans) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "cache", "places", "events", "inference", "stats"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "identify", "nearby_landmarks", "user_stats"
pub const OPERATION: &str = "op";

/// User the request is made for.
pub const USER_ID: &str = "user_id";

// ─── Cache fields ──────────────────────────────────────────────────────────

/// Cache key involved in the event.
pub const CACHE_KEY: &str = "cache_key";

/// Number of live entries in the cache.
pub const CACHE_SIZE: &str = "cache_size";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned.
pub const RESULT_COUNT: &str = "result_count";

/// Place category queried.
pub const CATEGORY: &str = "category";

/// Byte length of an uploaded image.
pub const IMAGE_BYTES: &str = "image_bytes";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for recognition.
pub const MODEL: &str = "model";

/// Final confidence score of a recognition result.
pub const CONFIDENCE: &str = "confidence";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

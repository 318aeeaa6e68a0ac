//! # lens-inference
//!
//! Landmark recognition for landmark-lens.
//!
//! This crate provides:
//! - The [`RecognitionBackend`] trait and a Gemini implementation
//! - Interest normalization and request/profile precedence
//! - The confidence and personalization finalizer
//! - [`LandmarkIdentifier`], which memoizes finalized results and records
//!   scans
//!
//! # Feature Flags
//!
//! - `mock`: Expose `mock::MockRecognitionBackend` outside this crate's
//!   own tests

pub mod finalizer;
pub mod identify;
pub mod interests;
pub mod vision;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use finalizer::{finalize, finalize_confidence, looks_uncertain, match_interests, sanitize_lists};
pub use identify::{identify_cache_key, image_fingerprint, IdentifyRequest, LandmarkIdentifier};
pub use interests::{normalize_interests, resolve_profile};
pub use vision::{build_prompt, parse_recognition, GeminiConfig, GeminiVisionBackend, RecognitionBackend};

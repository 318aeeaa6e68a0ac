//! # lens-core
//!
//! Core types, traits, and shared infrastructure for landmark-lens.
//!
//! This crate provides:
//! - The shared data model (recognition results, place and event
//!   candidates, scan records)
//! - The error type and its Fatal / Degraded / Skipped classification
//! - The process-wide ephemeral TTL cache
//! - Explicit clocks and request deadlines
//! - Store traits for profiles and scan history
//! - Default constants and structured logging field names

pub mod cache;
pub mod clock;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use cache::{CacheStats, EphemeralCache, Lookup};
pub use clock::{Clock, Deadline, ManualClock, SystemClock};
pub use error::{Error, ErrorKind, Result};
pub use models::*;
pub use traits::*;

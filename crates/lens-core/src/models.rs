//! Shared data model for landmark-lens.
//!
//! Records are strongly typed with defaults filled once at deserialization:
//! a missing or `null` list arrives as an empty `Vec`, a missing object as
//! its `Default`. Nothing downstream re-checks for absent fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Deserialize `null` or a missing field as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// PROFILE
// =============================================================================

/// Reading-level bracket used to personalize descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgeBracket {
    Child,
    Teen,
    /// Used when neither the request nor the stored profile has a bracket.
    #[default]
    Adult,
    Senior,
}

impl AgeBracket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Teen => "teen",
            Self::Adult => "adult",
            Self::Senior => "senior",
        }
    }
}

impl FromStr for AgeBracket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "child" => Ok(Self::Child),
            "teen" => Ok(Self::Teen),
            "adult" => Ok(Self::Adult),
            "senior" => Ok(Self::Senior),
            other => Err(Error::InvalidInput(format!("unknown age bracket: {}", other))),
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored user profile as returned by the profile store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age_bracket: Option<AgeBracket>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interests: Vec<String>,
}

/// Profile after request/store precedence has been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedProfile {
    pub age_bracket: AgeBracket,
    /// Normalized: lower-cased, trimmed, deduplicated, capped.
    pub interests: Vec<String>,
}

// =============================================================================
// RECOGNITION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Personalization {
    #[serde(default)]
    pub age_bracket: Option<AgeBracket>,
    /// Interests attested by the result's own tags.
    #[serde(default, alias = "matched_interest", deserialize_with = "null_as_default")]
    pub matched_interests: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunFacts {
    /// Facts tied to the user's interests.
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_facts: Vec<String>,
    /// General surprising facts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub discovery_facts: Vec<String>,
}

/// Landmark recognition result, raw from the model or finalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub landmark_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub personalization: Personalization,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fun_facts: FunFacts,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggested_questions: Vec<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub needs_confirmation: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<String>,
}

// =============================================================================
// SUGGESTIONS
// =============================================================================

/// A nearby place returned by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Rating on a 0-5 scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u32>,
    /// Straight-line distance from the query point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
}

/// A nearby event returned by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventCandidate {
    pub name: String,
    /// ISO-8601 start time as reported upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// =============================================================================
// SCAN HISTORY
// =============================================================================

/// One persisted scan, read-only here.
///
/// `timestamp` stays the raw stored string; parsing happens where it is
/// consumed so a malformed value only drops that one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    #[serde(default)]
    pub landmark_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// A scan to persist after a successful identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewScan {
    pub user_id: String,
    pub landmark_name: String,
    pub description: String,
    pub coordinates: Option<Coordinates>,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

//! Confidence and personalization finalizer.
//!
//! Turns an untrusted model response into a decision. Steps run in a fixed
//! order:
//!
//! 1. List sanitation: cap tags (6), suggested questions (3), each fun-fact
//!    list (2) and candidates (3).
//! 2. Confidence inference when the model gave no score.
//! 3. Confirmation gate at 0.65, seeding candidates with the landmark name.
//! 4. Interest matching against the result's own tags.
//!
//! After [`finalize`], `confidence_score` is always set and
//! `needs_confirmation == (confidence_score < 0.65)`.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use lens_core::defaults::{
    CONFIRM_THRESHOLD, DEFAULT_CONFIDENCE, MAX_CANDIDATES, MAX_FUN_FACTS,
    MAX_SUGGESTED_QUESTIONS, MAX_TAGS, UNCERTAIN_CONFIDENCE,
};
use lens_core::{RecognitionResult, ResolvedProfile};

/// Hedging words that mark a description as a guess.
static UNCERTAINTY_LEXICON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(maybe|possibly|not sure|unsure|likely|looks like)\b")
        .expect("uncertainty lexicon is a valid regex")
});

/// Names the model uses when it could not identify anything.
const PLACEHOLDER_NAMES: [&str; 2] = ["unknown", "uncertain"];

/// Cap every list field. Absent lists were already defaulted to empty at
/// deserialization.
pub fn sanitize_lists(result: &mut RecognitionResult) {
    result.tags.truncate(MAX_TAGS);
    result.suggested_questions.truncate(MAX_SUGGESTED_QUESTIONS);
    result.fun_facts.match_facts.truncate(MAX_FUN_FACTS);
    result.fun_facts.discovery_facts.truncate(MAX_FUN_FACTS);
    result.candidates.truncate(MAX_CANDIDATES);
}

/// Whether `text` hedges, word-bounded and case-insensitive.
pub fn looks_uncertain(text: &str) -> bool {
    UNCERTAINTY_LEXICON.is_match(text)
}

fn is_placeholder_name(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    name.is_empty() || PLACEHOLDER_NAMES.contains(&name.as_str())
}

/// Infer a missing score, then apply the confirmation gate.
///
/// A supplied finite score is trusted (clamped to `[0, 1]`); a non-finite
/// one counts as missing.
pub fn finalize_confidence(result: &mut RecognitionResult) {
    let supplied = result.confidence_score.filter(|s| s.is_finite());

    let score = match supplied {
        Some(score) => score.clamp(0.0, 1.0),
        None if is_placeholder_name(&result.landmark_name)
            || looks_uncertain(&result.description) =>
        {
            UNCERTAIN_CONFIDENCE
        }
        None => DEFAULT_CONFIDENCE,
    };
    result.confidence_score = Some(score);

    result.needs_confirmation = score < CONFIRM_THRESHOLD;
    if result.needs_confirmation
        && result.candidates.is_empty()
        && !result.landmark_name.trim().is_empty()
    {
        result.candidates.push(result.landmark_name.clone());
    }

    debug!(
        confidence = score,
        inferred = supplied.is_none(),
        needs_confirmation = result.needs_confirmation,
        "Confidence finalized"
    );
}

/// Interests that appear as a substring of the space-joined, lower-cased
/// tag list, in interest order.
pub fn match_interests(tags: &[String], interests: &[String]) -> Vec<String> {
    let tags_text = tags.join(" ").to_lowercase();
    interests
        .iter()
        .filter(|interest| tags_text.contains(interest.as_str()))
        .cloned()
        .collect()
}

/// Run the full finalizer for a resolved profile.
pub fn finalize(mut result: RecognitionResult, profile: &ResolvedProfile) -> RecognitionResult {
    sanitize_lists(&mut result);
    finalize_confidence(&mut result);
    result.personalization.matched_interests = match_interests(&result.tags, &profile.interests);
    if result.personalization.age_bracket.is_none() {
        result.personalization.age_bracket = Some(profile.age_bracket);
    }
    result
}

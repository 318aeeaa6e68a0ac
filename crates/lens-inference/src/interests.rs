//! Interest normalization and profile resolution.

use lens_core::defaults::MAX_INTERESTS;
use lens_core::{AgeBracket, ResolvedProfile, UserProfile};

/// Trim, lower-case, drop empties and repeats (first seen wins), cap at 8.
pub fn normalize_interests<I, S>(interests: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cleaned: Vec<String> = Vec::new();
    for raw in interests {
        let interest = raw.as_ref().trim().to_lowercase();
        if interest.is_empty() || cleaned.contains(&interest) {
            continue;
        }
        cleaned.push(interest);
        if cleaned.len() >= MAX_INTERESTS {
            break;
        }
    }
    cleaned
}

/// Apply request-over-profile precedence.
///
/// The stored profile only fills what the request left out: its age
/// bracket when none was given, its interests when the request's raw list
/// was empty. A request whose interests all normalize away does not fall
/// back.
pub fn resolve_profile(
    age_bracket: Option<AgeBracket>,
    interests: &[String],
    stored: Option<&UserProfile>,
) -> ResolvedProfile {
    let mut resolved = ResolvedProfile {
        age_bracket: age_bracket.unwrap_or_default(),
        interests: normalize_interests(interests),
    };

    if let Some(profile) = stored {
        if age_bracket.is_none() {
            if let Some(stored_age) = profile.age_bracket {
                resolved.age_bracket = stored_age;
            }
        }
        if interests.is_empty() {
            resolved.interests = normalize_interests(&profile.interests);
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn profile(age: Option<AgeBracket>, interests: &[&str]) -> UserProfile {
        UserProfile {
            user_id: "u1".to_string(),
            age_bracket: age,
            interests: strings(interests),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_dedupes_case_insensitively() {
        assert_eq!(
            normalize_interests(["History ", "HISTORY", "art"]),
            vec!["history", "art"]
        );
    }

    #[test]
    fn test_normalize_drops_blanks() {
        assert_eq!(normalize_interests(["", "  ", "\tfood\n"]), vec!["food"]);
    }

    #[test]
    fn test_normalize_caps_at_eight() {
        let many: Vec<String> = (0..12).map(|i| format!("topic{}", i)).collect();
        let normalized = normalize_interests(&many);
        assert_eq!(normalized.len(), 8);
        assert_eq!(normalized[0], "topic0");
        assert_eq!(normalized[7], "topic7");
    }

    #[test]
    fn test_normalize_cap_counts_unique_only() {
        let mut items = vec!["a"; 10];
        items.extend(["b", "c"]);
        assert_eq!(normalize_interests(items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_defaults_without_request_or_profile() {
        let resolved = resolve_profile(None, &[], None);
        assert_eq!(resolved.age_bracket, AgeBracket::Adult);
        assert!(resolved.interests.is_empty());
    }

    #[test]
    fn test_request_values_win() {
        let stored = profile(Some(AgeBracket::Senior), &["gardens"]);
        let resolved = resolve_profile(
            Some(AgeBracket::Teen),
            &strings(&["Music"]),
            Some(&stored),
        );
        assert_eq!(resolved.age_bracket, AgeBracket::Teen);
        assert_eq!(resolved.interests, vec!["music"]);
    }

    #[test]
    fn test_profile_fills_missing_values() {
        let stored = profile(Some(AgeBracket::Child), &["Animals", "animals", "Space"]);
        let resolved = resolve_profile(None, &[], Some(&stored));
        assert_eq!(resolved.age_bracket, AgeBracket::Child);
        assert_eq!(resolved.interests, vec!["animals", "space"]);
    }

    #[test]
    fn test_profile_without_age_keeps_default() {
        let stored = profile(None, &["art"]);
        let resolved = resolve_profile(None, &strings(&["history"]), Some(&stored));
        assert_eq!(resolved.age_bracket, AgeBracket::Adult);
        assert_eq!(resolved.interests, vec!["history"]);
    }

    #[test]
    fn test_blank_request_interests_do_not_fall_back() {
        let stored = profile(None, &["art"]);
        let resolved = resolve_profile(None, &strings(&["  "]), Some(&stored));
        assert!(resolved.interests.is_empty());
    }
}

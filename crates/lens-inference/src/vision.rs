//! Recognition backend trait and the Gemini implementation.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use lens_core::{defaults, Error, RecognitionResult, ResolvedProfile, Result};

/// Backend that identifies a landmark from image bytes.
#[async_trait]
pub trait RecognitionBackend: Send + Sync {
    /// Identify the landmark in `image`, tailoring prose to `profile`.
    ///
    /// The result is raw model output; callers run the finalizer on it.
    /// No content at all is [`Error::EmptyResponse`].
    async fn identify(
        &self,
        image: &[u8],
        mime_type: &str,
        profile: &ResolvedProfile,
    ) -> Result<RecognitionResult>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Configuration for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_output_tokens: u32,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: defaults::GEMINI_URL.to_string(),
            model: defaults::GEMINI_MODEL.to_string(),
            api_key: api_key.into(),
            timeout: defaults::HTTP_TIMEOUT,
            max_output_tokens: defaults::GEMINI_MAX_OUTPUT_TOKENS,
        }
    }

    /// Create from environment variables.
    ///
    /// Requires `GEMINI_API_KEY`; `GEMINI_MODEL`, `GEMINI_URL` and
    /// `LENS_HTTP_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(defaults::ENV_GEMINI_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{} not set", defaults::ENV_GEMINI_API_KEY)))?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var(defaults::ENV_GEMINI_MODEL) {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(url) = std::env::var(defaults::ENV_GEMINI_URL) {
            config.base_url = url;
        }
        config.timeout = defaults::http_timeout_from_env();
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("Gemini api_key cannot be empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Config("Gemini model cannot be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Gemini base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Recognition over the Gemini `generateContent` REST endpoint.
pub struct GeminiVisionBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiVisionBackend {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

/// Instructions sent alongside the image.
pub fn build_prompt(profile: &ResolvedProfile) -> String {
    let interests = if profile.interests.is_empty() {
        "None".to_string()
    } else {
        profile.interests.join(", ")
    };

    format!(
        r#"You are a travel guide and landmark identifier.

USER PROFILE:
- age_bracket: {age}
- interests: {interests}

TASK:
1) Identify the landmark, building or place in the image as best you can.
2) Write personalized content for the age bracket and interests.
3) Return a single JSON object with exactly these keys:
   landmark_name, location, coordinates ({{"lat", "lng"}} or null), tags,
   description, personalization ({{"age_bracket", "matched_interests"}}),
   fun_facts ({{"match_facts", "discovery_facts"}}), suggested_questions,
   confidence_score, needs_confirmation, candidates.
4) If you are not confident, set needs_confirmation to true, list up to 3
   plausible names in candidates, and keep confidence_score at or below 0.6.

CONTENT RULES:
- description: one short paragraph at the reading level of the age bracket.
- tags: 3-6 short tags such as "history", "architecture", "museum", "nature".
- fun_facts.match_facts: 1-2 facts tied to the user's interests, or [].
- fun_facts.discovery_facts: 1-2 surprising general facts.
- suggested_questions: 3 short follow-up questions.
- location: city and country if known, otherwise a best guess or "Unknown".

Return ONLY JSON. No markdown. No extra keys."#,
        age = profile.age_bracket,
        interests = interests,
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Parse model text into a raw result. Blank text is an empty response.
pub fn parse_recognition(text: &str) -> Result<RecognitionResult> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyResponse);
    }
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, "Model returned malformed recognition JSON");
        Error::Serialization(format!("Failed to parse recognition result: {}", e))
    })
}

#[async_trait]
impl RecognitionBackend for GeminiVisionBackend {
    async fn identify(
        &self,
        image: &[u8],
        mime_type: &str,
        profile: &ResolvedProfile,
    ) -> Result<RecognitionResult> {
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: image_b64,
                        },
                    },
                    Part::Text {
                        text: build_prompt(profile),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(self.config.timeout.as_millis() as u64)
                } else {
                    Error::Request(format!("Recognition request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus { status, body });
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            Error::Serialization(format!("Failed to parse model response: {}", e))
        })?;

        let text = body.text();
        debug!(
            model = %self.config.model,
            image_bytes = image.len(),
            response_chars = text.len(),
            "Recognition response received"
        );
        parse_recognition(&text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

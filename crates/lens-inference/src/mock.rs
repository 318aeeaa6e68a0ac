//! Scripted recognition backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lens_inference::mock::MockRecognitionBackend;
//!
//! let backend = MockRecognitionBackend::new()
//!     .with_json(r#"{"landmark_name": "Big Ben", "tags": ["history"]}"#);
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lens_core::{Error, RecognitionResult, ResolvedProfile, Result};

use crate::vision::{parse_recognition, RecognitionBackend};

/// What the mock answers with.
#[derive(Debug, Clone)]
enum MockReply {
    /// Raw model text, parsed like a real response.
    Text(String),
    Empty,
    Unavailable,
}

/// One recorded call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub image_len: usize,
    pub mime_type: String,
    pub profile: ResolvedProfile,
}

/// Recognition backend returning a fixed reply.
#[derive(Clone)]
pub struct MockRecognitionBackend {
    reply: MockReply,
    latency: Duration,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockRecognitionBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecognitionBackend {
    /// A backend that recognizes a generic landmark.
    pub fn new() -> Self {
        Self {
            reply: MockReply::Text(r#"{"landmark_name": "Mock Landmark"}"#.to_string()),
            latency: Duration::ZERO,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer with this model text.
    pub fn with_json(mut self, text: impl Into<String>) -> Self {
        self.reply = MockReply::Text(text.into());
        self
    }

    /// Answer with this result.
    pub fn with_result(self, result: &RecognitionResult) -> Self {
        let text = serde_json::to_string(result).unwrap_or_default();
        self.with_json(text)
    }

    /// Answer with no content.
    pub fn with_empty_response(mut self) -> Self {
        self.reply = MockReply::Empty;
        self
    }

    /// Fail every call with an upstream error.
    pub fn with_failure(mut self) -> Self {
        self.reply = MockReply::Unavailable;
        self
    }

    /// Sleep before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl RecognitionBackend for MockRecognitionBackend {
    async fn identify(
        &self,
        image: &[u8],
        mime_type: &str,
        profile: &ResolvedProfile,
    ) -> Result<RecognitionResult> {
        if let Ok(mut log) = self.call_log.lock() {
            log.push(MockCall {
                image_len: image.len(),
                mime_type: mime_type.to_string(),
                profile: profile.clone(),
            });
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match &self.reply {
            MockReply::Text(text) => parse_recognition(text),
            MockReply::Empty => Err(Error::EmptyResponse),
            MockReply::Unavailable => Err(Error::UpstreamStatus {
                status: 503,
                body: "mock backend unavailable".to_string(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

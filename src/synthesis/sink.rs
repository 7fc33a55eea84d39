use serde::{Deserialize, Serialize};

/// Text to speak and the voice to speak it with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
        }
    }
}

/// Result of one speak call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SynthesisOutcome {
    Succeeded,
    Failed { detail: String },
}

impl SynthesisOutcome {
    pub fn failed(detail: impl Into<String>) -> Self {
        SynthesisOutcome::Failed {
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SynthesisOutcome::Succeeded)
    }
}

/// Speech output trait
///
/// `speak` returns only once playback on the output device has completed or
/// failed. Failures are reported in the outcome, never as a panic or error.
#[async_trait::async_trait]
pub trait OutputSink: Send + Sync {
    async fn speak(&self, request: &SynthesisRequest) -> SynthesisOutcome;

    /// Get sink name for logging
    fn name(&self) -> &str;
}

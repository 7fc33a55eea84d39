use serde::{Deserialize, Serialize};

/// One event from the recognition/translation engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecognitionEvent {
    /// Unstable hypothesis, still changing
    Partial { text: String },
    /// Stabilized source-language transcript
    FinalRecognized { text: String },
    /// Stabilized translation into the target language
    FinalTranslated { text: String },
    /// Engine ended the session normally
    SessionStopped,
    /// Engine gave up (transport, auth, quota...)
    Canceled { reason: String },
}

impl RecognitionEvent {
    /// Terminal events end the stream
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecognitionEvent::SessionStopped | RecognitionEvent::Canceled { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RecognitionEvent::Partial { .. } => "partial",
            RecognitionEvent::FinalRecognized { .. } => "final_recognized",
            RecognitionEvent::FinalTranslated { .. } => "final_translated",
            RecognitionEvent::SessionStopped => "session_stopped",
            RecognitionEvent::Canceled { .. } => "canceled",
        }
    }
}

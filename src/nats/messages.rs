use serde::{Deserialize, Serialize};

use crate::recognition::RecognitionEvent;

/// Subject the recognition engine listens on for new sessions
pub const START_SUBJECT: &str = "translation.session.start";
/// Subject the recognition engine listens on for stop requests
pub const STOP_SUBJECT: &str = "translation.session.stop";
/// Request/reply subject of the synthesis engine
pub const SPEAK_SUBJECT: &str = "tts.speak";

/// Per-session subject carrying recognition events
pub fn events_subject(session_id: &str) -> String {
    format!("translation.events.{}", session_id)
}

/// Start continuous recognition + translation
#[derive(Debug, Serialize, Deserialize)]
pub struct StartTranslationMessage {
    pub session_id: String,
    pub source_language: String,
    pub target_language: String,
    pub key: String,
    pub region: String,
}

/// Stop continuous recognition for a session
#[derive(Debug, Serialize, Deserialize)]
pub struct StopTranslationMessage {
    pub session_id: String,
}

/// Event kinds published by the recognition engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionKind {
    Recognizing,
    Recognized,
    Translated,
    SessionStopped,
    Canceled,
}

/// Recognition event received from the engine
#[derive(Debug, Serialize, Deserialize)]
pub struct RecognitionMessage {
    pub session_id: String,
    pub kind: RecognitionKind,
    #[serde(default)]
    pub text: Option<String>,
    /// Error details for `canceled`
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl RecognitionMessage {
    pub fn into_event(self) -> RecognitionEvent {
        let text = self.text.unwrap_or_default();
        match self.kind {
            RecognitionKind::Recognizing => RecognitionEvent::Partial { text },
            RecognitionKind::Recognized => RecognitionEvent::FinalRecognized { text },
            RecognitionKind::Translated => RecognitionEvent::FinalTranslated { text },
            RecognitionKind::SessionStopped => RecognitionEvent::SessionStopped,
            RecognitionKind::Canceled => RecognitionEvent::Canceled {
                reason: self
                    .reason
                    .unwrap_or_else(|| "no error details".to_string()),
            },
        }
    }
}

/// Speak request sent to the synthesis engine; the reply arrives after playback
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakRequestMessage {
    pub session_id: String,
    pub text: String,
    pub voice: String,
    pub key: String,
    pub region: String,
}

/// Reply from the synthesis engine
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakReplyMessage {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

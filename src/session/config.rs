use std::time::Duration;

/// Immutable settings for one translation session
///
/// Built once at startup (see [`crate::Config::session_config`]) and shared
/// read-only behind an `Arc` by the event source and the output sink.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "translation-6f1c...")
    pub session_id: String,

    /// Language being spoken into the microphone (e.g., "de-DE")
    pub source_language: String,

    /// Language the speech is translated into (e.g., "fr")
    pub target_language: String,

    /// Voice used to speak translations
    pub voice_id: String,

    /// Recognition service credentials
    pub recognition_key: String,
    pub recognition_region: String,

    /// Synthesis service credentials
    pub synthesis_key: String,
    pub synthesis_region: String,

    /// Upper bound on a single speak call, playback included
    pub synthesis_timeout: Duration,

    /// Upper bound on stopping the event source and draining its stream
    pub stop_timeout: Duration,

    /// How long the gate stays closed after playback reports completion
    pub playback_settle: Duration,

    /// Capacity of the recognition event channel
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("translation-{}", uuid::Uuid::new_v4()),
            source_language: "de-DE".to_string(),
            target_language: "fr".to_string(),
            voice_id: "fr-FR-VivienneMultilingualNeural".to_string(),
            recognition_key: String::new(),
            recognition_region: String::new(),
            synthesis_key: String::new(),
            synthesis_region: String::new(),
            synthesis_timeout: Duration::from_secs(15),
            stop_timeout: Duration::from_secs(5),
            playback_settle: Duration::from_millis(200),
            event_buffer: 100,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::{SessionPhase, StopReason};

/// Statistics about a translation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session identifier
    pub session_id: String,

    /// Current lifecycle phase
    pub phase: SessionPhase,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Partial hypotheses observed
    pub partials: usize,

    /// Final source-language transcripts observed
    pub recognized: usize,

    /// Final translations received
    pub translations: usize,

    /// Translations that were spoken successfully
    pub spoken: usize,

    /// Speak calls that failed or timed out
    pub synthesis_failures: usize,

    /// Translations dropped because they repeated the last spoken text
    pub dropped_duplicates: usize,

    /// Translations dropped because playback was still in progress
    pub dropped_busy: usize,

    /// Whether a speak call is currently running
    pub synthesis_in_flight: bool,

    /// Most recent text sent to the speaker
    pub last_spoken_text: Option<String>,

    /// Set once the session has left `Running`
    pub stop_reason: Option<StopReason>,
}

impl SessionStats {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            phase: SessionPhase::Idle,
            started_at: Utc::now(),
            partials: 0,
            recognized: 0,
            translations: 0,
            spoken: 0,
            synthesis_failures: 0,
            dropped_duplicates: 0,
            dropped_busy: 0,
            synthesis_in_flight: false,
            last_spoken_text: None,
            stop_reason: None,
        }
    }

    /// Seconds since the session was created
    pub fn duration_secs(&self) -> f64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_milliseconds() as f64
            / 1000.0
    }
}

use serde::{Deserialize, Serialize};

use super::dedup::DedupFilter;
use super::gate::SynthesisGate;

/// Lifecycle phase of a translation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Running,
    Stopping,
    Stopped,
}

/// Why a session left `Running`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    /// Operator asked the session to stop
    Interrupted,
    /// Recognition engine ended the session
    SessionStopped,
    /// Recognition engine gave up (transport, auth, quota...)
    Canceled { reason: String },
    /// Event stream closed without a terminal event
    StreamClosed,
}

/// Why a translation was not spoken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Nothing to say
    Empty,
    /// Same as the last text spoken
    Duplicate,
    /// A playback is still in flight
    Busy,
    /// Session is shutting down
    Terminated,
}

/// Mutable state of one session, owned by the controller
#[derive(Debug)]
pub struct SessionState {
    pub(crate) phase: SessionPhase,
    dedup: DedupFilter,
    gate: SynthesisGate,
    terminated: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            dedup: DedupFilter::new(),
            gate: SynthesisGate::new(),
            terminated: false,
        }
    }

    /// Decide whether a final translation may be spoken now.
    ///
    /// The dedup memory only changes once the gate has been acquired, so a
    /// translation dropped for being busy can still be spoken later.
    pub fn admit(&mut self, text: &str) -> Result<(), DropReason> {
        if self.terminated {
            return Err(DropReason::Terminated);
        }
        if text.is_empty() {
            return Err(DropReason::Empty);
        }
        if !self.dedup.is_fresh(text) {
            return Err(DropReason::Duplicate);
        }
        if !self.gate.try_acquire() {
            return Err(DropReason::Busy);
        }
        self.dedup.accept(text);
        Ok(())
    }

    /// Called once per successful `admit`, when the speak call is over
    pub fn synthesis_finished(&mut self) {
        self.gate.release();
    }

    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn last_spoken_text(&self) -> Option<&str> {
        self.dedup.last()
    }

    pub fn synthesis_in_flight(&self) -> bool {
        self.gate.is_busy()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

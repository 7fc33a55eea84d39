//! Translation session management
//!
//! This module provides the `SessionController` that manages:
//! - The session lifecycle (Idle → Running → Stopping → Stopped)
//! - Deduplication of repeated translations
//! - The synthesis gate (one playback at a time, newer requests dropped)
//! - Session statistics for observers

mod config;
mod controller;
mod dedup;
mod gate;
mod state;
mod stats;

pub use config::SessionConfig;
pub use controller::SessionController;
pub use dedup::DedupFilter;
pub use gate::SynthesisGate;
pub use state::{DropReason, SessionPhase, SessionState, StopReason};
pub use stats::SessionStats;

use crate::session::SessionStats;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Latest stats published by the running session
    pub stats: watch::Receiver<SessionStats>,

    /// Cancelling this stops the session
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(stats: watch::Receiver<SessionStats>, shutdown: CancellationToken) -> Self {
        Self { stats, shutdown }
    }
}

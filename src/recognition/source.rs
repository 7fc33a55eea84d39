use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::event::RecognitionEvent;
use crate::nats::NatsClient;
use crate::session::SessionConfig;

/// Continuous recognition feed
///
/// Implementations:
/// - NATS: events published by the recognition/translation engine
/// - Script: replay of a JSON-lines file (for demos/offline runs)
#[async_trait::async_trait]
pub trait EventSource: Send {
    /// Start continuous recognition
    ///
    /// Returns a channel receiver that will receive recognition events. The
    /// stream always ends with `SessionStopped` or `Canceled` unless the
    /// receiver is dropped first.
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>>;

    /// Request graceful termination. The stream ends within the configured
    /// stop timeout.
    async fn stop(&mut self) -> Result<()>;

    /// Check if the source is still delivering events
    fn is_running(&self) -> bool;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Event source type
#[derive(Clone)]
pub enum EventSourceKind {
    /// Recognition engine reached over NATS
    Nats(Arc<NatsClient>),
    /// Replay a JSON-lines script
    Script(PathBuf),
}

/// Event source factory
pub struct EventSourceFactory;

impl EventSourceFactory {
    pub fn create(kind: EventSourceKind, config: Arc<SessionConfig>) -> Result<Box<dyn EventSource>> {
        match kind {
            EventSourceKind::Nats(client) => {
                let source = super::nats::NatsEventSource::new(client, config);
                Ok(Box::new(source))
            }
            EventSourceKind::Script(path) => {
                let source = super::script::ScriptedEventSource::open(&path)?
                    .with_buffer(config.event_buffer);
                Ok(Box::new(source))
            }
        }
    }
}

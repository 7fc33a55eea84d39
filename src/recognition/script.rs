use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use super::event::RecognitionEvent;
use super::source::EventSource;

/// One line of a replay script
///
/// ```json
/// {"kind": "partial", "text": "guten"}
/// {"kind": "final_translated", "text": "bonjour", "delay_ms": 400}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedEvent {
    #[serde(flatten)]
    pub event: RecognitionEvent,
    /// Pause before this event is delivered
    #[serde(default)]
    pub delay_ms: u64,
}

/// Replays recognition events from a JSON-lines script
pub struct ScriptedEventSource {
    events: Vec<ScriptedEvent>,
    buffer: usize,
    stop_tx: Option<oneshot::Sender<()>>,
    running: Arc<AtomicBool>,
}

impl ScriptedEventSource {
    /// Load a script file. Blank lines and lines starting with `#` are ignored.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening recognition script: {}", path.display());

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;

        let mut events = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let event: ScriptedEvent = serde_json::from_str(line).with_context(|| {
                format!("Invalid event on line {} of {}", index + 1, path.display())
            })?;
            events.push(event);
        }

        info!("Recognition script loaded: {} events", events.len());

        Ok(Self::from_scripted(events))
    }

    /// Replay events back to back
    pub fn from_events(events: Vec<RecognitionEvent>) -> Self {
        Self::from_scripted(
            events
                .into_iter()
                .map(|event| ScriptedEvent { event, delay_ms: 0 })
                .collect(),
        )
    }

    pub fn from_scripted(events: Vec<ScriptedEvent>) -> Self {
        Self {
            events,
            buffer: 100,
            stop_tx: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[async_trait::async_trait]
impl EventSource for ScriptedEventSource {
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>> {
        if self.stop_tx.is_some() {
            bail!("Script replay already started");
        }

        let events = std::mem::take(&mut self.events);
        let (event_tx, event_rx) = mpsc::channel(self.buffer);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        self.stop_tx = Some(stop_tx);
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            let mut ended = false;

            for scripted in events {
                let stop_requested = tokio::select! {
                    biased;
                    _ = &mut stop_rx => true,
                    _ = tokio::time::sleep(Duration::from_millis(scripted.delay_ms)) => false,
                };
                if stop_requested {
                    break;
                }

                let terminal = scripted.event.is_terminal();
                if event_tx.send(scripted.event).await.is_err() {
                    ended = true;
                    break;
                }
                if terminal {
                    ended = true;
                    break;
                }
            }

            if !ended {
                let _ = event_tx.send(RecognitionEvent::SessionStopped).await;
            }

            running.store(false, Ordering::SeqCst);
            info!("Script replay finished");
        });

        Ok(event_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "script replay"
    }
}

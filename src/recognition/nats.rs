// Recognition events delivered over NATS by the speech translation engine

use anyhow::{bail, Context, Result};
use futures::stream::{Stream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use super::event::RecognitionEvent;
use super::source::EventSource;
use crate::nats::{NatsClient, RecognitionMessage};
use crate::session::SessionConfig;

pub struct NatsEventSource {
    client: Arc<NatsClient>,
    config: Arc<SessionConfig>,
    stop_tx: Option<oneshot::Sender<()>>,
    running: Arc<AtomicBool>,
    /// Set once a start request may have reached the engine
    start_requested: bool,
}

impl NatsEventSource {
    pub fn new(client: Arc<NatsClient>, config: Arc<SessionConfig>) -> Self {
        Self {
            client,
            config,
            stop_tx: None,
            running: Arc::new(AtomicBool::new(false)),
            start_requested: false,
        }
    }
}

#[async_trait::async_trait]
impl EventSource for NatsEventSource {
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>> {
        if self.running.load(Ordering::SeqCst) {
            bail!("Recognition already started");
        }

        // Subscribe before starting so no early events are missed
        let subscriber = self
            .client
            .subscribe_events(&self.config.session_id)
            .await
            .context("Failed to subscribe to recognition events")?;

        // Even if publishing fails halfway, stop() must still tell the engine
        self.start_requested = true;
        self.client
            .start_translation(&self.config)
            .await
            .context("Failed to start recognition")?;

        let (event_tx, event_rx) = mpsc::channel(self.config.event_buffer);
        let (stop_tx, stop_rx) = oneshot::channel();

        self.running.store(true, Ordering::SeqCst);
        self.stop_tx = Some(stop_tx);

        let running = Arc::clone(&self.running);
        let session_id = self.config.session_id.clone();
        let stop_timeout = self.config.stop_timeout;
        let payloads = subscriber.map(|msg| msg.payload);

        tokio::spawn(async move {
            info!("Recognition forwarder started");
            forward_events(payloads, event_tx, stop_rx, &session_id, stop_timeout).await;
            running.store(false, Ordering::SeqCst);
            info!("Recognition forwarder stopped");
        });

        info!("Continuous recognition started");

        Ok(event_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if !std::mem::take(&mut self.start_requested) {
            return Ok(());
        }

        info!("Stopping continuous recognition");

        // Forwarder gives the engine stop_timeout to confirm, then ends the stream itself
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        self.client
            .stop_translation(&self.config.session_id)
            .await
            .context("Failed to request recognition stop")?;

        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "NATS speech translation"
    }
}

enum Forwarded {
    Continue,
    Terminal,
    ReceiverGone,
}

async fn forward_events<S>(
    mut payloads: S,
    event_tx: mpsc::Sender<RecognitionEvent>,
    mut stop_rx: oneshot::Receiver<()>,
    session_id: &str,
    stop_timeout: Duration,
) where
    S: Stream + Unpin,
    S::Item: AsRef<[u8]>,
{
    // Phase 1: deliver until the engine ends the session or stop is requested
    loop {
        let next = tokio::select! {
            payload = payloads.next() => payload,
            _ = &mut stop_rx => break,
        };

        let Some(payload) = next else {
            warn!("Recognition subscription ended without a terminal event");
            let _ = event_tx
                .send(RecognitionEvent::Canceled {
                    reason: "recognition feed closed".to_string(),
                })
                .await;
            return;
        };

        match forward_one(payload.as_ref(), &event_tx, session_id).await {
            Forwarded::Continue => {}
            Forwarded::Terminal | Forwarded::ReceiverGone => return,
        }
    }

    // Phase 2: stop requested, wait a bounded time for the engine to confirm
    let drain = async {
        while let Some(payload) = payloads.next().await {
            match forward_one(payload.as_ref(), &event_tx, session_id).await {
                Forwarded::Continue => {}
                Forwarded::Terminal | Forwarded::ReceiverGone => return true,
            }
        }
        false
    };

    match tokio::time::timeout(stop_timeout, drain).await {
        Ok(true) => {}
        Ok(false) => {
            debug!("Recognition subscription closed during stop");
            let _ = event_tx.send(RecognitionEvent::SessionStopped).await;
        }
        Err(_) => {
            warn!(
                "Recognition engine did not confirm stop within {:?}",
                stop_timeout
            );
            let _ = event_tx.send(RecognitionEvent::SessionStopped).await;
        }
    }
}

async fn forward_one(
    payload: &[u8],
    event_tx: &mpsc::Sender<RecognitionEvent>,
    session_id: &str,
) -> Forwarded {
    let message = match serde_json::from_slice::<RecognitionMessage>(payload) {
        Ok(message) => message,
        Err(e) => {
            warn!("Failed to parse recognition message: {}", e);
            return Forwarded::Continue;
        }
    };

    if message.session_id != session_id {
        return Forwarded::Continue;
    }

    let event = message.into_event();
    let terminal = event.is_terminal();

    if let Err(e) = event_tx.send(event).await {
        error!("Failed to forward recognition event: {}", e);
        return Forwarded::ReceiverGone;
    }

    if terminal {
        Forwarded::Terminal
    } else {
        Forwarded::Continue
    }
}

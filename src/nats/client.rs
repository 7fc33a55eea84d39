use anyhow::{Context, Result};
use async_nats::Client;
use tracing::{debug, info};

use super::messages::{
    events_subject, SpeakReplyMessage, SpeakRequestMessage, StartTranslationMessage,
    StopTranslationMessage, SPEAK_SUBJECT, START_SUBJECT, STOP_SUBJECT,
};
use crate::session::SessionConfig;

/// One connection shared by the recognition source and the speech sink.
/// Session identity always comes from the `SessionConfig` passed in.
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }

    /// Ask the recognition engine to start continuous translation
    pub async fn start_translation(&self, config: &SessionConfig) -> Result<()> {
        let message = StartTranslationMessage {
            session_id: config.session_id.clone(),
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            key: config.recognition_key.clone(),
            region: config.recognition_region.clone(),
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(START_SUBJECT.to_string(), payload.into())
            .await
            .context("Failed to publish start request")?;
        self.client
            .flush()
            .await
            .context("Failed to flush start request")?;

        info!(
            "Requested translation {} -> {} (session={})",
            config.source_language, config.target_language, config.session_id
        );

        Ok(())
    }

    /// Ask the recognition engine to stop the session
    pub async fn stop_translation(&self, session_id: &str) -> Result<()> {
        let message = StopTranslationMessage {
            session_id: session_id.to_string(),
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(STOP_SUBJECT.to_string(), payload.into())
            .await
            .context("Failed to publish stop request")?;

        info!("Requested stop for session {}", session_id);

        Ok(())
    }

    /// Subscribe to this session's recognition events
    pub async fn subscribe_events(&self, session_id: &str) -> Result<async_nats::Subscriber> {
        let subject = events_subject(session_id);

        info!("Subscribing to recognition events on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject.clone())
            .await
            .context("Failed to subscribe to recognition events")?;

        info!("Subscribed to {}", subject);

        Ok(subscriber)
    }

    /// Send text to the synthesis engine and wait until it has been played
    pub async fn request_speech(
        &self,
        text: &str,
        voice: &str,
        config: &SessionConfig,
    ) -> Result<SpeakReplyMessage> {
        let message = SpeakRequestMessage {
            session_id: config.session_id.clone(),
            text: text.to_string(),
            voice: voice.to_string(),
            key: config.synthesis_key.clone(),
            region: config.synthesis_region.clone(),
        };

        let payload = serde_json::to_vec(&message)?;

        let reply = self
            .client
            .request(SPEAK_SUBJECT.to_string(), payload.into())
            .await
            .context("Speak request failed")?;

        debug!("Speak reply received ({} bytes)", reply.payload.len());

        serde_json::from_slice(&reply.payload).context("Failed to parse speak reply")
    }

    /// Close NATS connection
    pub async fn close(&self) -> Result<()> {
        info!("Closing NATS connection");
        self.client
            .flush()
            .await
            .context("Failed to flush NATS connection")?;
        // async-nats handles cleanup on drop
        Ok(())
    }
}

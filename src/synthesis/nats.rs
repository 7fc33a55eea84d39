use std::sync::Arc;
use tracing::debug;

use super::sink::{OutputSink, SynthesisOutcome, SynthesisRequest};
use crate::nats::NatsClient;
use crate::session::SessionConfig;

/// Speaks through the synthesis engine over NATS request/reply
///
/// The engine plays audio on the default speaker and replies once playback
/// finishes, so a completed request means the speaker is free again.
pub struct NatsSpeechSink {
    client: Arc<NatsClient>,
    config: Arc<SessionConfig>,
}

impl NatsSpeechSink {
    pub fn new(client: Arc<NatsClient>, config: Arc<SessionConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl OutputSink for NatsSpeechSink {
    async fn speak(&self, request: &SynthesisRequest) -> SynthesisOutcome {
        debug!("Requesting speech ({} chars, voice={})", request.text.len(), request.voice_id);

        match self
            .client
            .request_speech(&request.text, &request.voice_id, &self.config)
            .await
        {
            Ok(reply) if reply.ok => SynthesisOutcome::Succeeded,
            Ok(reply) => SynthesisOutcome::failed(
                reply
                    .error
                    .unwrap_or_else(|| "synthesis engine reported failure".to_string()),
            ),
            Err(e) => SynthesisOutcome::failed(format!("{:#}", e)),
        }
    }

    fn name(&self) -> &str {
        "NATS speech synthesis"
    }
}

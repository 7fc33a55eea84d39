use tracing::info;

use super::sink::{OutputSink, SynthesisOutcome, SynthesisRequest};

/// Dry-run sink: logs what would be spoken
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait::async_trait]
impl OutputSink for LogSink {
    async fn speak(&self, request: &SynthesisRequest) -> SynthesisOutcome {
        info!("[Speak:{}]: {}", request.voice_id, request.text);
        SynthesisOutcome::Succeeded
    }

    fn name(&self) -> &str {
        "log (dry run)"
    }
}

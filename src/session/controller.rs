use super::config::SessionConfig;
use super::state::{DropReason, SessionPhase, SessionState, StopReason};
use super::stats::SessionStats;
use crate::recognition::{EventSource, RecognitionEvent};
use crate::synthesis::{OutputSink, SynthesisOutcome, SynthesisRequest};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Drives one translation session from start to stop
///
/// Owns all mutable session state. Recognition events, synthesis completion
/// and the shutdown token are all observed from the single `run` task, so
/// the dedup check, gate acquisition and gate release never race.
pub struct SessionController {
    /// Session configuration
    config: Arc<SessionConfig>,

    /// Where accepted translations are spoken
    sink: Arc<dyn OutputSink>,

    /// Dedup memory, gate and phase
    state: SessionState,

    /// Counters published after every decision
    stats: SessionStats,

    /// Latest stats for observers (HTTP API, tests)
    stats_tx: watch::Sender<SessionStats>,
}

enum Signal {
    Interrupt,
    Event(Option<RecognitionEvent>),
    SynthesisDone(Result<SynthesisOutcome, JoinError>),
}

impl SessionController {
    pub fn new(config: Arc<SessionConfig>, sink: Arc<dyn OutputSink>) -> Self {
        let stats = SessionStats::new(config.session_id.clone());
        let (stats_tx, _) = watch::channel(stats.clone());

        Self {
            config,
            sink,
            state: SessionState::new(),
            stats,
            stats_tx,
        }
    }

    /// Watch the session's stats as it runs
    pub fn subscribe(&self) -> watch::Receiver<SessionStats> {
        self.stats_tx.subscribe()
    }

    /// Run the session until the stream ends or `shutdown` is cancelled.
    ///
    /// Returns the final stats. Only a failure to start the event source is
    /// an error; engine cancellation is reported through `stop_reason`.
    pub async fn run(
        mut self,
        mut source: Box<dyn EventSource>,
        shutdown: CancellationToken,
    ) -> Result<SessionStats> {
        info!(
            "Starting translation session {} ({} -> {}, voice {}, source: {}, sink: {})",
            self.config.session_id,
            self.config.source_language,
            self.config.target_language,
            self.config.voice_id,
            source.name(),
            self.sink.name()
        );

        // An interrupted start is still followed by stop(), which withdraws
        // any start request that may already have reached the engine
        let started = tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            result = source.start() => Some(result),
        };

        let mut events = match started {
            None => {
                info!("Stop requested before recognition started");
                self.stop_source(source.as_mut()).await;
                self.finish(StopReason::Interrupted);
                return Ok(self.stats);
            }
            Some(Err(e)) => {
                error!("Failed to start event source: {:#}", e);
                self.stop_source(source.as_mut()).await;
                self.state.terminate();
                self.set_phase(SessionPhase::Stopped);
                return Err(e.context("Failed to start event source"));
            }
            Some(Ok(events)) => events,
        };

        self.set_phase(SessionPhase::Running);
        info!("Speech recognition started. Speak into your microphone...");

        let mut in_flight: Option<JoinHandle<SynthesisOutcome>> = None;
        let mut stream_ended = false;

        let reason = loop {
            let signal = tokio::select! {
                biased;
                _ = shutdown.cancelled() => Signal::Interrupt,
                joined = wait_synthesis(&mut in_flight) => Signal::SynthesisDone(joined),
                event = events.recv() => Signal::Event(event),
            };

            match signal {
                Signal::Interrupt => {
                    info!("Stopping due to interrupt");
                    break StopReason::Interrupted;
                }
                Signal::SynthesisDone(joined) => {
                    in_flight = None;
                    self.synthesis_finished(joined);
                }
                Signal::Event(None) => {
                    warn!("Recognition stream closed without a terminal event");
                    stream_ended = true;
                    break StopReason::StreamClosed;
                }
                Signal::Event(Some(event)) => {
                    if let Some(reason) = self.handle_event(event, &mut in_flight) {
                        break reason;
                    }
                }
            }
        };

        self.stop(reason, source, events, stream_ended, in_flight).await;

        Ok(self.stats)
    }

    /// Apply one recognition event. Returns a stop reason for terminal events.
    fn handle_event(
        &mut self,
        event: RecognitionEvent,
        in_flight: &mut Option<JoinHandle<SynthesisOutcome>>,
    ) -> Option<StopReason> {
        match event {
            RecognitionEvent::Partial { text } => {
                if !text.is_empty() {
                    info!("[Partial]: {}", text);
                }
                self.stats.partials += 1;
            }
            RecognitionEvent::FinalRecognized { text } => {
                info!("[Recognized]: {}", text);
                self.stats.recognized += 1;
            }
            RecognitionEvent::FinalTranslated { text } => {
                info!("[Translated]: {}", text);
                self.stats.translations += 1;

                match self.state.admit(&text) {
                    Ok(()) => {
                        info!("Attempting to speak text: {}", text);
                        *in_flight = Some(self.dispatch(text));
                    }
                    Err(DropReason::Duplicate) => {
                        debug!("Dropping repeated translation");
                        self.stats.dropped_duplicates += 1;
                    }
                    Err(DropReason::Busy) => {
                        debug!("Dropping translation, playback in progress");
                        self.stats.dropped_busy += 1;
                    }
                    Err(DropReason::Empty) => debug!("Ignoring empty translation"),
                    Err(DropReason::Terminated) => debug!("Ignoring translation, session is stopping"),
                }
            }
            RecognitionEvent::SessionStopped => {
                info!("Recognition session stopped");
                return Some(StopReason::SessionStopped);
            }
            RecognitionEvent::Canceled { reason } => {
                error!("Recognition canceled: {}", reason);
                return Some(StopReason::Canceled { reason });
            }
        }

        self.publish();
        None
    }

    /// Speak on a separate task; the gate stays closed until it is joined
    fn dispatch(&self, text: String) -> JoinHandle<SynthesisOutcome> {
        let request = SynthesisRequest::new(text, self.config.voice_id.clone());
        let sink = Arc::clone(&self.sink);
        let limit = self.config.synthesis_timeout;
        let settle = self.config.playback_settle;

        tokio::spawn(async move {
            let outcome = match tokio::time::timeout(limit, sink.speak(&request)).await {
                Ok(outcome) => outcome,
                Err(_) => SynthesisOutcome::failed(format!("synthesis timed out after {:?}", limit)),
            };

            if outcome.is_success() && !settle.is_zero() {
                tokio::time::sleep(settle).await;
            }

            outcome
        })
    }

    fn synthesis_finished(&mut self, joined: Result<SynthesisOutcome, JoinError>) {
        self.state.synthesis_finished();

        match joined {
            Ok(SynthesisOutcome::Succeeded) => {
                info!("Speech synthesis succeeded");
                self.stats.spoken += 1;
            }
            Ok(SynthesisOutcome::Failed { detail }) => {
                error!("Speech synthesis failed: {}", detail);
                self.stats.synthesis_failures += 1;
            }
            Err(e) => {
                error!("Synthesis task panicked: {}", e);
                self.stats.synthesis_failures += 1;
            }
        }

        self.publish();
    }

    /// Stopping -> Stopped: stop the source, drain its stream, let playback finish
    async fn stop(
        &mut self,
        reason: StopReason,
        mut source: Box<dyn EventSource>,
        mut events: mpsc::Receiver<RecognitionEvent>,
        stream_ended: bool,
        in_flight: Option<JoinHandle<SynthesisOutcome>>,
    ) {
        self.state.terminate();
        self.stats.stop_reason = Some(reason);
        self.set_phase(SessionPhase::Stopping);

        info!("Stopping recognition");
        let stop_timeout = self.config.stop_timeout;

        self.stop_source(source.as_mut()).await;

        if stream_ended {
            debug!("Recognition stream already closed");
        } else if !source.is_running() {
            debug!("Event source already finished, skipping drain");
        } else {
            let drain = async {
                let mut drained = 0usize;
                while let Some(event) = events.recv().await {
                    debug!("Discarding {} event received while stopping", event.kind());
                    drained += 1;
                }
                drained
            };

            match tokio::time::timeout(stop_timeout, drain).await {
                Ok(drained) => debug!("Recognition stream ended ({} events discarded)", drained),
                Err(_) => warn!("Recognition stream did not end within {:?}", stop_timeout),
            }
        }
        drop(events);

        if let Some(handle) = in_flight {
            info!("Waiting for playback to finish");
            let joined = handle.await;
            self.synthesis_finished(joined);
        }

        self.set_phase(SessionPhase::Stopped);

        info!(
            "Session {} stopped after {:.1}s: {} spoken, {} failed, {} duplicates, {} dropped while busy",
            self.stats.session_id,
            self.stats.duration_secs(),
            self.stats.spoken,
            self.stats.synthesis_failures,
            self.stats.dropped_duplicates,
            self.stats.dropped_busy
        );
    }

    /// Ask the source to stop, bounded by the stop timeout
    async fn stop_source(&self, source: &mut dyn EventSource) {
        let stop_timeout = self.config.stop_timeout;
        match tokio::time::timeout(stop_timeout, source.stop()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to stop event source: {:#}", e),
            Err(_) => warn!("Event source did not stop within {:?}", stop_timeout),
        }
    }

    /// Idle -> Stopped without ever running
    fn finish(&mut self, reason: StopReason) {
        self.state.terminate();
        self.stats.stop_reason = Some(reason);
        self.set_phase(SessionPhase::Stopped);
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        self.state.phase = phase;
        self.publish();
    }

    fn publish(&mut self) {
        self.stats.phase = self.state.phase();
        self.stats.synthesis_in_flight = self.state.synthesis_in_flight();
        self.stats.last_spoken_text = self.state.last_spoken_text().map(str::to_string);
        self.stats_tx.send_replace(self.stats.clone());
    }
}

/// Resolves when the in-flight synthesis task ends; pending when idle
async fn wait_synthesis(
    in_flight: &mut Option<JoinHandle<SynthesisOutcome>>,
) -> Result<SynthesisOutcome, JoinError> {
    match in_flight {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

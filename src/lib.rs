pub mod config;
pub mod error;
pub mod http;
pub mod nats;
pub mod recognition;
pub mod session;
pub mod synthesis;

pub use config::Config;
pub use error::ConfigError;
pub use http::{create_router, AppState};
pub use nats::NatsClient;
pub use recognition::{
    EventSource, EventSourceFactory, EventSourceKind, NatsEventSource, RecognitionEvent,
    ScriptedEventSource,
};
pub use session::{
    SessionConfig, SessionController, SessionPhase, SessionStats, StopReason,
};
pub use synthesis::{LogSink, NatsSpeechSink, OutputSink, SynthesisOutcome, SynthesisRequest};

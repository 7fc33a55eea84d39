pub mod log;
pub mod nats;
pub mod sink;

pub use self::log::LogSink;
pub use self::nats::NatsSpeechSink;
pub use self::sink::{OutputSink, SynthesisOutcome, SynthesisRequest};

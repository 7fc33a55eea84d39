//! Recognition event sources
//!
//! Wraps the external recognition/translation engine as a stream of typed
//! [`RecognitionEvent`]s. Engine failures arrive as `Canceled` events rather
//! than errors; only failing to reach the engine at all is an error.

pub mod event;
pub mod nats;
pub mod script;
pub mod source;

pub use event::RecognitionEvent;
pub use nats::NatsEventSource;
pub use script::{ScriptedEvent, ScriptedEventSource};
pub use source::{EventSource, EventSourceFactory, EventSourceKind};

//! HTTP API for controlling the running translation session
//!
//! - GET /health - Health check
//! - GET /session/status - Session statistics
//! - POST /session/stop - Stop the session gracefully

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

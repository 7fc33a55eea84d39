use thiserror::Error;

/// Configuration problems detected before a session is allowed to start
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent (named by its environment variable)
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A setting is present but unusable
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

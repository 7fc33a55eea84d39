use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;
use crate::session::SessionConfig;

/// Default config file (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config/loqa-interpreter";

/// Environment variables that override file/default settings
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("AZURE_SPEECH_API_KEY", "recognition.key"),
    ("AZURE_SPEECH_REGION", "recognition.region"),
    ("AZURE_TTS_API_KEY", "synthesis.key"),
    ("AZURE_TTS_REGION", "synthesis.region"),
    ("LOQA_SOURCE_LANGUAGE", "languages.source"),
    ("LOQA_TARGET_LANGUAGE", "languages.target"),
    ("LOQA_TARGET_VOICE", "languages.voice"),
    ("LOQA_NATS_URL", "nats.url"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub recognition: ServiceCredentials,
    #[serde(default)]
    pub synthesis: ServiceCredentials,
    pub languages: LanguageConfig,
    pub session: SessionTimingConfig,
    pub nats: NatsConfig,
    pub http: HttpConfig,
}

/// Subscription key and region for one speech service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceCredentials {
    pub key: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageConfig {
    /// Recognition language, e.g. "de-DE"
    pub source: String,
    /// Translation target, e.g. "fr"
    pub target: String,
    /// Neural voice used for playback
    pub voice: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionTimingConfig {
    pub synthesis_timeout_ms: u64,
    pub stop_timeout_ms: u64,
    pub playback_settle_ms: u64,
    pub event_buffer: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub enabled: bool,
    pub bind: String,
    pub port: u16,
}

impl Config {
    /// Load defaults, the optional config file at `path`, then process environment overrides
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::load`] with a custom environment lookup
    pub fn load_with<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .set_default("languages.source", "de-DE")?
            .set_default("languages.target", "fr")?
            .set_default("languages.voice", "fr-FR-VivienneMultilingualNeural")?
            .set_default("session.synthesis_timeout_ms", 15_000)?
            .set_default("session.stop_timeout_ms", 5_000)?
            .set_default("session.playback_settle_ms", 200)?
            .set_default("session.event_buffer", 100)?
            .set_default("nats.url", "nats://localhost:4222")?
            .set_default("http.enabled", true)?
            .set_default("http.bind", "127.0.0.1")?
            .set_default("http.port", 8095)?
            .add_source(config::File::with_name(path).required(false));

        for &(var, key) in ENV_OVERRIDES {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                builder = builder.set_override(key, value)?;
            }
        }

        let settings = builder
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Load from a file that must exist
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Self::load(&path.display().to_string())
    }

    /// Validate everything a session needs and freeze it into a [`SessionConfig`]
    pub fn session_config(&self) -> Result<Arc<SessionConfig>, ConfigError> {
        let recognition_key = required(&self.recognition.key, "AZURE_SPEECH_API_KEY")?;
        let recognition_region = required(&self.recognition.region, "AZURE_SPEECH_REGION")?;
        let synthesis_key = required(&self.synthesis.key, "AZURE_TTS_API_KEY")?;
        let synthesis_region = required(&self.synthesis.region, "AZURE_TTS_REGION")?;

        let source_language = non_empty(&self.languages.source, "LOQA_SOURCE_LANGUAGE")?;
        let target_language = non_empty(&self.languages.target, "LOQA_TARGET_LANGUAGE")?;
        let voice_id = non_empty(&self.languages.voice, "LOQA_TARGET_VOICE")?;

        if self.session.event_buffer == 0 {
            return Err(ConfigError::Invalid {
                key: "session.event_buffer",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.session.synthesis_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "session.synthesis_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Arc::new(SessionConfig {
            session_id: format!("translation-{}", uuid::Uuid::new_v4()),
            source_language,
            target_language,
            voice_id,
            recognition_key,
            recognition_region,
            synthesis_key,
            synthesis_region,
            synthesis_timeout: Duration::from_millis(self.session.synthesis_timeout_ms),
            stop_timeout: Duration::from_millis(self.session.stop_timeout_ms),
            playback_settle: Duration::from_millis(self.session.playback_settle_ms),
            event_buffer: self.session.event_buffer,
        }))
    }
}

fn required(value: &Option<String>, var: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn non_empty(value: &str, var: &'static str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ConfigError::Missing(var))
    } else {
        Ok(value.to_string())
    }
}

// Configuration loading: defaults, TOML file, environment overrides, validation

use anyhow::Result;
use loqa_interpreter::{Config, ConfigError};
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

fn full_env() -> impl Fn(&str) -> Option<String> {
    env(&[
        ("AZURE_SPEECH_API_KEY", "speech-key"),
        ("AZURE_SPEECH_REGION", "westeurope"),
        ("AZURE_TTS_API_KEY", "tts-key"),
        ("AZURE_TTS_REGION", "northeurope"),
    ])
}

fn missing_path(dir: &TempDir) -> String {
    dir.path().join("absent").display().to_string()
}

#[test]
fn test_defaults_with_credentials_from_env() -> Result<()> {
    let dir = TempDir::new()?;
    let cfg = Config::load_with(&missing_path(&dir), full_env())?;

    assert_eq!(cfg.languages.source, "de-DE");
    assert_eq!(cfg.languages.target, "fr");
    assert_eq!(cfg.languages.voice, "fr-FR-VivienneMultilingualNeural");
    assert_eq!(cfg.nats.url, "nats://localhost:4222");
    assert!(cfg.http.enabled);

    let session = cfg.session_config()?;
    assert_eq!(session.recognition_key, "speech-key");
    assert_eq!(session.recognition_region, "westeurope");
    assert_eq!(session.synthesis_key, "tts-key");
    assert_eq!(session.synthesis_region, "northeurope");
    assert_eq!(session.playback_settle, Duration::from_millis(200));
    assert_eq!(session.stop_timeout, Duration::from_secs(5));
    assert!(session.session_id.starts_with("translation-"));

    Ok(())
}

#[test]
fn test_missing_credentials_are_fatal() -> Result<()> {
    let dir = TempDir::new()?;
    let cfg = Config::load_with(
        &missing_path(&dir),
        env(&[
            ("AZURE_SPEECH_API_KEY", "speech-key"),
            ("AZURE_SPEECH_REGION", "westeurope"),
            ("AZURE_TTS_API_KEY", "tts-key"),
        ]),
    )?;

    assert_eq!(
        cfg.session_config().unwrap_err(),
        ConfigError::Missing("AZURE_TTS_REGION")
    );

    Ok(())
}

#[test]
fn test_no_credentials_at_all() -> Result<()> {
    let dir = TempDir::new()?;
    let cfg = Config::load_with(&missing_path(&dir), env(&[]))?;

    assert_eq!(
        cfg.session_config().unwrap_err(),
        ConfigError::Missing("AZURE_SPEECH_API_KEY")
    );

    Ok(())
}

#[test]
fn test_blank_env_value_counts_as_missing() -> Result<()> {
    let dir = TempDir::new()?;
    let cfg = Config::load_with(
        &missing_path(&dir),
        env(&[
            ("AZURE_SPEECH_API_KEY", "   "),
            ("AZURE_SPEECH_REGION", "westeurope"),
            ("AZURE_TTS_API_KEY", "tts-key"),
            ("AZURE_TTS_REGION", "northeurope"),
        ]),
    )?;

    assert_eq!(
        cfg.session_config().unwrap_err(),
        ConfigError::Missing("AZURE_SPEECH_API_KEY")
    );

    Ok(())
}

#[test]
fn test_file_values_and_env_precedence() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("interpreter.toml");
    fs::write(
        &path,
        r#"
[recognition]
key = "file-key"
region = "eastus"

[languages]
source = "en-US"
target = "de"
voice = "de-DE-KatjaNeural"

[session]
synthesis_timeout_ms = 8000
playback_settle_ms = 0

[http]
port = 9000
"#,
    )?;

    let cfg = Config::load_with(
        &path.display().to_string(),
        env(&[
            ("AZURE_SPEECH_REGION", "westeurope"),
            ("AZURE_TTS_API_KEY", "tts-key"),
            ("AZURE_TTS_REGION", "northeurope"),
            ("LOQA_TARGET_VOICE", "de-DE-ConradNeural"),
        ]),
    )?;

    assert_eq!(cfg.http.port, 9000);
    assert_eq!(cfg.http.bind, "127.0.0.1");

    let session = cfg.session_config()?;
    assert_eq!(session.recognition_key, "file-key");
    assert_eq!(session.recognition_region, "westeurope");
    assert_eq!(session.source_language, "en-US");
    assert_eq!(session.target_language, "de");
    assert_eq!(session.voice_id, "de-DE-ConradNeural");
    assert_eq!(session.synthesis_timeout, Duration::from_secs(8));
    assert!(session.playback_settle.is_zero());

    Ok(())
}

#[test]
fn test_zero_event_buffer_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("interpreter.toml");
    fs::write(&path, "[session]\nevent_buffer = 0\n")?;

    let cfg = Config::load_with(&path.display().to_string(), full_env())?;

    assert!(matches!(
        cfg.session_config(),
        Err(ConfigError::Invalid {
            key: "session.event_buffer",
            ..
        })
    ));

    Ok(())
}

#[test]
fn test_load_file_requires_existing_file() {
    let dir = TempDir::new().unwrap();
    assert!(Config::load_file(dir.path().join("nope.toml")).is_err());
}

// Tests for layered configuration loading

use anyhow::Result;
use babel_relay::config::{CapabilityBackend, Config};
use std::env;
use std::fs;
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

/// Environment overrides are process-wide; every `Config::load` holds this
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sets environment variables for one test and removes them on drop
struct EnvOverride(Vec<&'static str>);

impl EnvOverride {
    fn set(vars: &[(&'static str, &str)]) -> Self {
        for (key, value) in vars {
            env::set_var(key, value);
        }
        Self(vars.iter().map(|(key, _)| *key).collect())
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        for key in &self.0 {
            env::remove_var(key);
        }
    }
}

#[test]
fn test_defaults() {
    let config = Config::default();

    assert_eq!(config.service.http.port, 8000);
    assert_eq!(config.audio.utterance_bytes(), 32_000, "1s of 16-bit 16kHz mono");
    assert_eq!(config.relay.default_lang, "en-US");
    assert_eq!(config.capabilities.backend, CapabilityBackend::Google);
    assert_eq!(config.capabilities.voice_variant, "Standard-A");
    assert_eq!(config.capabilities.audio_encoding, "MP3");
}

#[test]
fn test_missing_file_falls_back_to_defaults() -> Result<()> {
    let _env = env_lock();
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("absent");

    let config = Config::load(path.to_str().unwrap())?;
    assert_eq!(config.audio.sample_rate, 16000);
    Ok(())
}

#[test]
fn test_load_partial_file() -> Result<()> {
    let _env = env_lock();
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("relay.toml");
    fs::write(
        &path,
        r#"
[audio]
sample_rate = 8000
utterance_ms = 2000

[relay]
default_lang = "es-ES"

[capabilities]
backend = "stub"
"#,
    )?;

    let config = Config::load(path.to_str().unwrap())?;

    assert_eq!(config.audio.utterance_bytes(), 32_000, "2s of 16-bit 8kHz mono");
    assert_eq!(config.audio.channels, 1, "Unset fields keep defaults");
    assert_eq!(config.relay.default_lang, "es-ES");
    assert_eq!(config.relay.outbound_queue, 64);
    assert_eq!(config.capabilities.backend, CapabilityBackend::Stub);
    Ok(())
}

#[test]
fn test_invalid_backend_is_rejected() -> Result<()> {
    let _env = env_lock();
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("relay.toml");
    fs::write(&path, "[capabilities]\nbackend = \"carrier-pigeon\"\n")?;

    assert!(Config::load(path.to_str().unwrap()).is_err());
    Ok(())
}

#[test]
fn test_shipped_config_parses() -> Result<()> {
    let _env = env_lock();
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config/babel-relay"))?;
    assert_eq!(config.service.name, "babel-relay");
    assert_eq!(config.audio.utterance_bytes(), 32_000);
    Ok(())
}

#[test]
fn test_environment_overrides_file() -> Result<()> {
    let _env = env_lock();
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("relay.toml");
    fs::write(
        &path,
        "[relay]\ndefault_lang = \"es-ES\"\n\n[google]\napi_key = \"from-file\"\n",
    )?;

    let _overrides = EnvOverride::set(&[
        ("BABEL_RELAY__GOOGLE__API_KEY", "from-env"),
        ("BABEL_RELAY__RELAY__DEFAULT_LANG", "pt-BR"),
        ("BABEL_RELAY__AUDIO__UTTERANCE_MS", "500"),
    ]);
    let config = Config::load(path.to_str().unwrap())?;

    assert_eq!(config.google.api_key, "from-env");
    assert_eq!(config.relay.default_lang, "pt-BR");
    assert_eq!(config.audio.utterance_ms, 500, "Numeric values are parsed");
    assert_eq!(config.audio.utterance_bytes(), 16_000);
    assert_eq!(config.service.http.port, 8000, "Untouched fields keep defaults");
    Ok(())
}

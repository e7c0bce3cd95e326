//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `hued.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule engine settings.
    pub engine: EngineConfig,
    /// Host presence probe settings.
    pub probe: ProbeConfig,
    /// Sun data API settings.
    pub sun: SunConfig,
    /// Lighting backend selection.
    pub lighting: LightingConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Rule engine configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding `events.yml`, `scenes.yml`, `rules.yml` and
    /// `bridge.yml`.
    pub config_dir: PathBuf,
    /// Seconds between evaluation passes.
    pub interval_secs: u64,
    /// Flash every light once at start-up.
    pub blink: bool,
}

/// `ping` probe configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
}

/// sunrise-sunset.org client configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

/// Which lighting service to drive.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub backend: Backend,
}

/// Lighting backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A Hue bridge described by `bridge.yml`; falls back to virtual lights
    /// when that file is missing.
    #[default]
    Hue,
    /// Simulated lights.
    Virtual,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `hued.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("hued.toml")?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HUED_CONFIG_DIR") {
            self.engine.config_dir = PathBuf::from(val);
        }
        if let Some(val) = var("HUED_INTERVAL") {
            if let Ok(secs) = val.parse() {
                self.engine.interval_secs = secs;
            }
        }
        if let Some(val) = var("HUED_BLINK") {
            self.engine.blink = is_enabled(&val);
        }
        if let Some(val) = var("HUED_BACKEND") {
            match val.to_ascii_lowercase().as_str() {
                "hue" => self.lighting.backend = Backend::Hue,
                "virtual" => self.lighting.backend = Backend::Virtual,
                _ => {}
            }
        }
        if let Some(val) = var("HUED_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if var("HUED_DEBUG").is_some_and(|val| is_enabled(&val)) {
            self.logging.filter = "hued=debug".to_string();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the bridge connection file.
    #[must_use]
    pub fn bridge_file(&self) -> PathBuf {
        self.engine.config_dir.join("bridge.yml")
    }
}

fn is_enabled(val: &str) -> bool {
    matches!(val.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl EngineConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl ProbeConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SunConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("."),
            interval_secs: 5,
            blink: false,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_secs: 3 }
    }
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.sunrise-sunset.org/json".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hued=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

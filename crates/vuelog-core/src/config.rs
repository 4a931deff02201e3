//! Configuration types for vuelog.
//!
//! [`Config::load`] layers, in order: the embedded defaults, the config file
//! (an explicit path, or `$XDG_CONFIG_HOME/vuelog/config.toml` when present),
//! and `VUELOG__<SECTION>__<KEY>` environment variables.
//! [`Config::defaults`] returns the embedded defaults alone (useful in tests).

use crate::classifier::{Classifier, LinePattern, PatternError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[ingest]
device_name = "emporia-vue"

[drain]
interval_ms = 2000

[sink]
kind = "stdout"
path = "vuelog.lp"

[classifier]
legacy_patterns = true
extra_patterns  = []
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub drain: DrainConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// `[ingest]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Tag for fallback log rows when the transport does not name the device.
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

fn default_device_name() -> String { "emporia-vue".to_string() }

impl Default for IngestConfig {
    fn default() -> Self {
        Self { device_name: default_device_name() }
    }
}

/// `[drain]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DrainConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 { 2000 }

impl DrainConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self { interval_ms: default_interval_ms() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Stdout,
    File,
}

/// `[sink]` section. `path` is only read for `kind = "file"`.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    #[serde(default = "default_sink_kind")]
    pub kind: SinkKind,
    #[serde(default = "default_sink_path")]
    pub path: PathBuf,
}

fn default_sink_kind() -> SinkKind { SinkKind::Stdout }
fn default_sink_path() -> PathBuf { PathBuf::from("vuelog.lp") }

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: default_sink_kind(),
            path: default_sink_path(),
        }
    }
}

/// An extra line-format generation from the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    pub name: String,
    pub regex: String,
}

/// `[classifier]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_legacy_patterns")]
    pub legacy_patterns: bool,
    #[serde(default)]
    pub extra_patterns: Vec<PatternConfig>,
}

fn default_legacy_patterns() -> bool { true }

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            legacy_patterns: default_legacy_patterns(),
            extra_patterns: Vec::new(),
        }
    }
}

impl ClassifierConfig {
    /// Build the ordered generation list: built-ins first, extras after.
    pub fn build(&self) -> Result<Classifier, PatternError> {
        let mut classifier = if self.legacy_patterns {
            Classifier::with_legacy()
        } else {
            Classifier::current()
        };
        for extra in &self.extra_patterns {
            classifier.push(LinePattern::new(&extra.name, &extra.regex)?);
        }
        Ok(classifier)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration. An explicit `path` must exist; the
    /// default path is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::from(config_path().as_path()).required(false),
        };

        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("VUELOG")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        // Surface bad patterns at startup rather than on the first line.
        cfg.classifier.build()?;
        Ok(cfg)
    }

    pub fn defaults() -> Self {
        Self::from_toml_str("").expect("built-in default config must be valid")
    }

    /// Parse `src` layered over the built-in defaults.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        cfg.classifier.build()?;
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("vuelog")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

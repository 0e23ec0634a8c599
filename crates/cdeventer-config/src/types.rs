//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [sink]
//! url = "http://broker-ingress.knative-eventing.svc.cluster.local/default/events-broker"
//! mode = "binary"
//!
//! [logging]
//! level = "cdeventer=debug,info"
//! dir = "/var/log/cdeventer"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use cdeventer_types::ContentMode;

use crate::error::{ConfigError, Result};

/// Knative eventing broker ingress for the `default` namespace.
pub const DEFAULT_SINK_URL: &str =
    "http://broker-ingress.knative-eventing.svc.cluster.local/default/events-broker";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdeventerConfig {
    /// Event sink configuration.
    pub sink: Option<SinkConfig>,

    /// Log output configuration.
    pub logging: Option<LoggingConfig>,
}

impl CdeventerConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: CdeventerConfig) {
        if other.sink.is_some() {
            self.sink = other.sink;
        }

        if other.logging.is_some() {
            self.logging = other.logging;
        }
    }

    /// The sink section, or its defaults.
    pub fn sink(&self) -> SinkConfig {
        self.sink.clone().unwrap_or_default()
    }

    /// The logging section, or its defaults.
    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// Where and how CloudEvents are delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Target URL for every delivery.
    pub url: String,
    /// CloudEvents HTTP content mode.
    pub mode: ContentMode,
    /// Custom user agent for outbound requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SINK_URL.to_string(),
            mode: ContentMode::default(),
            user_agent: None,
        }
    }
}

impl SinkConfig {
    /// Parse and check the target URL.
    pub fn target(&self) -> Result<Url> {
        let url = Url::parse(&self.url).map_err(|e| ConfigError::InvalidSinkUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidSinkUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Console filter directive (`EnvFilter` syntax).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for daily-rotated JSON logs. No file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

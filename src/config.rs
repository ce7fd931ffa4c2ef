//! Configuration for analysis-studio
//!
//! Settings are layered, later sources winning:
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `<config_dir>/analysis-studio/config.toml`)
//! 3. Environment variables prefixed `STUDIO__` (e.g. `STUDIO__BACKEND__URL`)
//!
//! CLI flags are applied on top by the binary.

use crate::controller::OverlapPolicy;
use crate::error::{Result, StudioError};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default analysis endpoint
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000/analyze";

/// Default UI tick rate in milliseconds
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

/// Studio configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// How overlapping runs and loads are treated
    #[serde(default)]
    pub overlap: OverlapPolicy,

    /// Event poll interval for the terminal UI
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Analysis backend settings
    #[serde(default)]
    pub backend: BackendConfig,
}

/// `[backend]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Endpoint receiving `POST {"code": ...}`
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Per-request timeout; unset means wait indefinitely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_tick_rate() -> u64 {
    DEFAULT_TICK_RATE_MS
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: None,
        }
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            overlap: OverlapPolicy::default(),
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
            backend: BackendConfig::default(),
        }
    }
}

/// Location of the per-user config file, if the platform has one
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("analysis-studio").join("config.toml"))
}

impl StudioConfig {
    /// Load configuration from defaults, a TOML file and the environment
    ///
    /// An explicit `path` must exist; the per-user default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("overlap", "last-writer-wins")?
            .set_default("tick_rate_ms", DEFAULT_TICK_RATE_MS as i64)?
            .set_default("backend.url", DEFAULT_BACKEND_URL)?;

        match path {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
            }
            None => {
                if let Some(default_path) = default_config_path() {
                    debug!("Checking for config at {}", default_path.display());
                    builder = builder.add_source(
                        File::from(default_path)
                            .format(FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("STUDIO")
                .separator("__")
                .try_parsing(true),
        );

        let config: StudioConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work
    pub fn validate(&self) -> Result<()> {
        if self.backend.url.trim().is_empty() {
            return Err(StudioError::InvalidConfig(
                "backend.url cannot be empty".to_string(),
            ));
        }
        if self.tick_rate_ms == 0 {
            return Err(StudioError::InvalidConfig(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }
        if self.backend.timeout_secs == Some(0) {
            return Err(StudioError::InvalidConfig(
                "backend.timeout_secs must be greater than zero when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| StudioError::Serialization(e.to_string()))
    }
}

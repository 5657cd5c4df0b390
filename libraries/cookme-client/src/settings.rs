/// Client settings
use crate::deep_link::{DEFAULT_DETAIL_DELAY_MS, DEFAULT_SCHEME};
use crate::error::{ClientError, Result};
use crate::search::DEFAULT_DEBOUNCE_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings file read from the working directory when present
pub const DEFAULT_SETTINGS_FILE: &str = "cookme.toml";

/// Prefix of environment overrides (`COOKME_API_URL`, ...)
pub const ENV_PREFIX: &str = "COOKME";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Directory holding the persisted session token
    #[serde(default = "default_token_dir")]
    pub token_dir: PathBuf,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    #[serde(default = "default_deep_link_scheme")]
    pub deep_link_scheme: String,

    #[serde(default = "default_deep_link_delay_ms")]
    pub deep_link_delay_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_dir: default_token_dir(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            search_debounce_ms: default_search_debounce_ms(),
            deep_link_scheme: default_deep_link_scheme(),
            deep_link_delay_ms: default_deep_link_delay_ms(),
        }
    }
}

impl ClientSettings {
    /// Load settings from `cookme.toml` (if it exists) and the environment
    pub fn load() -> Result<Self> {
        let path = PathBuf::from(DEFAULT_SETTINGS_FILE);
        Self::load_from(path.exists().then_some(path.as_path()))
    }

    /// Load settings from an explicit file (required when given) and the
    /// environment. Environment variables win over the file.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = file {
            settings = settings.add_source(config::File::from(path).required(true));
        }

        // Override with environment variables (prefixed with COOKME_)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(ClientError::Config(
                "API URL is required (set COOKME_API_URL)".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(ClientError::Config(
                "Timeouts must be at least one second".to_string(),
            ));
        }

        if self.deep_link_scheme.is_empty() {
            return Err(ClientError::Config(
                "Deep link scheme cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn deep_link_delay(&self) -> Duration {
        Duration::from_millis(self.deep_link_delay_ms)
    }
}

// Default values
fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_token_dir() -> PathBuf {
    PathBuf::from("./.cookme")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_deep_link_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_deep_link_delay_ms() -> u64 {
    DEFAULT_DETAIL_DELAY_MS
}

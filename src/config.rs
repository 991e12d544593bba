//! Server configuration
//!
//! Settings are layered in this order (later wins):
//! 1. Built-in defaults
//! 2. TOML config file (`--config` path, or the platform config directory)
//! 3. `AGENT_ASSIST_*` environment variables
//!
//! `GOOGLE_APPLICATION_CREDENTIALS` and `GOOGLE_CLOUD_PROJECT` are used when
//! the credentials file or project are not set by any layer.

use crate::error::Result;
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Prefix for environment overrides (e.g. AGENT_ASSIST_PROJECT_ID)
pub const ENV_PREFIX: &str = "AGENT_ASSIST";

/// Location used when none is configured
pub const DEFAULT_LOCATION: &str = "global";

const DEFAULT_ENDPOINT: &str = "https://dialogflow.googleapis.com";

/// Runtime settings for the server and the Dialogflow client
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Google Cloud project ID
    #[serde(default)]
    pub project_id: Option<String>,

    /// Dialogflow location (e.g. "global", "us-central1")
    pub location: String,

    /// Service account JSON file used to initialize at startup
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,

    /// Override for the API base URL
    #[serde(default)]
    pub api_endpoint: Option<String>,

    pub request_timeout_secs: u64,

    pub operation_poll_interval_ms: u64,

    pub operation_timeout_secs: u64,

    /// Default language for text queries and new resources
    pub language_code: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_id: None,
            location: DEFAULT_LOCATION.to_string(),
            credentials_file: None,
            api_endpoint: None,
            request_timeout_secs: 30,
            operation_poll_interval_ms: 2000,
            operation_timeout_secs: 300,
            language_code: "en-US".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, config file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("location", defaults.location.clone())?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default(
                "operation_poll_interval_ms",
                defaults.operation_poll_interval_ms as i64,
            )?
            .set_default(
                "operation_timeout_secs",
                defaults.operation_timeout_secs as i64,
            )?
            .set_default("language_code", defaults.language_code.clone())?;

        match config_path {
            Some(path) => {
                debug!("Loading config file: {}", path.display());
                builder = builder
                    .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(true));
            }
            None => {
                if let Some(path) = Self::default_config_path() {
                    debug!("Checking default config file: {}", path.display());
                    builder = builder.add_source(
                        File::new(&path.to_string_lossy(), FileFormat::Toml).required(false),
                    );
                }
            }
        }

        let mut settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.credentials_file.is_none() {
            settings.credentials_file = non_empty_env("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from);
        }
        if settings.project_id.is_none() {
            settings.project_id = non_empty_env("GOOGLE_CLOUD_PROJECT");
        }

        Ok(settings)
    }

    /// Platform config file location (e.g. ~/.config/agent-assist-mcp/config.toml)
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "agent-assist-mcp", "agent-assist-mcp")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Base URL for the given location, honouring `api_endpoint`
    pub fn endpoint_for(&self, location: &str) -> String {
        if let Some(endpoint) = &self.api_endpoint {
            return endpoint.trim_end_matches('/').to_string();
        }

        if location == DEFAULT_LOCATION {
            DEFAULT_ENDPOINT.to_string()
        } else {
            format!("https://{}-dialogflow.googleapis.com", location)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn operation_poll_interval(&self) -> Duration {
        Duration::from_millis(self.operation_poll_interval_ms)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

//! Configuration loading for the database service client
//!
//! Configuration is stored in TOML. `${VAR}` and `${VAR:-default}` references
//! are expanded from the environment before parsing.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use super::error::{ConfigError, Result};

/// User agent string sent with every request
const DBAAS_USER_AGENT: &str = concat!("dbaas-core/", env!("CARGO_PKG_VERSION"));

/// Settings for [`HttpServiceClient`](crate::http::HttpServiceClient)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the database service, e.g. `https://db.example.com/v1.0/<project>`
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent override
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Extra headers sent with every request
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    DBAAS_USER_AGENT.to_string()
}

impl ClientConfig {
    /// Create a config for `endpoint` with default transport settings
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            headers: BTreeMap::new(),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a header sent with every request
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Request timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse configuration from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let expanded = Self::expand_env_vars(content);
        let config: ClientConfig = toml::from_str(&expanded)?;
        config.normalized_endpoint()?;
        Ok(config)
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Err(ConfigError::NotFound {
                path: config_path.display().to_string(),
            });
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Self::from_toml_str(&content)
    }

    /// Platform-specific location of the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("io", "dbaas", "dbaas").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("client.toml"))
    }

    /// Endpoint parsed and normalised to end with `/`
    ///
    /// Resource paths are appended to the endpoint verbatim, so the trailing
    /// slash keeps the last path segment from being replaced.
    pub fn normalized_endpoint(&self) -> Result<String> {
        let invalid = |reason: String| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason,
        };

        let url = Url::parse(self.endpoint.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        let mut endpoint = url.to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        Ok(endpoint)
    }

    /// Expand environment variables in configuration content
    ///
    /// Unset variables are left as-is.
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok()).to_string()
    }
}

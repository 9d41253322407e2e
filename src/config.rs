//! Client configuration
//!
//! Settings needed to talk to a portal, loadable from a YAML or JSON file
//! and from environment variables.

use crate::error::{Error, Result};
use crate::http::RestClientConfig;
use crate::plan::MAX_ENTRIES_PER_COMMAND;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the base URL
pub const ENV_BASE_URL: &str = "BATCHLIST_BASE_URL";

/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "BATCHLIST_TIMEOUT_SECS";

/// Connection and listing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST endpoint (webhook or OAuth endpoint)
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Custom user agent
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Entries per page used when planning batches
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u64 {
    MAX_ENTRIES_PER_COMMAND
}

impl ClientConfig {
    /// Create a config for the given base URL with defaults elsewhere
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            headers: HashMap::new(),
            page_size: default_page_size(),
        }
    }

    /// Read the config from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(ENV_BASE_URL).map_err(|_| Error::missing_field(ENV_BASE_URL))?;
        let mut config = Self::new(base_url);

        if let Ok(timeout) = std::env::var(ENV_TIMEOUT_SECS) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::config(format!("{ENV_TIMEOUT_SECS} must be a number, got '{timeout}'"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document (JSON is valid YAML too)
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        url::Url::parse(&self.base_url)?;
        if self.page_size == 0 {
            return Err(Error::config("page_size must be positive"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Convert into HTTP client settings
    pub fn to_client_config(&self) -> RestClientConfig {
        let mut builder = RestClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(self.timeout());
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }
}

/// Load a config file, picking the parser from the extension
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        ClientConfig::from_json_str(&content)
    } else {
        ClientConfig::from_yaml_str(&content)
    }
}

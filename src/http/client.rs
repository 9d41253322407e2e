//! REST client for single and batch calls
//!
//! Implements [`CallExecutor`] and [`BatchExecutor`] on top of reqwest so a
//! [`Lister`](crate::list::Lister) can run against a live portal.

use super::query::build_query;
use crate::error::{Error, Result};
use crate::list::{BatchExecutor, CallExecutor};
use crate::payload::{BatchResponse, Command, SingleResponse};
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Method name of the batch endpoint
pub const BATCH_METHOD: &str = "batch";

/// Configuration for the REST client
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Base URL, e.g. `https://portal.example.com/rest/1/token`
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("batchlist/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RestClientConfig {
    /// Create a new config builder
    pub fn builder() -> RestClientConfigBuilder {
        RestClientConfigBuilder::default()
    }
}

/// Builder for REST client config
#[derive(Default)]
pub struct RestClientConfigBuilder {
    config: RestClientConfig,
}

impl RestClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> RestClientConfig {
        self.config
    }
}

/// Body of a failed request
#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Body of a batch response
#[derive(Debug, Deserialize)]
struct BatchEnvelope {
    #[serde(default)]
    result: BatchResponse,
    #[serde(default)]
    time: JsonValue,
}

/// REST client issuing single and batch calls.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    config: Arc<RestClientConfig>,
    base_url: Url,
}

impl RestClient {
    /// Create a client from configuration
    pub fn new(config: RestClientConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
            base_url,
        })
    }

    /// Create a client for the given base URL with default settings
    pub fn from_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(RestClientConfig::builder().base_url(base_url).build())
    }

    /// Get the configuration
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Endpoint URL for a method
    pub fn method_url(&self, method: &str) -> Result<Url> {
        let method = method.trim().trim_start_matches('/');
        let method = method.strip_suffix(".json").unwrap_or(method);
        let url = format!("{}/{method}.json", self.base_url.as_str().trim_end_matches('/'));
        Ok(Url::parse(&url)?)
    }

    /// POST a JSON body to a method and return the raw response body
    pub async fn post(&self, method: &str, body: &JsonValue) -> Result<JsonValue> {
        let url = self.method_url(method)?;

        let mut req = self.client.post(url.clone()).json(body);
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ApiError>(&text) {
                Ok(api) => Error::api(api.error, api.error_description),
                Err(_) => Error::http_status(status.as_u16(), text),
            });
        }

        let value: JsonValue = serde_json::from_str(&text)
            .map_err(|e| Error::decode(format!("{method}: invalid JSON body: {e}")))?;

        // Some errors arrive with a 200 status
        if value.get("result").is_none() {
            if let Ok(api) = serde_json::from_value::<ApiError>(value.clone()) {
                return Err(Error::api(api.error, api.error_description));
            }
        }

        debug!("Request succeeded: POST {}", url);
        Ok(value)
    }

    /// Call a method and decode the body into `T`
    pub async fn post_as<T: DeserializeOwned>(&self, method: &str, body: &JsonValue) -> Result<T> {
        let value = self.post(method, body).await?;
        serde_json::from_value(value)
            .map_err(|e| Error::decode(format!("{method}: unexpected response shape: {e}")))
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(e)
        }
    }
}

/// Encode commands as the `cmd` object of a batch request.
///
/// Keys are `cmd0`, `cmd1`, ... in command order.
pub(crate) fn batch_body(commands: &[Command]) -> JsonValue {
    let cmd: JsonObject = commands
        .iter()
        .enumerate()
        .map(|(i, command)| {
            let query = build_query(&command.params);
            let line = if query.is_empty() {
                command.method.clone()
            } else {
                format!("{}?{query}", command.method)
            };
            (format!("cmd{i}"), JsonValue::String(line))
        })
        .collect();

    json!({ "halt": 0, "cmd": cmd })
}

#[async_trait]
impl CallExecutor for RestClient {
    async fn call(&self, command: &Command) -> Result<SingleResponse> {
        let body = JsonValue::Object(command.params.clone());
        self.post_as(&command.method, &body).await
    }
}

#[async_trait]
impl BatchExecutor for RestClient {
    async fn batch(&self, commands: &[Command]) -> Result<BatchResponse> {
        let envelope: BatchEnvelope = self.post_as(BATCH_METHOD, &batch_body(commands)).await?;
        let mut response = envelope.result;
        response.time = envelope.time;
        Ok(response)
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.config.timeout)
            .field("user_agent", &self.config.user_agent)
            .finish_non_exhaustive()
    }
}

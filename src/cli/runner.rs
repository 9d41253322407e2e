//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, ClientConfig};
use crate::error::{Error, Result};
use crate::http::RestClient;
use crate::list::{CallExecutor, Lister};
use crate::methods::MethodRegistry;
use crate::payload::Command;
use crate::types::{JsonValue, Params};
use serde_json::json;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List {
                method,
                params,
                entries_only,
            } => self.list(method, params.as_deref(), *entries_only).await,
            Commands::Call { method, params } => self.call(method, params.as_deref()).await,
            Commands::Methods => self.methods(),
        }
    }

    /// Resolve client settings: config file, then `--base-url`, then environment
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match (&self.cli.config, &self.cli.base_url) {
            (Some(path), _) => load_config(path)?,
            (None, Some(url)) => ClientConfig::new(url.clone()),
            (None, None) => return ClientConfig::from_env(),
        };

        if let Some(url) = &self.cli.base_url {
            config.base_url.clone_from(url);
        }
        config.validate()?;
        Ok(config)
    }

    fn client(&self) -> Result<(RestClient, ClientConfig)> {
        let config = self.client_config()?;
        debug!("Using endpoint {}", config.base_url);
        let client = RestClient::new(config.to_client_config())?;
        Ok((client, config))
    }

    async fn list(&self, method: &str, params: Option<&str>, entries_only: bool) -> Result<()> {
        let params = parse_params(params)?;
        let (client, config) = self.client()?;
        let lister = Lister::shared(client).with_page_size(config.page_size);

        let payload = lister.list(method, params).await?;
        info!(
            "{method}: fetched {} entries (total {})",
            payload.len(),
            payload.total
        );

        let output = if entries_only {
            JsonValue::Array(payload.result)
        } else {
            serde_json::to_value(&payload)?
        };
        println!("{}", self.render(&output)?);
        Ok(())
    }

    async fn call(&self, method: &str, params: Option<&str>) -> Result<()> {
        let params = parse_params(params)?;
        let (client, _) = self.client()?;

        let page = client.call(&Command::new(method, params)).await?;
        let output = json!({
            "result": page.result,
            "total": page.total,
            "next": page.next,
            "error": page.error,
            "time": page.time,
        });
        println!("{}", self.render(&output)?);
        Ok(())
    }

    fn methods(&self) -> Result<()> {
        let registry = MethodRegistry::builtin();
        let methods: Vec<&str> = registry.listable_methods().collect();
        println!("{}", self.render(&json!(methods))?);
        Ok(())
    }

    fn render(&self, value: &JsonValue) -> Result<String> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        Ok(rendered)
    }
}

/// Parse `--params`; absent means no parameters
fn parse_params(raw: Option<&str>) -> Result<Params> {
    let Some(raw) = raw else {
        return Ok(Params::new());
    };

    match serde_json::from_str::<JsonValue>(raw)? {
        JsonValue::Object(params) => Ok(params),
        other => Err(Error::invalid_params(format!(
            "--params must be a JSON object, got {other}"
        ))),
    }
}

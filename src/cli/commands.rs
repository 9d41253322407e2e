//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Batched pagination client for REST list methods
#[derive(Parser, Debug)]
#[command(name = "batchlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the REST endpoint (overrides the config file)
    #[arg(short, long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every entry of a list method
    List {
        /// Method name (e.g. crm.deal.list)
        method: String,

        /// Parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,

        /// Print only the entries
        #[arg(long)]
        entries_only: bool,
    },

    /// Issue a single call and print the page
    Call {
        /// Method name
        method: String,

        /// Parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,
    },

    /// List methods that support full listing
    Methods,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let cli = Cli::parse_from([
            "batchlist",
            "--base-url",
            "https://portal.example.com/rest/1/abc",
            "list",
            "crm.deal.list",
            "--params",
            r#"{"select":["ID"]}"#,
        ]);

        assert_eq!(
            cli.base_url.as_deref(),
            Some("https://portal.example.com/rest/1/abc")
        );
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::List {
                method,
                params,
                entries_only,
            } => {
                assert_eq!(method, "crm.deal.list");
                assert_eq!(params.as_deref(), Some(r#"{"select":["ID"]}"#));
                assert!(!entries_only);
            }
            other => panic!("Expected List, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["batchlist", "methods", "-f", "pretty", "-v"]);
        assert!(matches!(cli.command, Commands::Methods));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
    }
}

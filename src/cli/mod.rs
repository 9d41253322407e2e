//! CLI module
//!
//! Command-line interface for listing against a portal.
//!
//! # Commands
//!
//! - `list` - Fetch every entry of a list method
//! - `call` - Issue one call and print the raw page
//! - `methods` - Show the methods `list` accepts

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

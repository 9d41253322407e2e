// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # batchlist
//!
//! Automatic pagination for REST list methods that return 50 entries per
//! call plus a `next` offset.
//!
//! ## Features
//!
//! - **One call, whole listing**: `Lister::list` returns every entry
//! - **Batched follow-ups**: remaining pages go out as one batch request
//! - **Shape-tolerant merging**: arrays, `items` wrappers and scalars are
//!   flattened into one ordered result
//! - **Pluggable transport**: any `CallExecutor` / `BatchExecutor` pair works;
//!   `http::RestClient` is the reqwest-backed default
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use batchlist::{http::RestClient, list::Lister, Params, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = RestClient::from_url("https://portal.example.com/rest/1/token")?;
//!     let lister = Lister::shared(client);
//!
//!     let deals = lister.list("crm.deal.list", Params::new()).await?;
//!     println!("{} of {} deals", deals.len(), deals.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │          Lister::list(method, params)                │
//! └──────────────────────────────────────────────────────┘
//!        │ first call        │ plan          │ merge
//! ┌──────┴──────┐    ┌───────┴──────┐  ┌─────┴────────┐
//! │CallExecutor │    │ plan_followup│  │ batch_to_list│
//! │BatchExecutor│    │  _commands   │  │  _payload    │
//! └─────────────┘    └──────────────┘  └──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Request and response payloads
pub mod payload;

/// Listable method registry
pub mod methods;

/// Batch result aggregation
pub mod aggregate;

/// Follow-up command planning
pub mod plan;

/// List orchestration
pub mod list;

/// reqwest-backed executors
pub mod http;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use aggregate::{batch_to_list_payload, highest};
pub use list::{BatchExecutor, CallExecutor, Lister};
pub use payload::{BatchEntry, BatchResponse, Command, ListPayload, SingleResponse};
pub use plan::{plan_followup_commands, MAX_ENTRIES_PER_COMMAND};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

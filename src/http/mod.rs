//! HTTP module
//!
//! reqwest-backed executors for the listing API.
//!
//! # Features
//!
//! - **Single calls**: `POST {base_url}/{method}.json` with a JSON body
//! - **Batches**: `POST {base_url}/batch.json` with every command encoded as
//!   `method?query`
//! - **Error mapping**: API error bodies, HTTP status, timeouts and decode
//!   failures each get their own error variant
//!
//! One attempt per request. Retrying and throttling are left to callers.

mod client;
mod query;

pub use client::{RestClient, RestClientConfig, RestClientConfigBuilder, BATCH_METHOD};
pub use query::build_query;

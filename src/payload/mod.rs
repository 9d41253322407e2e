//! Payload module
//!
//! Request and response shapes exchanged with the listing API.
//!
//! # Overview
//!
//! - `Command` - a method name plus its parameter bag
//! - `SingleResponse` - one page returned by a single call
//! - `BatchResponse` - keyed per-command results of a batch call
//! - `ListPayload` - the merged result handed back to callers
//!
//! Keyed maps keep the order in which the server listed the keys, which is
//! the order the commands were submitted in. Merging relies on that.

mod types;

pub use types::{BatchEntry, BatchResponse, Command, KeyedMap, ListPayload, SingleResponse};

//! List orchestration module
//!
//! Turns one logical list request into as many page requests as needed.
//!
//! # Overview
//!
//! 1. One single call at the requested `start`.
//! 2. If the page reports no `next`, that page is the whole listing.
//! 3. Otherwise every page from `start` up to the reported `total` is
//!    planned and sent as a single batch, and the batch results are merged.
//!
//! The first page is requested again as part of the batch and the entries of
//! the initial call are dropped. The merged payload is built from batch
//! results only.

mod types;

pub use types::{BatchExecutor, CallExecutor};

use crate::aggregate::batch_to_list_payload;
use crate::error::{Error, Result};
use crate::methods::MethodRegistry;
use crate::payload::{Command, ListPayload};
use crate::plan::{plan_followup_commands, MAX_ENTRIES_PER_COMMAND};
use crate::types::{start_offset, Params};
use tracing::{debug, warn};

/// Orchestrates full listings over a call and a batch executor
#[derive(Debug, Clone)]
pub struct Lister<C, B> {
    /// Single call executor
    call: C,
    /// Batch executor
    batch: B,
    /// Methods allowed to be listed
    registry: MethodRegistry,
    /// Entries per page
    page_size: u64,
}

impl<C, B> Lister<C, B>
where
    C: CallExecutor,
    B: BatchExecutor,
{
    /// Bind a lister to its collaborators
    pub fn new(call: C, batch: B) -> Self {
        Self {
            call,
            batch,
            registry: MethodRegistry::default(),
            page_size: MAX_ENTRIES_PER_COMMAND,
        }
    }

    /// Replace the method registry
    #[must_use]
    pub fn with_registry(mut self, registry: MethodRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Override the page size used for planning.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is zero.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        assert!(page_size > 0, "page size must be positive");
        self.page_size = page_size;
        self
    }

    /// Get the method registry
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Get the page size
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Fetch every entry from `params.start` (default 0) to the end.
    ///
    /// Fails if the method is not listable, if `start` is not a non-negative
    /// integer, or if either collaborator fails. No partial result is
    /// returned on failure.
    pub async fn list(&self, method: &str, params: Params) -> Result<ListPayload> {
        if !self.registry.is_listable(method) {
            return Err(Error::not_listable(method));
        }

        let start = start_offset(&params).ok_or_else(|| {
            Error::invalid_params(format!(
                "'start' must be a non-negative integer, got {}",
                params.get("start").map(ToString::to_string).unwrap_or_default()
            ))
        })?;

        let request = Command::new(method, params);
        let first = self.call.call(&request.at_start(start)).await?;

        debug!(
            "{method}: first call returned {} entries, total {}, next {:?}",
            first.result.len(),
            first.total,
            first.next
        );

        if !first.has_more() {
            return Ok(first.into_list_payload());
        }

        let commands = plan_followup_commands(&request, start, first.total, self.page_size);
        if commands.is_empty() {
            debug!(
                "{method}: total {} does not exceed start {start}, skipping batch",
                first.total
            );
            return Ok(first.into_list_payload());
        }

        debug!("{method}: dispatching batch of {} commands", commands.len());
        let response = self.batch.batch(&commands).await?;
        let payload = batch_to_list_payload(response);

        debug!(
            "{method}: merged {} entries, total {}",
            payload.len(),
            payload.total
        );
        if payload.has_errors() {
            warn!("{method}: batch reported errors: {}", payload.error.trim());
        }

        Ok(payload)
    }
}

impl<T> Lister<T, T>
where
    T: CallExecutor + BatchExecutor + Clone,
{
    /// Bind a lister to one executor serving both calls and batches
    pub fn shared(executor: T) -> Self {
        Self::new(executor.clone(), executor)
    }
}

#[cfg(test)]
mod tests;

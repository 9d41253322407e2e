//! Collaborator traits
//!
//! The orchestrator never talks to the network itself. It is handed one
//! executor for single calls and one for batches.

use crate::error::Result;
use crate::payload::{BatchResponse, Command, SingleResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Executes one method call
#[async_trait]
pub trait CallExecutor: Send + Sync {
    /// Issue the command and return its page
    async fn call(&self, command: &Command) -> Result<SingleResponse>;
}

/// Executes several method calls as one batch
#[async_trait]
pub trait BatchExecutor: Send + Sync {
    /// Issue all commands together.
    ///
    /// Keys of the returned maps must follow the order of `commands`.
    async fn batch(&self, commands: &[Command]) -> Result<BatchResponse>;
}

#[async_trait]
impl<T: CallExecutor + ?Sized> CallExecutor for Arc<T> {
    async fn call(&self, command: &Command) -> Result<SingleResponse> {
        (**self).call(command).await
    }
}

#[async_trait]
impl<T: BatchExecutor + ?Sized> BatchExecutor for Arc<T> {
    async fn batch(&self, commands: &[Command]) -> Result<BatchResponse> {
        (**self).batch(commands).await
    }
}

#[async_trait]
impl<'a, T: CallExecutor + ?Sized> CallExecutor for &'a T {
    async fn call(&self, command: &Command) -> Result<SingleResponse> {
        (**self).call(command).await
    }
}

#[async_trait]
impl<'a, T: BatchExecutor + ?Sized> BatchExecutor for &'a T {
    async fn batch(&self, commands: &[Command]) -> Result<BatchResponse> {
        (**self).batch(commands).await
    }
}

//! Job queue seam. Work for the out-of-process generation and e-mail workers
//! is appended to the tail of a named list; consumers pop from the head.

pub mod redis;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Appends an opaque payload to the tail of `queue`. Single attempt.
    async fn push(&self, queue: &str, payload: Bytes) -> Result<(), QueueError>;
}

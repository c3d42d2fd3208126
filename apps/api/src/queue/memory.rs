//! In-memory `JobQueue` for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use redis::{ErrorKind, RedisError};
use serde_json::Value;

use crate::queue::{JobQueue, QueueError};

#[derive(Default)]
pub struct MemoryQueue {
    lists: Mutex<HashMap<String, Vec<Bytes>>>,
    unavailable: bool,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue whose every push fails with a connection error.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn len(&self, queue: &str) -> usize {
        self.lists
            .lock()
            .unwrap()
            .get(queue)
            .map_or(0, Vec::len)
    }

    /// Payloads currently in `queue`, head first, decoded as JSON.
    pub fn payloads(&self, queue: &str) -> Vec<Value> {
        self.lists
            .lock()
            .unwrap()
            .get(queue)
            .into_iter()
            .flatten()
            .map(|bytes| serde_json::from_slice(bytes).unwrap())
            .collect()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn push(&self, queue: &str, payload: Bytes) -> Result<(), QueueError> {
        if self.unavailable {
            return Err(RedisError::from((ErrorKind::IoError, "connection refused")).into());
        }
        self.lists
            .lock()
            .unwrap()
            .entry(queue.to_string())
            .or_default()
            .push(payload);
        Ok(())
    }
}

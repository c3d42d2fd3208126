use async_trait::async_trait;
use bytes::Bytes;
use redis::{aio::MultiplexedConnection, AsyncCommands};
use tracing::{debug, info};

use crate::queue::{JobQueue, QueueError};

/// Redis list queue over one multiplexed connection, cloned per push.
#[derive(Clone)]
pub struct RedisQueue {
    conn: MultiplexedConnection,
}

impl RedisQueue {
    pub async fn connect(url: &str) -> Result<Self, QueueError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis connection established");
        Ok(Self { conn })
    }
}

#[async_trait]
impl JobQueue for RedisQueue {
    async fn push(&self, queue: &str, payload: Bytes) -> Result<(), QueueError> {
        let mut conn = self.conn.clone();
        let depth: i64 = conn.rpush(queue, &payload[..]).await?;
        debug!("Pushed {} byte(s) onto '{queue}' (length now {depth})", payload.len());
        Ok(())
    }
}

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::application::ports::{StatusStore, StatusStoreError};
use crate::domain::{CallResult, TaskId, TaskStatus};

/// Lifetime of the lightweight polling status, 24 hours.
const STATUS_TTL_SECS: u64 = 60 * 60 * 24;

/// Redis-backed status store. Each task owns its own keys; expiry is the
/// garbage collector.
pub struct RedisStatusStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisStatusStore {
    pub fn new(redis_url: &str) -> Result<Self, StatusStoreError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StatusStoreError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            key_prefix: "call".to_string(),
        })
    }

    fn result_key(&self, task_id: TaskId) -> String {
        format!("{}_process:{}", self.key_prefix, task_id)
    }

    fn status_key(&self, task_id: TaskId) -> String {
        format!("{}_status:{}", self.key_prefix, task_id)
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StatusStoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StatusStoreError::ConnectionFailed(e.to_string()))
    }
}

#[async_trait]
impl StatusStore for RedisStatusStore {
    async fn put_status(&self, status: &TaskStatus) -> Result<(), StatusStoreError> {
        let payload = serde_json::to_string(status)
            .map_err(|e| StatusStoreError::SerializationFailed(e.to_string()))?;

        let mut con = self.connection().await?;
        let _: () = con
            .set_ex(self.status_key(status.task_id), payload, STATUS_TTL_SECS)
            .await
            .map_err(|e| StatusStoreError::WriteFailed(e.to_string()))?;

        tracing::debug!(
            task_id = %status.task_id,
            state = %status.state,
            stage = %status.stage,
            progress = status.progress,
            "Task status persisted"
        );
        Ok(())
    }

    async fn put_result(&self, result: &CallResult, ttl: Duration) -> Result<(), StatusStoreError> {
        let payload = serde_json::to_string(result)
            .map_err(|e| StatusStoreError::SerializationFailed(e.to_string()))?;

        let mut con = self.connection().await?;
        let _: () = con
            .set_ex(
                self.result_key(result.task_id),
                payload,
                ttl.as_secs().max(1),
            )
            .await
            .map_err(|e| StatusStoreError::WriteFailed(e.to_string()))?;

        tracing::debug!(
            task_id = %result.task_id,
            state = %result.state,
            ttl_secs = ttl.as_secs(),
            "Call result persisted"
        );
        Ok(())
    }

    async fn fetch_result(&self, task_id: TaskId) -> Result<Option<CallResult>, StatusStoreError> {
        let mut con = self.connection().await?;
        let payload: Option<String> = con
            .get(self.result_key(task_id))
            .await
            .map_err(|e| StatusStoreError::ReadFailed(e.to_string()))?;

        match payload {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| StatusStoreError::SerializationFailed(e.to_string())),
            None => Ok(None),
        }
    }

    async fn delete_result(&self, task_id: TaskId) -> Result<bool, StatusStoreError> {
        let mut con = self.connection().await?;
        let deleted: i64 = con
            .del(vec![self.result_key(task_id), self.status_key(task_id)])
            .await
            .map_err(|e| StatusStoreError::WriteFailed(e.to_string()))?;
        Ok(deleted > 0)
    }
}

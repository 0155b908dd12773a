use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CallResult, TaskId, TaskStatus};

/// Shared key-value store consumed by pollers and websocket bridges. Each
/// task owns its own keys exclusively; TTL expiry is the only external
/// mutation apart from the operator-triggered delete.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn put_status(&self, status: &TaskStatus) -> Result<(), StatusStoreError>;

    async fn put_result(&self, result: &CallResult, ttl: Duration) -> Result<(), StatusStoreError>;

    async fn fetch_result(&self, task_id: TaskId) -> Result<Option<CallResult>, StatusStoreError>;

    async fn delete_result(&self, task_id: TaskId) -> Result<bool, StatusStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StatusStoreError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("serialization failed: {0}")]
    SerializationFailed(String),
}

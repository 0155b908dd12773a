use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{StatusStore, StatusStoreError};
use crate::domain::{CallResult, TaskId, TaskStatus};

/// In-memory store for tests and local runs. Keeps the full status history
/// per task so transition order can be asserted.
#[derive(Default)]
pub struct InMemoryStatusStore {
    statuses: Mutex<Vec<TaskStatus>>,
    results: Mutex<HashMap<TaskId, (CallResult, Duration)>>,
    fail_writes: AtomicBool,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, simulating a store outage.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn status_history(&self) -> Vec<TaskStatus> {
        self.statuses.lock().expect("store lock never poisoned").clone()
    }

    pub fn last_status(&self) -> Option<TaskStatus> {
        self.status_history().last().cloned()
    }

    pub fn result_ttl(&self, task_id: TaskId) -> Option<Duration> {
        self.results
            .lock()
            .expect("store lock never poisoned")
            .get(&task_id)
            .map(|(_, ttl)| *ttl)
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn put_status(&self, status: &TaskStatus) -> Result<(), StatusStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StatusStoreError::WriteFailed("simulated outage".to_string()));
        }
        self.statuses
            .lock()
            .expect("store lock never poisoned")
            .push(status.clone());
        Ok(())
    }

    async fn put_result(&self, result: &CallResult, ttl: Duration) -> Result<(), StatusStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StatusStoreError::WriteFailed("simulated outage".to_string()));
        }
        self.results
            .lock()
            .expect("store lock never poisoned")
            .insert(result.task_id, (result.clone(), ttl));
        Ok(())
    }

    async fn fetch_result(&self, task_id: TaskId) -> Result<Option<CallResult>, StatusStoreError> {
        Ok(self
            .results
            .lock()
            .expect("store lock never poisoned")
            .get(&task_id)
            .map(|(result, _)| result.clone()))
    }

    async fn delete_result(&self, task_id: TaskId) -> Result<bool, StatusStoreError> {
        Ok(self
            .results
            .lock()
            .expect("store lock never poisoned")
            .remove(&task_id)
            .is_some())
    }
}

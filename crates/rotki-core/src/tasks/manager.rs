// ── Task polling ──
//
// Turns a dispatched backend task into a future that resolves with the
// task's result. The task is visible in the registry for exactly as long
// as it is being awaited.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use rotki_api::{AsyncTask, RotkiClient};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::registry::TaskRegistry;
use crate::error::CoreError;
use crate::model::{TaskKey, TaskMeta};

pub struct TaskManager {
    client: RotkiClient,
    registry: Arc<TaskRegistry>,
    poll_interval: Duration,
    task_timeout: Duration,
    cancel: ArcSwap<CancellationToken>,
}

impl TaskManager {
    pub fn new(client: RotkiClient, poll_interval: Duration, task_timeout: Duration) -> Self {
        Self {
            client,
            registry: Arc::new(TaskRegistry::new()),
            poll_interval,
            task_timeout,
            cancel: ArcSwap::from_pointee(CancellationToken::new()),
        }
    }

    pub fn client(&self) -> &RotkiClient {
        &self.client
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// Dispatch a task and wait for its result.
    ///
    /// [`cancel_all`](Self::cancel_all) aborts the call from the moment it
    /// starts, dispatch included.
    pub async fn run<F>(&self, key: TaskKey, meta: TaskMeta, dispatch: F) -> Result<Value, CoreError>
    where
        F: Future<Output = Result<AsyncTask, rotki_api::Error>>,
    {
        let cancel = self.cancel.load_full();
        let task = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(%key, "cancelled before the task was dispatched");
                return Err(CoreError::Cancelled);
            }
            dispatched = dispatch => dispatched?,
        };
        self.poll(task, key, meta, &cancel).await
    }

    /// Poll an already dispatched task until it completes.
    ///
    /// Fails with [`CoreError::Timeout`] once `task_timeout` has elapsed and
    /// with [`CoreError::Cancelled`] when [`cancel_all`](Self::cancel_all)
    /// is called in the meantime.
    pub async fn await_task(
        &self,
        task: AsyncTask,
        key: TaskKey,
        meta: TaskMeta,
    ) -> Result<Value, CoreError> {
        let cancel = self.cancel.load_full();
        self.poll(task, key, meta, &cancel).await
    }

    async fn poll(
        &self,
        task: AsyncTask,
        key: TaskKey,
        meta: TaskMeta,
        cancel: &CancellationToken,
    ) -> Result<Value, CoreError> {
        let task_id = task.task_id;
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        debug!(task_id, %key, "awaiting task");
        self.registry.register(task_id, key, meta);
        let _registered = Registered {
            registry: &self.registry,
            task_id,
        };

        let poll = async {
            loop {
                match self.client.task_result(task_id).await {
                    Ok(Some(value)) => return Ok(value),
                    Ok(None) => {}
                    Err(e) => return Err(CoreError::from(e)),
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(CoreError::Cancelled),
            polled = tokio::time::timeout(self.task_timeout, poll) => {
                polled.unwrap_or_else(|_| {
                    Err(CoreError::Timeout {
                        timeout_secs: self.task_timeout.as_secs(),
                    })
                })
            }
        };

        if let Err(ref e) = outcome {
            warn!(task_id, error = %e, "task did not complete");
        }
        outcome
    }

    /// Stop every task currently being awaited. Later tasks are unaffected.
    pub fn cancel_all(&self) {
        let previous = self.cancel.swap(Arc::new(CancellationToken::new()));
        previous.cancel();
    }
}

/// Deregisters the task however the await ends, including drop.
struct Registered<'a> {
    registry: &'a TaskRegistry,
    task_id: u64,
}

impl Drop for Registered<'_> {
    fn drop(&mut self) {
        self.registry.remove(self.task_id);
    }
}

// Async task queue endpoints
//
// Queries dispatched with `async_query: true` return a task id. The outcome
// is collected from `tasks/{id}` once the backend reports it completed.

use tracing::debug;

use crate::client::RotkiClient;
use crate::error::Error;
use crate::models::{TaskList, TaskStatus, TaskStatusResponse};

impl RotkiClient {
    /// List pending and completed task ids.
    ///
    /// `GET /api/1/tasks`
    pub async fn list_tasks(&self) -> Result<TaskList, Error> {
        self.get("tasks").await
    }

    /// Raw status of a single task.
    ///
    /// `GET /api/1/tasks/{id}`
    pub async fn task_status(&self, task_id: u64) -> Result<TaskStatusResponse, Error> {
        let (status, envelope) = match self
            .get_envelope::<TaskStatusResponse>(&format!("tasks/{task_id}"))
            .await
        {
            Err(Error::Api { status: 404, .. }) => return Err(Error::TaskNotFound { task_id }),
            other => other?,
        };

        match envelope.result {
            Some(result) => Ok(result),
            None if status == reqwest::StatusCode::NOT_FOUND => Err(Error::TaskNotFound { task_id }),
            None => Err(Error::Api {
                status: status.as_u16(),
                message: envelope.message,
            }),
        }
    }

    /// Poll a task once.
    ///
    /// Returns `Ok(None)` while the task is pending and `Ok(Some(result))`
    /// once it completed successfully. A completed task without a result is
    /// reported as [`Error::TaskFailed`].
    pub async fn task_result(&self, task_id: u64) -> Result<Option<serde_json::Value>, Error> {
        let response = self.task_status(task_id).await?;
        debug!(task_id, status = ?response.status, "polled task");

        match response.status {
            TaskStatus::Pending => Ok(None),
            TaskStatus::NotFound => Err(Error::TaskNotFound { task_id }),
            TaskStatus::Completed => {
                let outcome = response.outcome.ok_or_else(|| Error::TaskFailed {
                    task_id,
                    message: "completed task has no outcome".into(),
                })?;
                match outcome.result {
                    Some(value) => Ok(Some(value)),
                    None => Err(Error::TaskFailed {
                        task_id,
                        message: outcome.message,
                    }),
                }
            }
        }
    }
}

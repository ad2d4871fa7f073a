// Wire types for the rotki REST API.
//
// Every endpoint wraps its payload in `{ "result": ..., "message": "" }`.
// Expensive queries are dispatched with `async_query: true` and answer with
// a task id that is later collected through the `tasks` endpoints.

use serde::{Deserialize, Serialize};

/// The `{ result, message }` envelope returned by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    #[serde(default)]
    pub message: String,
}

/// Payload of an async query: the id to poll for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct AsyncTask {
    pub task_id: u64,
}

/// `GET /tasks` — ids known to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskList {
    #[serde(default)]
    pub pending: Vec<u64>,
    #[serde(default)]
    pub completed: Vec<u64>,
}

/// Lifecycle of a backend task as reported by `GET /tasks/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    Completed,
    NotFound,
}

/// Outcome carried by a completed task.
///
/// A `null` result means the task failed; `message` then explains why.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskOutcome {
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub message: String,
    /// HTTP status the synchronous variant of the query would have returned.
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// `GET /tasks/{id}` payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskStatusResponse {
    pub status: TaskStatus,
    #[serde(default)]
    pub outcome: Option<TaskOutcome>,
}

/// A tracked blockchain account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountEntry {
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// The subset of user settings this client cares about.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserSettings {
    #[serde(default)]
    pub active_modules: Vec<String>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// Body for `POST /blockchains/{chain}/tokens/detect`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DetectTokensRequest<'a> {
    pub async_query: bool,
    pub only_cache: bool,
    /// Omitted when empty; the backend then answers for every tracked
    /// address of the chain.
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub addresses: &'a [String],
}

use thiserror::Error;

/// Top-level error type for the `rotki-api` crate.
///
/// Covers transport failures, the `{result, message}` envelope, and the
/// async task queue. `rotki-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to build the underlying HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Backend responses ───────────────────────────────────────────
    /// The backend has no logged-in user, or rejected the session.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The backend refused the request because of its current state
    /// (e.g. a module that is not activated for the user).
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Any other non-success response, with the envelope message.
    #[error("rotki API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Task queue ──────────────────────────────────────────────────
    /// The backend does not know the given task id.
    #[error("Task {task_id} not found")]
    TaskNotFound { task_id: u64 },

    /// The task completed but its outcome carries no result.
    #[error("Task {task_id} failed: {message}")]
    TaskFailed { task_id: u64, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } | Self::TaskNotFound { .. } => true,
            _ => false,
        }
    }
}

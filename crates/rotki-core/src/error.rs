// ── Core error types ──
//
// User-facing errors from rotki-core. Consumers never see HTTP status
// codes or envelope parse failures directly; the `From<rotki_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Errors surfaced by sessions, stores and the task manager.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Reaching the backend ──
    #[error("Cannot connect to rotki backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend refused the request: {message}")]
    AuthenticationFailed { message: String },

    #[error("Timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Operation cancelled")]
    Cancelled,

    // ── Payloads ──
    #[error("No {entity_type} '{identifier}' known to the backend")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Unexpected payload: {message}")]
    ValidationFailed { message: String },

    // ── Requests the backend or the session turned down ──
    #[error("{operation} is not available, it needs {required}")]
    Unsupported { operation: String, required: String },

    #[error("Rejected by backend: {message}")]
    Rejected { message: String },

    #[error("Task {task_id} failed: {message}")]
    TaskFailed { task_id: u64, message: String },

    #[error("Backend error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    #[error("Bad client configuration: {message}")]
    Config { message: String },
}


impl From<rotki_api::Error> for CoreError {
    fn from(err: rotki_api::Error) -> Self {
        match err {
            rotki_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            rotki_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            rotki_api::Error::ClientBuild(message) => CoreError::Config { message },
            rotki_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            rotki_api::Error::Conflict { message } => CoreError::Rejected { message },
            rotki_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            rotki_api::Error::TaskNotFound { task_id } => CoreError::NotFound {
                entity_type: "task".into(),
                identifier: task_id.to_string(),
            },
            rotki_api::Error::TaskFailed { task_id, message } => {
                CoreError::TaskFailed { task_id, message }
            }
            rotki_api::Error::Deserialization { message, body: _ } => CoreError::ValidationFailed {
                message: format!("unexpected response: {message}"),
            },
        }
    }
}

// ── User-facing notifications ──
//
// Failures recovered inside the fetch helper end up here instead of being
// returned to the caller. Live consumers subscribe to the broadcast;
// one-shot consumers (the CLI) read the bounded history afterwards.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;
const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    /// Whether a front end should surface this prominently.
    pub display: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Error,
            display: true,
            created_at: Utc::now(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            display: false,
            ..Self::error(title, message)
        }
    }
}

#[derive(Debug)]
pub struct Notifier {
    tx: broadcast::Sender<Arc<Notification>>,
    history: Mutex<VecDeque<Arc<Notification>>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            history: Mutex::new(VecDeque::new()),
        }
    }

    pub fn notify(&self, notification: Notification) {
        debug!(title = %notification.title, severity = %notification.severity, "notification");
        let notification = Arc::new(notification);
        {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            if history.len() == HISTORY_LIMIT {
                history.pop_front();
            }
            history.push_back(Arc::clone(&notification));
        }
        // No receivers is fine; the history still has it.
        let _ = self.tx.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Notification>> {
        self.tx.subscribe()
    }

    /// Oldest first.
    pub fn history(&self) -> Vec<Arc<Notification>> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

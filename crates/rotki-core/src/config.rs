// ── Runtime session configuration ──
//
// Describes which backend to talk to and how patiently. Built by the CLI
// from a config profile; core never reads config files.

use std::time::Duration;

use url::Url;

use crate::model::Module;

pub const DEFAULT_URL: &str = "http://127.0.0.1:4242";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Backend base URL, without the `/api/1` suffix.
    pub url: Url,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Delay between two polls of a pending task.
    pub poll_interval: Duration,
    /// Give up on a task after this long.
    pub task_timeout: Duration,
    /// Initial premium entitlement.
    pub premium: bool,
    /// Initially active modules.
    pub modules: Vec<Module>,
}

impl SessionConfig {
    /// Configuration for `url` with default timeouts and no entitlements.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(2),
            task_timeout: Duration::from_secs(600),
            premium: false,
            modules: Vec::new(),
        }
    }
}

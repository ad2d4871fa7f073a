// ── Task identity ──
//
// A backend task is identified by its kind plus the parameters it was
// dispatched with. Keys compare by value so repeated dispatches with the
// same parameters are recognised as the same task.

use serde::Serialize;
use strum::{AsRefStr, Display};

use super::chain::Blockchain;

/// Kinds of background task this client dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskType {
    LiquityBalances,
    LiquityEvents,
    LiquityStaking,
    LiquityStakingPools,
    FetchDetectedTokens,
    /// Reads the backend's stored detection results; no scan.
    FetchCachedTokens,
}

/// Structural identity of a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TaskKey {
    pub task_type: TaskType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<Blockchain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl TaskKey {
    pub fn new(task_type: TaskType) -> Self {
        Self {
            task_type,
            chain: None,
            address: None,
        }
    }

    pub fn with_chain(mut self, chain: Blockchain) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Whether a task registered under `self` answers the `query`.
    ///
    /// Parameters the query leaves unset match anything.
    pub fn matches(&self, query: &TaskKey) -> bool {
        self.task_type == query.task_type
            && query.chain.is_none_or(|c| self.chain == Some(c))
            && query
                .address
                .as_deref()
                .is_none_or(|a| self.address.as_deref() == Some(a))
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.task_type)?;
        if let Some(chain) = self.chain {
            write!(f, "[{chain}]")?;
        }
        if let Some(ref address) = self.address {
            write!(f, "({address})")?;
        }
        Ok(())
    }
}

/// Descriptive metadata shown alongside a running task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskMeta {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TaskMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

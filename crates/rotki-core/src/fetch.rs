// ── Fetch-and-sync helper ──
//
// The one place where a remote query result lands in a store. Every
// per-domain fetch is a `FetchData` handed to `fetch_data_async`, which
// checks applicability and freshness, drives the section status, writes
// the parsed payload into the target cell, and turns failures into
// notifications.

use std::collections::BTreeSet;
use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{Module, Section, Status, TaskMeta, TaskType};
use crate::notify::{Notification, Notifier};
use crate::store::{StateCell, StatusTracker};

/// How a failed fetch is reported to the user.
#[derive(Clone)]
pub struct OnError {
    pub title: String,
    /// Builds the notification body from the error text.
    pub message: fn(&str) -> String,
}

/// Everything needed to perform one kind of fetch.
pub struct FetchTask<Q, P> {
    pub task_type: TaskType,
    pub section: Section,
    pub meta: TaskMeta,
    /// Performs the remote query and yields its raw payload.
    pub query: Q,
    /// Turns the raw payload into the cell's value.
    pub parser: P,
    pub on_error: OnError,
}

/// Entitlements a fetch needs before it may hit the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirements {
    pub premium: bool,
    pub module: Option<Module>,
}

/// Entitlements the session currently has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchState {
    pub premium: bool,
    pub active_modules: BTreeSet<Module>,
}

impl FetchState {
    /// Why `requires` is not met, if it isn't.
    pub fn unmet(&self, requires: Requirements) -> Option<SkipReason> {
        if let Some(module) = requires.module {
            if !self.active_modules.contains(&module) {
                return Some(SkipReason::ModuleInactive(module));
            }
        }
        if requires.premium && !self.premium {
            return Some(SkipReason::PremiumRequired);
        }
        None
    }
}

pub struct FetchData<Q, P> {
    pub task: FetchTask<Q, P>,
    pub state: FetchState,
    pub requires: Requirements,
    /// Re-fetch even when the section is already loaded.
    pub refresh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ModuleInactive(Module),
    PremiumRequired,
    AlreadyLoaded,
    InProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Nothing was queried; cell and status are untouched.
    Skipped(SkipReason),
    Loaded,
    /// The failure was reported through the notifier.
    Failed,
    /// The section was reset or the session cancelled while the query
    /// ran; the result was dropped and nothing was reported.
    Discarded,
}

/// Run a fetch against `cell`, tracking progress under the task's section.
///
/// Never returns an error: query and parse failures mark the section
/// [`Status::Failed`] and are pushed to `notifier`. A reset of the section
/// while the query is in flight wins over its result.
pub async fn fetch_data_async<T, Q, Fut, P>(
    data: FetchData<Q, P>,
    cell: &StateCell<T>,
    status: &StatusTracker,
    notifier: &Notifier,
) -> FetchOutcome
where
    T: Send + Sync + 'static,
    Q: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, CoreError>>,
    P: FnOnce(Value) -> Result<T, CoreError>,
{
    let FetchData {
        task,
        state,
        requires,
        refresh,
    } = data;
    let section = task.section;

    if let Some(reason) = state.unmet(requires) {
        debug!(task = %task.task_type, ?reason, "fetch not applicable");
        return FetchOutcome::Skipped(reason);
    }

    let current = status.get(section);
    if current.is_running() {
        debug!(task = %task.task_type, %section, "fetch already in progress");
        return FetchOutcome::Skipped(SkipReason::InProgress);
    }
    if current.is_loaded() && !refresh {
        return FetchOutcome::Skipped(SkipReason::AlreadyLoaded);
    }

    let generation = status.generation(section);
    status.set(
        section,
        if refresh { Status::Refreshing } else { Status::Loading },
    );
    debug!(task = %task.task_type, title = %task.meta.title, refresh, "fetching");

    let parser = task.parser;
    let result = (task.query)().await.and_then(parser);

    if status.generation(section) != generation {
        debug!(task = %task.task_type, %section, "section reset during fetch, dropping result");
        return FetchOutcome::Discarded;
    }

    match result {
        Err(CoreError::Cancelled) => {
            debug!(task = %task.task_type, %section, "fetch cancelled");
            status.set(section, current);
            FetchOutcome::Discarded
        }
        Ok(value) => {
            cell.set(value);
            status.set(section, Status::Loaded);
            FetchOutcome::Loaded
        }
        Err(e) => {
            warn!(task = %task.task_type, error = %e, "fetch failed");
            status.set(section, Status::Failed);
            let message = (task.on_error.message)(&e.to_string());
            notifier.notify(Notification::error(task.on_error.title, message));
            FetchOutcome::Failed
        }
    }
}

/// Deserialize a task payload, reporting shape mismatches as validation
/// failures.
pub fn parse_payload<T: DeserializeOwned>(value: Value) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::ValidationFailed {
        message: e.to_string(),
    })
}

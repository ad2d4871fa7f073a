// rotki-core: State synchronisation between the rotki backend and its clients.
//
// Background tasks are tracked in a registry, results are pulled into
// reactive stores through one fetch helper, and everything belonging to a
// user hangs off a `Session`.

pub mod config;
pub mod detection;
pub mod entitlements;
pub mod error;
pub mod fetch;
pub mod model;
pub mod notify;
pub mod session;
pub mod store;
pub mod stream;
pub mod tasks;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SessionConfig;
pub use detection::{DetectionSummary, TokenDetection};
pub use entitlements::Entitlements;
pub use error::CoreError;
pub use fetch::{
    FetchData, FetchOutcome, FetchState, FetchTask, OnError, Requirements, SkipReason,
    fetch_data_async, parse_payload,
};
pub use notify::{Notification, Notifier, Severity};
pub use session::Session;
pub use store::{AccountsStore, BlockchainTokensStore, LiquityStore, StateCell, StatusTracker};
pub use stream::CellStream;
pub use tasks::{TaskManager, TaskRecord, TaskRegistry};

pub use model::{
    Blockchain, DetectedTokensInfo, DetectedTokensSummary, Module, Section, Status, TaskKey,
    TaskMeta, TaskType,
};

// ── Background tasks ──
//
// Registry of pending backend tasks and the poller that collects their
// results.

mod manager;
mod registry;

pub use manager::TaskManager;
pub use registry::{TaskRecord, TaskRegistry};

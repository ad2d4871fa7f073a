// ── Section status tracking ──
//
// One `Status` per `Section`, published through a `watch` channel so a
// front end can render loading indicators without polling. Every reset
// also advances the section's generation; a fetch that started under an
// older generation must not write back.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::{Section, Status};
use crate::stream::CellStream;

type StatusMap = HashMap<Section, Status>;

/// Reset count of a section as seen by a fetch when it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    all: u64,
    section: u64,
}

#[derive(Debug)]
pub struct StatusTracker {
    tx: watch::Sender<Arc<StatusMap>>,
    resets_all: AtomicU64,
    resets: DashMap<Section, u64>,
}

impl StatusTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(StatusMap::new()));
        Self {
            tx,
            resets_all: AtomicU64::new(0),
            resets: DashMap::new(),
        }
    }

    pub fn generation(&self, section: Section) -> Generation {
        Generation {
            all: self.resets_all.load(Ordering::Acquire),
            section: self.resets.get(&section).map_or(0, |n| *n),
        }
    }

    /// Current status of `section`; `Status::None` when never set.
    pub fn get(&self, section: Section) -> Status {
        self.tx.borrow().get(&section).copied().unwrap_or_default()
    }

    /// Setting `Status::None` drops the entry without touching the
    /// generation.
    pub fn set(&self, section: Section, status: Status) {
        self.tx.send_if_modified(|map| {
            if map.get(&section).copied().unwrap_or_default() == status {
                return false;
            }
            if status == Status::None {
                Arc::make_mut(map).remove(&section);
            } else {
                Arc::make_mut(map).insert(section, status);
            }
            true
        });
    }

    /// Back to `Status::None`, invalidating fetches still in flight.
    pub fn reset(&self, section: Section) {
        *self.resets.entry(section).or_insert(0) += 1;
        self.tx.send_if_modified(|map| {
            if !map.contains_key(&section) {
                return false;
            }
            Arc::make_mut(map).remove(&section);
            true
        });
    }

    pub fn reset_all(&self) {
        self.resets_all.fetch_add(1, Ordering::AcqRel);
        self.tx.send_if_modified(|map| {
            if map.is_empty() {
                return false;
            }
            *map = Arc::new(StatusMap::new());
            true
        });
    }

    pub fn is_loading(&self, section: Section) -> bool {
        self.get(section).is_running()
    }

    /// Snapshot of every section that has left `Status::None`.
    pub fn snapshot(&self) -> Arc<StatusMap> {
        self.tx.borrow().clone()
    }

    /// Watch the whole status map.
    pub fn subscribe(&self) -> CellStream<StatusMap> {
        CellStream::new(self.tx.subscribe())
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

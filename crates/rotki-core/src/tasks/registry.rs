// ── Pending task registry ──
//
// Tasks are registered when the backend hands out a task id and removed
// once their outcome has been collected. The pending set is published as
// a sorted snapshot after every mutation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::watch;

use crate::model::{TaskKey, TaskMeta};
use crate::stream::CellStream;

/// A task the backend is still working on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    pub id: u64,
    pub key: TaskKey,
    pub meta: TaskMeta,
    pub started_at: DateTime<Utc>,
}

pub struct TaskRegistry {
    records: DashMap<u64, TaskRecord>,
    snapshot: watch::Sender<Arc<Vec<TaskRecord>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            records: DashMap::new(),
            snapshot,
        }
    }

    pub fn register(&self, id: u64, key: TaskKey, meta: TaskMeta) {
        self.records.insert(
            id,
            TaskRecord {
                id,
                key,
                meta,
                started_at: Utc::now(),
            },
        );
        self.publish();
    }

    pub fn remove(&self, id: u64) -> Option<TaskRecord> {
        let removed = self.records.remove(&id).map(|(_, record)| record);
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    /// Whether any pending task matches `query`. See [`TaskKey::matches`].
    pub fn is_running(&self, query: &TaskKey) -> bool {
        self.records.iter().any(|entry| entry.key.matches(query))
    }

    pub fn pending(&self) -> Arc<Vec<TaskRecord>> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> CellStream<Vec<TaskRecord>> {
        CellStream::new(self.snapshot.subscribe())
    }

    pub fn clear(&self) {
        self.records.clear();
        self.publish();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn publish(&self) {
        let mut records: Vec<TaskRecord> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by_key(|r| r.id);
        self.snapshot.send_replace(Arc::new(records));
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

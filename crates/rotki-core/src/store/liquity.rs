// ── Liquity store ──
//
// Last known Liquity balances, trove events, staking and stability pool
// positions. Each resource has its own cell and section status.

use std::future::Future;
use std::sync::Arc;

use rotki_api::AsyncTask;
use serde::de::DeserializeOwned;

use super::{StateCell, StatusTracker};
use crate::entitlements::Entitlements;
use crate::fetch::{
    FetchData, FetchOutcome, FetchTask, OnError, Requirements, fetch_data_async, parse_payload,
};
use crate::model::{
    LiquityBalances, LiquityPoolDetails, LiquityStaking, Module, Section, TaskKey, TaskMeta,
    TaskType, TroveEvents,
};
use crate::notify::Notifier;
use crate::stream::CellStream;
use crate::tasks::TaskManager;

/// Fixed parameters of one Liquity fetch.
struct Resource {
    task_type: TaskType,
    section: Section,
    title: &'static str,
    premium: bool,
    describe_error: fn(&str) -> String,
}

const BALANCES: Resource = Resource {
    task_type: TaskType::LiquityBalances,
    section: Section::DefiLiquityBalances,
    title: "Liquity balances",
    premium: false,
    describe_error: balances_error,
};

const EVENTS: Resource = Resource {
    task_type: TaskType::LiquityEvents,
    section: Section::DefiLiquityEvents,
    title: "Liquity events",
    premium: true,
    describe_error: events_error,
};

const STAKING: Resource = Resource {
    task_type: TaskType::LiquityStaking,
    section: Section::DefiLiquityStaking,
    title: "Liquity staking",
    premium: true,
    describe_error: staking_error,
};

const POOLS: Resource = Resource {
    task_type: TaskType::LiquityStakingPools,
    section: Section::DefiLiquityStakingPools,
    title: "Liquity stability pool",
    premium: false,
    describe_error: pools_error,
};

fn balances_error(e: &str) -> String {
    format!("Failed to fetch Liquity balances: {e}")
}

fn events_error(e: &str) -> String {
    format!("Failed to fetch Liquity trove events: {e}")
}

fn staking_error(e: &str) -> String {
    format!("Failed to fetch Liquity staking: {e}")
}

fn pools_error(e: &str) -> String {
    format!("Failed to fetch Liquity stability pool: {e}")
}

pub struct LiquityStore {
    balances: StateCell<LiquityBalances>,
    events: StateCell<TroveEvents>,
    staking: StateCell<LiquityStaking>,
    pools: StateCell<LiquityPoolDetails>,
    tasks: Arc<TaskManager>,
    status: Arc<StatusTracker>,
    notifier: Arc<Notifier>,
    entitlements: Arc<Entitlements>,
}

impl LiquityStore {
    pub fn new(
        tasks: Arc<TaskManager>,
        status: Arc<StatusTracker>,
        notifier: Arc<Notifier>,
        entitlements: Arc<Entitlements>,
    ) -> Self {
        Self {
            balances: StateCell::new(),
            events: StateCell::new(),
            staking: StateCell::new(),
            pools: StateCell::new(),
            tasks,
            status,
            notifier,
            entitlements,
        }
    }

    // ── Fetches ──────────────────────────────────────────────────────

    pub async fn fetch_balances(&self, refresh: bool) -> FetchOutcome {
        let dispatch = self.tasks.client().liquity_balances();
        self.fetch(&BALANCES, refresh, dispatch, &self.balances).await
    }

    pub async fn fetch_events(&self, refresh: bool) -> FetchOutcome {
        let dispatch = self.tasks.client().liquity_trove_events();
        self.fetch(&EVENTS, refresh, dispatch, &self.events).await
    }

    pub async fn fetch_staking(&self, refresh: bool) -> FetchOutcome {
        let dispatch = self.tasks.client().liquity_staking();
        self.fetch(&STAKING, refresh, dispatch, &self.staking).await
    }

    pub async fn fetch_pools(&self, refresh: bool) -> FetchOutcome {
        let dispatch = self.tasks.client().liquity_staking_pools();
        self.fetch(&POOLS, refresh, dispatch, &self.pools).await
    }

    // `dispatch` is lazy: nothing reaches the backend unless the helper
    // decides to run the query.
    async fn fetch<T, F>(
        &self,
        resource: &Resource,
        refresh: bool,
        dispatch: F,
        cell: &StateCell<T>,
    ) -> FetchOutcome
    where
        T: DeserializeOwned + Send + Sync + 'static,
        F: Future<Output = Result<AsyncTask, rotki_api::Error>>,
    {
        let tasks = &self.tasks;
        let key = TaskKey::new(resource.task_type);
        let meta = TaskMeta::new(resource.title);
        let task_meta = meta.clone();

        let data = FetchData {
            task: FetchTask {
                task_type: resource.task_type,
                section: resource.section,
                meta: task_meta,
                query: move || tasks.run(key, meta, dispatch),
                parser: parse_payload::<T>,
                on_error: OnError {
                    title: resource.title.to_owned(),
                    message: resource.describe_error,
                },
            },
            state: self.entitlements.snapshot(),
            requires: Requirements {
                premium: resource.premium,
                module: Some(Module::Liquity),
            },
            refresh,
        };
        fetch_data_async(data, cell, &self.status, &self.notifier).await
    }

    /// Clear every cell and section status. Safe to call repeatedly.
    pub fn reset(&self) {
        self.balances.reset();
        self.events.reset();
        self.staking.reset();
        self.pools.reset();
        for resource in [&BALANCES, &EVENTS, &STAKING, &POOLS] {
            self.status.reset(resource.section);
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn balances(&self) -> Arc<LiquityBalances> {
        self.balances.get()
    }

    pub fn events(&self) -> Arc<TroveEvents> {
        self.events.get()
    }

    pub fn staking(&self) -> Arc<LiquityStaking> {
        self.staking.get()
    }

    pub fn pools(&self) -> Arc<LiquityPoolDetails> {
        self.pools.get()
    }

    pub fn subscribe_balances(&self) -> CellStream<LiquityBalances> {
        self.balances.subscribe()
    }

    pub fn subscribe_events(&self) -> CellStream<TroveEvents> {
        self.events.subscribe()
    }

    pub fn subscribe_staking(&self) -> CellStream<LiquityStaking> {
        self.staking.subscribe()
    }

    pub fn subscribe_pools(&self) -> CellStream<LiquityPoolDetails> {
        self.pools.subscribe()
    }

    /// Sections owned by this store.
    pub fn sections() -> [Section; 4] {
        [BALANCES.section, EVENTS.section, STAKING.section, POOLS.section]
    }
}

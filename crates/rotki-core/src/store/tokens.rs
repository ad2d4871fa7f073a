// ── Detected tokens ──
//
// Results of token detection, keyed by chain and address. Detection runs
// as a backend task; the per-address results replace whatever was known
// for those addresses.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::fetch::parse_payload;
use crate::model::{
    Blockchain, DetectedTokensByAddress, DetectedTokensInfo, DetectedTokensSummary, TaskKey,
    TaskMeta, TaskType,
};
use crate::notify::{Notification, Notifier};
use crate::tasks::TaskManager;

pub struct BlockchainTokensStore {
    detected: DashMap<(Blockchain, String), Arc<DetectedTokensInfo>>,
    version: watch::Sender<u64>,
    tasks: Arc<TaskManager>,
    notifier: Arc<Notifier>,
}

impl BlockchainTokensStore {
    pub fn new(tasks: Arc<TaskManager>, notifier: Arc<Notifier>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            detected: DashMap::new(),
            version,
            tasks,
            notifier,
        }
    }

    pub fn get(&self, chain: Blockchain, address: &str) -> Option<Arc<DetectedTokensInfo>> {
        self.detected
            .get(&(chain, address.to_owned()))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Addresses of `chain` with detection results, sorted.
    pub fn addresses(&self, chain: Blockchain) -> Vec<String> {
        let mut addresses: Vec<String> = self
            .detected
            .iter()
            .filter(|entry| entry.key().0 == chain)
            .map(|entry| entry.key().1.clone())
            .collect();
        addresses.sort();
        addresses
    }

    /// Tokens detected for `address`, or for every known address of the
    /// chain when `address` is `None`.
    pub fn detected_tokens_info(
        &self,
        chain: Blockchain,
        address: Option<&str>,
    ) -> DetectedTokensSummary {
        match address {
            Some(address) => {
                let info = self.get(chain, address);
                DetectedTokensSummary::merge(info.as_deref())
            }
            None => {
                let mut infos: Vec<(String, Arc<DetectedTokensInfo>)> = self
                    .detected
                    .iter()
                    .filter(|entry| entry.key().0 == chain)
                    .map(|entry| (entry.key().1.clone(), Arc::clone(entry.value())))
                    .collect();
                infos.sort_by(|a, b| a.0.cmp(&b.0));
                DetectedTokensSummary::merge(infos.iter().map(|(_, info)| &**info))
            }
        }
    }

    /// Run token detection for one address and store the result.
    ///
    /// Failures are pushed to the notifier and also returned.
    pub async fn fetch_detected_tokens(
        &self,
        chain: Blockchain,
        address: &str,
    ) -> Result<(), CoreError> {
        let key = TaskKey::new(TaskType::FetchDetectedTokens)
            .with_chain(chain)
            .with_address(address);
        let meta = TaskMeta::new(format!("Detecting tokens on {}", chain.display_name()))
            .with_description(address);
        self.detect(chain, key, meta, &[address.to_owned()], false)
            .await
    }

    /// Load the backend's last detection results for every tracked
    /// address of `chain` without scanning again.
    pub async fn fetch_cached_tokens(&self, chain: Blockchain) -> Result<(), CoreError> {
        let key = TaskKey::new(TaskType::FetchCachedTokens).with_chain(chain);
        let meta = TaskMeta::new(format!(
            "Loading detected tokens on {}",
            chain.display_name()
        ));
        self.detect(chain, key, meta, &[], true).await
    }

    async fn detect(
        &self,
        chain: Blockchain,
        key: TaskKey,
        meta: TaskMeta,
        addresses: &[String],
        only_cache: bool,
    ) -> Result<(), CoreError> {
        let dispatch = self
            .tasks
            .client()
            .detect_tokens(chain.as_ref(), addresses, only_cache);

        let result = self
            .tasks
            .run(key, meta, dispatch)
            .await
            .and_then(parse_payload::<DetectedTokensByAddress>);

        match result {
            Ok(detected) => {
                debug!(%chain, count = detected.len(), only_cache, "detected tokens stored");
                self.store(chain, detected);
                Ok(())
            }
            Err(e) => {
                let target = addresses.first().map_or("all addresses", String::as_str);
                warn!(%chain, target, error = %e, "token detection failed");
                self.notifier.notify(Notification::error(
                    format!("Token detection on {}", chain.display_name()),
                    format!("Failed to detect tokens for {target}: {e}"),
                ));
                Err(e)
            }
        }
    }

    pub fn store(&self, chain: Blockchain, detected: DetectedTokensByAddress) {
        for (address, info) in detected {
            self.detected.insert((chain, address), Arc::new(info));
        }
        self.version.send_modify(|v| *v += 1);
    }

    /// Bumps on every write; use to re-read after detection.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub fn reset(&self) {
        self.detected.clear();
        self.version.send_modify(|v| *v += 1);
    }
}

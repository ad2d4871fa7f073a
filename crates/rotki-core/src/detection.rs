// ── Per-chain token detection ──
//
// Bound to one chain and optionally one account address. Works out which
// addresses need detection and drives the tokens store for each of them.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{Blockchain, DetectedTokensSummary, TaskKey, TaskType};
use crate::store::{AccountsStore, BlockchainTokensStore};
use crate::tasks::TaskRegistry;

/// Result of a multi-address detection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionSummary {
    pub attempted: usize,
    pub failed: usize,
}

impl DetectionSummary {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed
    }
}

pub struct TokenDetection {
    chain: Blockchain,
    account_address: Option<String>,
    tokens: Arc<BlockchainTokensStore>,
    accounts: Arc<AccountsStore>,
    registry: Arc<TaskRegistry>,
}

impl TokenDetection {
    pub fn new(
        chain: Blockchain,
        account_address: Option<String>,
        tokens: Arc<BlockchainTokensStore>,
        accounts: Arc<AccountsStore>,
        registry: Arc<TaskRegistry>,
    ) -> Self {
        Self {
            chain,
            account_address,
            tokens,
            accounts,
            registry,
        }
    }

    pub fn chain(&self) -> Blockchain {
        self.chain
    }

    pub fn account_address(&self) -> Option<&str> {
        self.account_address.as_deref()
    }

    /// Whether detection is running for the bound chain, narrowed to the
    /// bound address if there is one.
    pub fn detecting_tokens(&self) -> bool {
        let mut query = TaskKey::new(TaskType::FetchDetectedTokens).with_chain(self.chain);
        if let Some(ref address) = self.account_address {
            query = query.with_address(address.as_str());
        }
        self.registry.is_running(&query)
    }

    pub fn detected_tokens(&self) -> DetectedTokensSummary {
        self.tokens
            .detected_tokens_info(self.chain, self.account_address.as_deref())
    }

    /// Detect tokens of one address.
    ///
    /// # Panics
    ///
    /// If the bound chain has no transaction support.
    pub async fn fetch_detected_tokens(&self, address: &str) -> Result<(), CoreError> {
        assert!(
            self.chain.supports_transactions(),
            "token detection requires transaction support, {} has none",
            self.chain
        );
        self.tokens.fetch_detected_tokens(self.chain, address).await
    }

    /// Detect the bound address, or else every address in `addresses`.
    ///
    /// All addresses are dispatched at once and every attempt runs to
    /// completion; one failure does not stop the others.
    ///
    /// # Panics
    ///
    /// If no address is bound and `addresses` is empty.
    pub async fn detect_tokens(&self, addresses: &[String]) -> DetectionSummary {
        assert!(
            self.account_address.is_some() || !addresses.is_empty(),
            "detect_tokens needs a bound address or a non-empty address list"
        );

        if let Some(ref address) = self.account_address {
            let failed = usize::from(self.fetch_detected_tokens(address).await.is_err());
            return DetectionSummary {
                attempted: 1,
                failed,
            };
        }

        debug!(chain = %self.chain, count = addresses.len(), "detecting tokens");
        let results = join_all(
            addresses
                .iter()
                .map(|address| self.fetch_detected_tokens(address)),
        )
        .await;

        let summary = DetectionSummary {
            attempted: results.len(),
            failed: results.iter().filter(|r| r.is_err()).count(),
        };
        info!(
            chain = %self.chain,
            attempted = summary.attempted,
            failed = summary.failed,
            "token detection finished"
        );
        summary
    }

    /// Detect every tracked address of the bound chain. Does nothing when
    /// the chain has no addresses or is not registered.
    pub async fn detect_tokens_of_all_addresses(&self) -> DetectionSummary {
        let addresses = self.accounts.addresses(self.chain);
        if addresses.is_empty() {
            debug!(chain = %self.chain, "no addresses to detect");
            return DetectionSummary::default();
        }
        self.detect_tokens(&addresses).await
    }
}

// ── Session context ──
//
// Owns every store for one logged-in user, plus the shared machinery they
// run on. Created at login, torn down with `logout()`.

use std::collections::BTreeSet;
use std::sync::Arc;

use rotki_api::{RotkiClient, TransportConfig};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::detection::TokenDetection;
use crate::entitlements::Entitlements;
use crate::error::CoreError;
use crate::model::{Blockchain, Module};
use crate::notify::Notifier;
use crate::store::{AccountsStore, BlockchainTokensStore, LiquityStore, StatusTracker};
use crate::tasks::{TaskManager, TaskRegistry};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<SessionInner>`.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: SessionConfig,
    tasks: Arc<TaskManager>,
    status: Arc<StatusTracker>,
    notifier: Arc<Notifier>,
    entitlements: Arc<Entitlements>,
    liquity: LiquityStore,
    accounts: Arc<AccountsStore>,
    tokens: Arc<BlockchainTokensStore>,
}

impl Session {
    /// Build a session for the backend in `config`. Does not contact it.
    pub fn new(config: SessionConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = RotkiClient::new(config.url.as_str(), &transport)?;
        let tasks = Arc::new(TaskManager::new(
            client,
            config.poll_interval,
            config.task_timeout,
        ));
        let status = Arc::new(StatusTracker::new());
        let notifier = Arc::new(Notifier::new());
        let entitlements = Arc::new(Entitlements::new(
            config.premium,
            config.modules.iter().copied(),
        ));
        let liquity = LiquityStore::new(
            Arc::clone(&tasks),
            Arc::clone(&status),
            Arc::clone(&notifier),
            Arc::clone(&entitlements),
        );
        let tokens = Arc::new(BlockchainTokensStore::new(
            Arc::clone(&tasks),
            Arc::clone(&notifier),
        ));

        debug!(url = %config.url, "session created");
        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                tasks,
                status,
                notifier,
                entitlements,
                liquity,
                accounts: Arc::new(AccountsStore::default()),
                tokens,
            }),
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &RotkiClient {
        self.inner.tasks.client()
    }

    pub fn tasks(&self) -> &TaskManager {
        &self.inner.tasks
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        self.inner.tasks.registry()
    }

    pub fn status(&self) -> &StatusTracker {
        &self.inner.status
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    pub fn entitlements(&self) -> &Entitlements {
        &self.inner.entitlements
    }

    pub fn liquity(&self) -> &LiquityStore {
        &self.inner.liquity
    }

    pub fn accounts(&self) -> &Arc<AccountsStore> {
        &self.inner.accounts
    }

    pub fn tokens(&self) -> &Arc<BlockchainTokensStore> {
        &self.inner.tokens
    }

    // ── Entitlements ─────────────────────────────────────────────────

    pub fn set_premium(&self, premium: bool) {
        self.inner.entitlements.set_premium(premium);
    }

    /// Replace the active module set. Data of a module that just got
    /// deactivated is dropped.
    pub fn set_active_modules(&self, modules: impl IntoIterator<Item = Module>) {
        let previous = self.inner.entitlements.set_active_modules(modules);
        if previous.contains(&Module::Liquity) && !self.inner.entitlements.is_active(Module::Liquity) {
            info!("liquity module deactivated, clearing its data");
            self.inner.liquity.reset();
        }
    }

    /// Load the active module list from the backend's user settings.
    /// Module ids this client does not know are ignored.
    pub async fn refresh_settings(&self) -> Result<Arc<BTreeSet<Module>>, CoreError> {
        let settings = self.client().settings().await?;
        let modules: Vec<Module> = settings
            .active_modules
            .iter()
            .filter_map(|id| match id.parse::<Module>() {
                Ok(module) => Some(module),
                Err(_) => {
                    debug!(module = %id, "ignoring unknown module");
                    None
                }
            })
            .collect();
        self.set_active_modules(modules);
        Ok(self.inner.entitlements.active_modules())
    }

    /// Reload the tracked addresses of a registered chain.
    pub async fn refresh_accounts(&self, chain: Blockchain) -> Result<Arc<Vec<String>>, CoreError> {
        if !self.inner.accounts.is_registered(chain) {
            return Err(CoreError::Unsupported {
                operation: format!("tracking accounts on {chain}"),
                required: "a registered chain".into(),
            });
        }
        let entries = self.client().list_accounts(chain.as_ref()).await?;
        debug!(%chain, count = entries.len(), "accounts loaded");
        self.inner
            .accounts
            .set_addresses(chain, entries.into_iter().map(|entry| entry.address))?;
        Ok(self.inner.accounts.addresses(chain))
    }

    /// Token detection bound to `chain` and optionally one address.
    pub fn token_detection(&self, chain: Blockchain, address: Option<String>) -> TokenDetection {
        TokenDetection::new(
            chain,
            address,
            Arc::clone(&self.inner.tokens),
            Arc::clone(&self.inner.accounts),
            Arc::clone(self.inner.tasks.registry()),
        )
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Stop polling and forget everything that belonged to the user.
    pub fn logout(&self) {
        let inner = &self.inner;
        inner.tasks.cancel_all();
        inner.tasks.registry().clear();
        inner.liquity.reset();
        inner.accounts.reset();
        inner.tokens.reset();
        inner.status.reset_all();
        inner.notifier.clear();
        inner.entitlements.set_premium(false);
        inner.entitlements.set_active_modules([]);
        info!("session closed");
    }
}

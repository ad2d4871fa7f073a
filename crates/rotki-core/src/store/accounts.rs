// ── Account address sets ──
//
// Per-chain ordered address lists. A chain must be registered before it
// can hold addresses; token detection treats unregistered chains as
// having none.

use std::sync::Arc;

use dashmap::DashMap;

use super::StateCell;
use crate::error::CoreError;
use crate::model::Blockchain;
use crate::stream::CellStream;

/// Chains registered by [`AccountsStore::default`].
pub const DEFAULT_CHAINS: [Blockchain; 6] = [
    Blockchain::Eth,
    Blockchain::Optimism,
    Blockchain::PolygonPos,
    Blockchain::ArbitrumOne,
    Blockchain::Base,
    Blockchain::Gnosis,
];

pub struct AccountsStore {
    chains: DashMap<Blockchain, Arc<StateCell<Vec<String>>>>,
}

impl AccountsStore {
    /// A store with no chains registered.
    pub fn empty() -> Self {
        Self {
            chains: DashMap::new(),
        }
    }

    /// Make `chain` known. Existing addresses are kept.
    pub fn register_chain(&self, chain: Blockchain) {
        self.chains
            .entry(chain)
            .or_insert_with(|| Arc::new(StateCell::new()));
    }

    pub fn is_registered(&self, chain: Blockchain) -> bool {
        self.chains.contains_key(&chain)
    }

    pub fn chains(&self) -> Vec<Blockchain> {
        let mut chains: Vec<Blockchain> = self.chains.iter().map(|e| *e.key()).collect();
        chains.sort();
        chains
    }

    /// Addresses of `chain`; empty when the chain is not registered.
    pub fn addresses(&self, chain: Blockchain) -> Arc<Vec<String>> {
        self.cell(chain)
            .map_or_else(|| Arc::new(Vec::new()), |cell| cell.get())
    }

    /// Replace the address list of a registered chain. Duplicates are
    /// dropped, first occurrence wins.
    pub fn set_addresses(
        &self,
        chain: Blockchain,
        addresses: impl IntoIterator<Item = String>,
    ) -> Result<(), CoreError> {
        let cell = self.cell(chain).ok_or_else(|| CoreError::Unsupported {
            operation: format!("tracking accounts on {chain}"),
            required: "a registered chain".into(),
        })?;

        let mut unique: Vec<String> = Vec::new();
        for address in addresses {
            if !unique.contains(&address) {
                unique.push(address);
            }
        }
        cell.set(unique);
        Ok(())
    }

    pub fn subscribe(&self, chain: Blockchain) -> Option<CellStream<Vec<String>>> {
        self.cell(chain).map(|cell| cell.subscribe())
    }

    /// Empty every address list; registrations survive.
    pub fn reset(&self) {
        for entry in &self.chains {
            entry.value().reset();
        }
    }

    fn cell(&self, chain: Blockchain) -> Option<Arc<StateCell<Vec<String>>>> {
        self.chains.get(&chain).map(|entry| Arc::clone(entry.value()))
    }
}

impl Default for AccountsStore {
    fn default() -> Self {
        let store = Self::empty();
        for chain in DEFAULT_CHAINS {
            store.register_chain(chain);
        }
        store
    }
}

// ── Premium and module state ──
//
// What the logged-in user is allowed to fetch. Stores read a snapshot
// right before each fetch so a change applies to the next call.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;

use crate::fetch::FetchState;
use crate::model::Module;
use crate::stream::CellStream;

#[derive(Debug)]
pub struct Entitlements {
    premium: watch::Sender<bool>,
    modules: watch::Sender<Arc<BTreeSet<Module>>>,
}

impl Entitlements {
    pub fn new(premium: bool, modules: impl IntoIterator<Item = Module>) -> Self {
        let (premium, _) = watch::channel(premium);
        let (modules, _) = watch::channel(Arc::new(modules.into_iter().collect()));
        Self { premium, modules }
    }

    pub fn premium(&self) -> bool {
        *self.premium.borrow()
    }

    pub fn set_premium(&self, premium: bool) {
        self.premium.send_if_modified(|current| {
            let changed = *current != premium;
            *current = premium;
            changed
        });
    }

    pub fn active_modules(&self) -> Arc<BTreeSet<Module>> {
        self.modules.borrow().clone()
    }

    pub fn is_active(&self, module: Module) -> bool {
        self.modules.borrow().contains(&module)
    }

    /// Replace the active set, returning the previous one.
    pub fn set_active_modules(&self, modules: impl IntoIterator<Item = Module>) -> Arc<BTreeSet<Module>> {
        self.modules.send_replace(Arc::new(modules.into_iter().collect()))
    }

    pub fn snapshot(&self) -> FetchState {
        FetchState {
            premium: self.premium(),
            active_modules: (*self.active_modules()).clone(),
        }
    }

    pub fn subscribe_premium(&self) -> watch::Receiver<bool> {
        self.premium.subscribe()
    }

    pub fn subscribe_modules(&self) -> CellStream<BTreeSet<Module>> {
        CellStream::new(self.modules.subscribe())
    }
}

impl Default for Entitlements {
    fn default() -> Self {
        Self::new(false, [])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_latest_state() {
        let entitlements = Entitlements::default();
        assert_eq!(entitlements.snapshot(), FetchState::default());

        entitlements.set_premium(true);
        let previous = entitlements.set_active_modules([Module::Liquity, Module::Aave]);
        assert!(previous.is_empty());

        let snap = entitlements.snapshot();
        assert!(snap.premium);
        assert!(snap.active_modules.contains(&Module::Liquity));
        assert!(entitlements.is_active(Module::Aave));
        assert!(!entitlements.is_active(Module::Compound));
    }
}

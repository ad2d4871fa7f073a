// ── Reactive stores ──
//
// State cells, section status, and the per-domain stores built on them.

mod accounts;
mod cell;
mod liquity;
mod status;
mod tokens;

pub use accounts::{AccountsStore, DEFAULT_CHAINS};
pub use cell::StateCell;
pub use liquity::LiquityStore;
pub use status::{Generation, StatusTracker};
pub use tokens::BlockchainTokensStore;

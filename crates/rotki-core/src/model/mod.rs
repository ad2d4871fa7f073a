// ── Domain model ──
//
// Chains, modules, sections and task identities shared by the stores,
// plus the typed payloads parsed out of backend task results.

pub mod chain;
pub mod liquity;
pub mod module;
pub mod section;
pub mod task;
pub mod tokens;

pub use chain::Blockchain;
pub use liquity::{
    AssetBalance, LiquityBalances, LiquityEvent, LiquityPoolDetails, LiquityStaking, PoolPosition,
    StakeEvent, StakeOperation, StakingPosition, Trove, TroveEvent, TroveEvents, TroveOperation,
};
pub use module::Module;
pub use section::{Section, Status};
pub use task::{TaskKey, TaskMeta, TaskType};
pub use tokens::{DetectedTokensByAddress, DetectedTokensInfo, DetectedTokensSummary};

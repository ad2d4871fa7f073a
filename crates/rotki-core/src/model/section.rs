use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};

/// A logical resource area whose load status is tracked independently.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Section {
    DefiLiquityBalances,
    DefiLiquityEvents,
    DefiLiquityStaking,
    DefiLiquityStakingPools,
}

/// Load status of a [`Section`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    /// Never fetched since start or the last reset.
    #[default]
    None,
    /// First fetch in flight.
    Loading,
    /// Forced re-fetch in flight; previous data is still shown.
    Refreshing,
    Loaded,
    Failed,
}

impl Status {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Loading | Self::Refreshing)
    }

    pub fn is_loaded(self) -> bool {
        self == Self::Loaded
    }
}

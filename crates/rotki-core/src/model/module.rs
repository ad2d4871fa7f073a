use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Optional backend feature areas a user can enable independently.
///
/// Fetches for a module's data are skipped while the module is inactive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Module {
    MakerdaoDsr,
    MakerdaoVaults,
    Aave,
    Compound,
    YearnVaults,
    #[serde(rename = "yearn_vaults_v2")]
    #[strum(serialize = "yearn_vaults_v2")]
    YearnVaultsV2,
    Uniswap,
    Adex,
    Loopring,
    Balancer,
    Eth2,
    Sushiswap,
    Liquity,
    PickleFinance,
    Nfts,
}

impl Module {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::MakerdaoDsr => "MakerDAO DSR",
            Self::MakerdaoVaults => "MakerDAO Vaults",
            Self::Aave => "Aave",
            Self::Compound => "Compound",
            Self::YearnVaults => "Yearn Vaults",
            Self::YearnVaultsV2 => "Yearn V2 Vaults",
            Self::Uniswap => "Uniswap",
            Self::Adex => "AdEx",
            Self::Loopring => "Loopring",
            Self::Balancer => "Balancer",
            Self::Eth2 => "Eth2",
            Self::Sushiswap => "Sushiswap",
            Self::Liquity => "Liquity",
            Self::PickleFinance => "Pickle Finance",
            Self::Nfts => "NFTs",
        }
    }
}

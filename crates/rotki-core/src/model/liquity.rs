// ── Liquity payloads ──
//
// Typed views of the Liquity module responses. Every collection is keyed
// by the owning address; an empty map is the "nothing fetched" default.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;

/// An amount of an asset together with its value in the main currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub amount: Decimal,
    pub usd_value: Decimal,
}

/// An open or closed trove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trove {
    pub collateral: AssetBalance,
    pub debt: AssetBalance,
    #[serde(default)]
    pub collateralization_ratio: Option<Decimal>,
    #[serde(default)]
    pub liquidation_price: Option<Decimal>,
    pub active: bool,
    pub trove_id: u64,
}

pub type LiquityBalances = BTreeMap<String, Trove>;

/// LQTY staked by an address and the rewards it accrued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPosition {
    pub staked: AssetBalance,
    pub lusd_rewards: AssetBalance,
    pub eth_rewards: AssetBalance,
}

pub type LiquityStaking = BTreeMap<String, StakingPosition>;

/// Stability pool deposit of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPosition {
    pub deposited: AssetBalance,
    pub rewards: AssetBalance,
    pub gains: AssetBalance,
}

pub type LiquityPoolDetails = BTreeMap<String, PoolPosition>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TroveOperation {
    #[serde(rename = "Open Trove")]
    #[strum(serialize = "Open Trove")]
    OpenTrove,
    #[serde(rename = "Close Trove")]
    #[strum(serialize = "Close Trove")]
    CloseTrove,
    #[serde(rename = "Adjust Trove")]
    #[strum(serialize = "Adjust Trove")]
    AdjustTrove,
    #[serde(rename = "Accrue Rewards")]
    #[strum(serialize = "Accrue Rewards")]
    AccrueRewards,
    #[serde(rename = "Liquidation In Normal Mode")]
    #[strum(serialize = "Liquidation In Normal Mode")]
    LiquidationNormalMode,
    #[serde(rename = "Liquidation In Recovery Mode")]
    #[strum(serialize = "Liquidation In Recovery Mode")]
    LiquidationRecoveryMode,
    #[serde(rename = "Redeem Collateral")]
    #[strum(serialize = "Redeem Collateral")]
    RedeemCollateral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum StakeOperation {
    #[serde(rename = "Stake Created")]
    #[strum(serialize = "Stake Created")]
    Created,
    #[serde(rename = "Stake Increased")]
    #[strum(serialize = "Stake Increased")]
    Increased,
    #[serde(rename = "Stake Decreased")]
    #[strum(serialize = "Stake Decreased")]
    Decreased,
    #[serde(rename = "Stake Removed")]
    #[strum(serialize = "Stake Removed")]
    Removed,
    #[serde(rename = "Gains Withdrawn")]
    #[strum(serialize = "Gains Withdrawn")]
    GainsWithdrawn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroveEvent {
    pub tx: String,
    pub address: String,
    pub timestamp: i64,
    pub debt_after: AssetBalance,
    pub collateral_after: AssetBalance,
    pub debt_delta: AssetBalance,
    pub collateral_delta: AssetBalance,
    pub trove_operation: TroveOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeEvent {
    pub tx: String,
    pub address: String,
    pub timestamp: i64,
    pub stake_after: AssetBalance,
    pub stake_change: AssetBalance,
    pub issuance_gain: AssetBalance,
    pub redemption_gain: AssetBalance,
    pub stake_operation: StakeOperation,
}

/// One entry of the Liquity history, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LiquityEvent {
    Trove(TroveEvent),
    Stake(StakeEvent),
}

impl LiquityEvent {
    pub fn tx(&self) -> &str {
        match self {
            Self::Trove(e) => &e.tx,
            Self::Stake(e) => &e.tx,
        }
    }

    pub fn address(&self) -> &str {
        match self {
            Self::Trove(e) => &e.address,
            Self::Stake(e) => &e.address,
        }
    }

    /// Human readable operation, e.g. "Open Trove".
    pub fn operation(&self) -> String {
        match self {
            Self::Trove(e) => e.trove_operation.to_string(),
            Self::Stake(e) => e.stake_operation.to_string(),
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            Self::Trove(e) => e.timestamp,
            Self::Stake(e) => e.timestamp,
        }
    }
}

pub type TroveEvents = BTreeMap<String, Vec<LiquityEvent>>;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Blockchains the backend can track accounts on.
///
/// The string form is the identifier used in API paths
/// (`blockchains/{chain}/...`).
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
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Blockchain {
    Eth,
    Eth2,
    Btc,
    Bch,
    Ksm,
    Dot,
    Avax,
    Optimism,
    PolygonPos,
    ArbitrumOne,
    Base,
    Gnosis,
    Scroll,
    ZksyncLite,
}

impl Blockchain {
    /// Whether the backend scans this chain's transactions, which token
    /// detection depends on.
    pub fn supports_transactions(self) -> bool {
        matches!(
            self,
            Self::Eth
                | Self::Optimism
                | Self::PolygonPos
                | Self::ArbitrumOne
                | Self::Base
                | Self::Gnosis
                | Self::Scroll
        )
    }

    /// Human readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Eth => "Ethereum",
            Self::Eth2 => "Ethereum Staking",
            Self::Btc => "Bitcoin",
            Self::Bch => "Bitcoin Cash",
            Self::Ksm => "Kusama",
            Self::Dot => "Polkadot",
            Self::Avax => "Avalanche",
            Self::Optimism => "Optimism",
            Self::PolygonPos => "Polygon PoS",
            Self::ArbitrumOne => "Arbitrum One",
            Self::Base => "Base",
            Self::Gnosis => "Gnosis",
            Self::Scroll => "Scroll",
            Self::ZksyncLite => "ZKsync Lite",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn identifiers_round_trip_through_strings() {
        assert_eq!(Blockchain::PolygonPos.as_ref(), "polygon_pos");
        assert_eq!(Blockchain::from_str("arbitrum_one").unwrap(), Blockchain::ArbitrumOne);
        assert_eq!(Blockchain::from_str("ETH").unwrap(), Blockchain::Eth);
    }

    #[test]
    fn only_evm_scanners_support_transactions() {
        let scanning: Vec<_> = Blockchain::iter()
            .filter(|c| c.supports_transactions())
            .collect();
        assert!(scanning.contains(&Blockchain::Gnosis));
        assert!(!scanning.contains(&Blockchain::Btc));
        assert!(!scanning.contains(&Blockchain::ZksyncLite));
        assert_eq!(scanning.len(), 7);
    }
}

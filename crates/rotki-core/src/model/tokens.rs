use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tokens the backend detected for one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedTokensInfo {
    /// Asset identifiers.
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub last_update_timestamp: Option<i64>,
}

/// Detection response: address -> detected tokens.
pub type DetectedTokensByAddress = BTreeMap<String, DetectedTokensInfo>;

/// Aggregated view over one or more addresses of a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectedTokensSummary {
    pub tokens: Vec<String>,
    pub total: usize,
    pub timestamp: Option<i64>,
}

impl DetectedTokensSummary {
    /// Merge per-address infos, keeping the first occurrence of each token
    /// and the most recent update time.
    pub fn merge<'a>(infos: impl IntoIterator<Item = &'a DetectedTokensInfo>) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        let mut timestamp = None;
        for info in infos {
            for token in &info.tokens {
                if !tokens.contains(token) {
                    tokens.push(token.clone());
                }
            }
            timestamp = timestamp.max(info.last_update_timestamp);
        }
        Self {
            total: tokens.len(),
            tokens,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_deduplicates_and_keeps_latest_timestamp() {
        let a = DetectedTokensInfo {
            tokens: vec!["eip155:1/erc20:0x1".into(), "eip155:1/erc20:0x2".into()],
            last_update_timestamp: Some(10),
        };
        let b = DetectedTokensInfo {
            tokens: vec!["eip155:1/erc20:0x2".into(), "eip155:1/erc20:0x3".into()],
            last_update_timestamp: Some(20),
        };
        let summary = DetectedTokensSummary::merge([&a, &b]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.timestamp, Some(20));
        assert_eq!(summary.tokens[0], "eip155:1/erc20:0x1");
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        let summary = DetectedTokensSummary::merge(std::iter::empty());
        assert_eq!(summary, DetectedTokensSummary::default());
    }
}

// Blockchain account and token detection endpoints

use tracing::debug;

use crate::client::RotkiClient;
use crate::error::Error;
use crate::models::{AccountEntry, AsyncTask, DetectTokensRequest, UserSettings};

impl RotkiClient {
    /// Tracked accounts for a chain.
    ///
    /// `GET /api/1/blockchains/{chain}/accounts`
    pub async fn list_accounts(&self, chain: &str) -> Result<Vec<AccountEntry>, Error> {
        debug!(chain, "listing accounts");
        self.get(&format!("blockchains/{chain}/accounts")).await
    }

    /// Start token detection for the given addresses of a chain.
    ///
    /// `POST /api/1/blockchains/{chain}/tokens/detect`
    ///
    /// With `only_cache` the backend answers from its last detection run
    /// instead of scanning the chain again. An empty `addresses` slice
    /// means every tracked address.
    pub async fn detect_tokens(
        &self,
        chain: &str,
        addresses: &[String],
        only_cache: bool,
    ) -> Result<AsyncTask, Error> {
        debug!(chain, count = addresses.len(), only_cache, "detecting tokens");
        self.post(
            &format!("blockchains/{chain}/tokens/detect"),
            &DetectTokensRequest {
                async_query: true,
                only_cache,
                addresses,
            },
        )
        .await
    }

    /// Current user settings.
    ///
    /// `GET /api/1/settings`
    pub async fn settings(&self) -> Result<UserSettings, Error> {
        self.get("settings").await
    }
}

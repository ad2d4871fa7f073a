// Liquity module endpoints
//
// All four queries are expensive on the backend side and are only ever
// dispatched asynchronously; callers collect the payload via the task queue.

use tracing::debug;

use crate::client::RotkiClient;
use crate::error::Error;
use crate::models::AsyncTask;

const LIQUITY: &str = "blockchains/eth/modules/liquity";

impl RotkiClient {
    /// Trove balances per address.
    ///
    /// `GET /api/1/blockchains/eth/modules/liquity/balances?async_query=true`
    pub async fn liquity_balances(&self) -> Result<AsyncTask, Error> {
        debug!("querying liquity balances");
        self.async_get(&format!("{LIQUITY}/balances")).await
    }

    /// Trove event history. Requires premium on the backend.
    ///
    /// `GET /api/1/blockchains/eth/modules/liquity/events/trove?async_query=true`
    pub async fn liquity_trove_events(&self) -> Result<AsyncTask, Error> {
        debug!("querying liquity trove events");
        self.async_get(&format!("{LIQUITY}/events/trove")).await
    }

    /// LQTY staking positions. Requires premium on the backend.
    ///
    /// `GET /api/1/blockchains/eth/modules/liquity/staking?async_query=true`
    pub async fn liquity_staking(&self) -> Result<AsyncTask, Error> {
        debug!("querying liquity staking");
        self.async_get(&format!("{LIQUITY}/staking")).await
    }

    /// Stability pool deposits and gains.
    ///
    /// `GET /api/1/blockchains/eth/modules/liquity/pool?async_query=true`
    pub async fn liquity_staking_pools(&self) -> Result<AsyncTask, Error> {
        debug!("querying liquity stability pools");
        self.async_get(&format!("{LIQUITY}/pool")).await
    }

    pub(crate) async fn async_get(&self, path: &str) -> Result<AsyncTask, Error> {
        self.get_with_params(path, &[("async_query", "true".to_owned())])
            .await
    }
}

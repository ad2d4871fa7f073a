//! Liquity command handlers.

use rotki_core::Session;
use rotki_core::model::{LiquityEvent, PoolPosition, StakingPosition, Trove};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{GlobalOpts, LiquityArgs, LiquityCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, fmt_asset, fmt_timestamp};

// ── Serializable entries ────────────────────────────────────────────

#[derive(Serialize)]
struct Entry<'a, T: Serialize> {
    address: &'a str,
    #[serde(flatten)]
    data: &'a T,
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TroveRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Trove")]
    trove_id: u64,
    #[tabled(rename = "Collateral")]
    collateral: String,
    #[tabled(rename = "Debt")]
    debt: String,
    #[tabled(rename = "Ratio %")]
    ratio: String,
    #[tabled(rename = "Liq. price")]
    liquidation_price: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl TroveRow {
    fn new(entry: &Entry<'_, Trove>, color: bool) -> Self {
        let trove = entry.data;
        Self {
            address: entry.address.to_owned(),
            trove_id: trove.trove_id,
            collateral: fmt_asset(&trove.collateral),
            debt: fmt_asset(&trove.debt),
            ratio: trove
                .collateralization_ratio
                .map(|r| r.round_dp(2).to_string())
                .unwrap_or_default(),
            liquidation_price: trove
                .liquidation_price
                .map(|p| p.round_dp(2).to_string())
                .unwrap_or_default(),
            active: output::flag(trove.active, color),
        }
    }
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Tx")]
    tx: String,
}

impl From<&&LiquityEvent> for EventRow {
    fn from(event: &&LiquityEvent) -> Self {
        Self {
            time: fmt_timestamp(event.timestamp()),
            address: event.address().to_owned(),
            operation: event.operation(),
            tx: event.tx().to_owned(),
        }
    }
}

#[derive(Tabled)]
struct StakingRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Staked")]
    staked: String,
    #[tabled(rename = "LUSD rewards")]
    lusd_rewards: String,
    #[tabled(rename = "ETH rewards")]
    eth_rewards: String,
}

impl From<&Entry<'_, StakingPosition>> for StakingRow {
    fn from(entry: &Entry<'_, StakingPosition>) -> Self {
        Self {
            address: entry.address.to_owned(),
            staked: fmt_asset(&entry.data.staked),
            lusd_rewards: fmt_asset(&entry.data.lusd_rewards),
            eth_rewards: fmt_asset(&entry.data.eth_rewards),
        }
    }
}

#[derive(Tabled)]
struct PoolRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Deposited")]
    deposited: String,
    #[tabled(rename = "Rewards")]
    rewards: String,
    #[tabled(rename = "Gains")]
    gains: String,
}

impl From<&Entry<'_, PoolPosition>> for PoolRow {
    fn from(entry: &Entry<'_, PoolPosition>) -> Self {
        Self {
            address: entry.address.to_owned(),
            deposited: fmt_asset(&entry.data.deposited),
            rewards: fmt_asset(&entry.data.rewards),
            gains: fmt_asset(&entry.data.gains),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: LiquityArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Without --module flags or profile modules the backend's settings decide.
    if session.config().modules.is_empty() {
        session.refresh_settings().await?;
    }
    let store = session.liquity();

    let out = match args.command {
        LiquityCommand::Balances(args) => {
            let bar = output::spinner(global, "Fetching Liquity balances");
            let outcome = store.fetch_balances(args.refresh).await;
            bar.finish_and_clear();
            util::check_outcome(session, "liquity balances", outcome)?;

            let balances = store.balances();
            let entries: Vec<Entry<'_, Trove>> = balances
                .iter()
                .map(|(address, data)| Entry { address, data })
                .collect();
            let color = output::should_color(&global.color);
            output::render_list(
                &global.output,
                &entries,
                |e| TroveRow::new(e, color),
                |e| e.address.to_owned(),
            )?
        }

        LiquityCommand::Events(args) => {
            let bar = output::spinner(global, "Fetching Liquity events");
            let outcome = store.fetch_events(args.refresh).await;
            bar.finish_and_clear();
            util::check_outcome(session, "liquity events", outcome)?;

            let events = store.events();
            let mut flat: Vec<&LiquityEvent> = events.values().flatten().collect();
            flat.sort_by_key(|e| e.timestamp());
            output::render_list(
                &global.output,
                &flat,
                |e| EventRow::from(e),
                |e| e.tx().to_owned(),
            )?
        }

        LiquityCommand::Staking(args) => {
            let bar = output::spinner(global, "Fetching Liquity staking");
            let outcome = store.fetch_staking(args.refresh).await;
            bar.finish_and_clear();
            util::check_outcome(session, "liquity staking", outcome)?;

            let staking = store.staking();
            let entries: Vec<Entry<'_, StakingPosition>> = staking
                .iter()
                .map(|(address, data)| Entry { address, data })
                .collect();
            output::render_list(
                &global.output,
                &entries,
                |e| StakingRow::from(e),
                |e| e.address.to_owned(),
            )?
        }

        LiquityCommand::Pools(args) => {
            let bar = output::spinner(global, "Fetching Liquity stability pool");
            let outcome = store.fetch_pools(args.refresh).await;
            bar.finish_and_clear();
            util::check_outcome(session, "liquity pools", outcome)?;

            let pools = store.pools();
            let entries: Vec<Entry<'_, PoolPosition>> = pools
                .iter()
                .map(|(address, data)| Entry { address, data })
                .collect();
            output::render_list(
                &global.output,
                &entries,
                |e| PoolRow::from(e),
                |e| e.address.to_owned(),
            )?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

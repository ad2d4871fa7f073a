//! Shared helpers for command handlers.

use chrono::DateTime;
use rotki_core::model::AssetBalance;
use rotki_core::{FetchOutcome, Session, SkipReason};

use crate::error::CliError;

/// Turn a fetch outcome into an error the user can act on.
///
/// Failed fetches carry their reason in the session's notification
/// history rather than in the outcome itself.
pub fn check_outcome(
    session: &Session,
    operation: &str,
    outcome: FetchOutcome,
) -> Result<(), CliError> {
    match outcome {
        FetchOutcome::Loaded
        | FetchOutcome::Skipped(SkipReason::AlreadyLoaded | SkipReason::InProgress) => Ok(()),
        FetchOutcome::Skipped(SkipReason::ModuleInactive(module)) => Err(CliError::Unsupported {
            operation: operation.into(),
            required: format!("the {module} module to be active (pass --module {module})"),
        }),
        FetchOutcome::Skipped(SkipReason::PremiumRequired) => Err(CliError::Unsupported {
            operation: operation.into(),
            required: "a premium subscription (pass --premium)".into(),
        }),
        FetchOutcome::Failed => Err(last_failure(session, operation)),
        FetchOutcome::Discarded => Err(CliError::Cancelled),
    }
}

/// The most recent notification as an error.
pub fn last_failure(session: &Session, operation: &str) -> CliError {
    session.notifier().history().last().map_or_else(
        || CliError::FetchFailed {
            title: operation.into(),
            message: "no details reported".into(),
        },
        |n| CliError::FetchFailed {
            title: n.title.clone(),
            message: n.message.clone(),
        },
    )
}

/// Print every recorded notification to stderr.
pub fn report_notifications(session: &Session, quiet: bool) {
    if quiet {
        return;
    }
    for notification in session.notifier().history() {
        eprintln!("warning: {}: {}", notification.title, notification.message);
    }
}

pub fn fmt_asset(balance: &AssetBalance) -> String {
    format!("{} {}", balance.amount.round_dp(4).normalize(), balance.asset)
}

pub fn fmt_timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn asset_amounts_are_rounded() {
        let balance = AssetBalance {
            asset: "ETH".into(),
            amount: Decimal::new(1_234_567, 5),
            usd_value: Decimal::ZERO,
        };
        assert_eq!(fmt_asset(&balance), "12.3457 ETH");
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(fmt_timestamp(0), "1970-01-01 00:00");
    }
}

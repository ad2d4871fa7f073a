//! Token detection command handlers.

use std::collections::HashSet;

use rotki_core::{Blockchain, DetectedTokensInfo, DetectionSummary, Session};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{GlobalOpts, TokensArgs, TokensCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, fmt_timestamp};

#[derive(Serialize)]
struct TokenEntry {
    address: String,
    #[serde(flatten)]
    info: DetectedTokensInfo,
}

#[derive(Tabled)]
struct TokenRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Tokens")]
    tokens: usize,
    #[tabled(rename = "Last update")]
    last_update: String,
}

impl From<&TokenEntry> for TokenRow {
    fn from(entry: &TokenEntry) -> Self {
        Self {
            address: entry.address.clone(),
            tokens: entry.info.tokens.len(),
            last_update: entry
                .info
                .last_update_timestamp
                .map(fmt_timestamp)
                .unwrap_or_default(),
        }
    }
}

fn entries(session: &Session, chain: Blockchain, addresses: &[String]) -> Vec<TokenEntry> {
    addresses
        .iter()
        .map(|address| TokenEntry {
            address: address.clone(),
            info: session
                .tokens()
                .get(chain, address)
                .map(|info| (*info).clone())
                .unwrap_or_default(),
        })
        .collect()
}

fn require_transactions(chain: Blockchain) -> Result<(), CliError> {
    if chain.supports_transactions() {
        Ok(())
    } else {
        Err(CliError::Unsupported {
            operation: format!("token detection on {chain}"),
            required: "a chain with transaction support".into(),
        })
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: TokensArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TokensCommand::Detect {
            chain,
            address,
            all,
        } => {
            require_transactions(chain)?;

            let (summary, targets) = if all {
                session.refresh_accounts(chain).await?;
                let bar = output::spinner(global, &format!("Detecting tokens on {chain}"));
                let summary = session
                    .token_detection(chain, None)
                    .detect_tokens_of_all_addresses()
                    .await;
                bar.finish_and_clear();
                (summary, session.accounts().addresses(chain).to_vec())
            } else {
                detect_listed(session, chain, address, global).await?
            };

            if summary.attempted > 0 && summary.failed == summary.attempted {
                return Err(util::last_failure(session, "token detection"));
            }
            if summary.failed > 0 {
                util::report_notifications(session, global.quiet);
            }

            let data = entries(session, chain, &targets);
            let out = output::render_list(
                &global.output,
                &data,
                |e| TokenRow::from(e),
                |e| e.address.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TokensCommand::Show { chain, address } => {
            require_transactions(chain)?;

            let bar = output::spinner(global, &format!("Loading detected tokens on {chain}"));
            let loaded = session.tokens().fetch_cached_tokens(chain).await;
            bar.finish_and_clear();
            loaded?;

            let targets = match address {
                Some(address) => {
                    if session.tokens().get(chain, &address).is_none() {
                        return Err(CliError::NotFound {
                            resource_type: "detected tokens for address".into(),
                            identifier: address,
                        });
                    }
                    vec![address]
                }
                None => session.tokens().addresses(chain),
            };

            let data = entries(session, chain, &targets);
            let out = output::render_list(
                &global.output,
                &data,
                |e| TokenRow::from(e),
                |e| e.info.tokens.join("\n"),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

async fn detect_listed(
    session: &Session,
    chain: Blockchain,
    addresses: Vec<String>,
    global: &GlobalOpts,
) -> Result<(DetectionSummary, Vec<String>), CliError> {
    let addresses = unique(addresses);
    let detection = match addresses.as_slice() {
        [] => {
            return Err(CliError::Validation {
                field: "address".into(),
                reason: "pass at least one --address, or --all".into(),
            });
        }
        [single] => session.token_detection(chain, Some(single.clone())),
        _ => session.token_detection(chain, None),
    };

    let bar = output::spinner(
        global,
        &format!("Detecting tokens of {} address(es) on {chain}", addresses.len()),
    );
    let summary = if detection.account_address().is_some() {
        detection.detect_tokens(&[]).await
    } else {
        detection.detect_tokens(&addresses).await
    };
    bar.finish_and_clear();
    Ok((summary, addresses))
}

/// Drop repeated addresses, keeping the first occurrence.
fn unique(addresses: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    addresses
        .into_iter()
        .filter(|address| seen.insert(address.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_addresses_are_detected_once() {
        let addresses = ["0xB", "0xA", "0xB", "0xA"].map(String::from).to_vec();
        assert_eq!(unique(addresses), vec!["0xB", "0xA"]);
    }
}

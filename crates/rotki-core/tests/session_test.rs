#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rotki_core::{
    Blockchain, FetchOutcome, Module, Section, Session, SessionConfig, SkipReason, Status,
};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

fn session(server: &MockServer, premium: bool, modules: &[Module]) -> Session {
    let mut config = SessionConfig::new(Url::parse(&server.uri()).unwrap());
    config.poll_interval = Duration::from_millis(10);
    config.task_timeout = Duration::from_secs(5);
    config.premium = premium;
    config.modules = modules.to_vec();
    Session::new(config).unwrap()
}

fn envelope(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": result, "message": "" }))
}

async fn mount_task(server: &MockServer, task_id: u64, result: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/1/tasks/{task_id}")))
        .respond_with(envelope(json!({
            "status": "completed",
            "outcome": { "result": result, "message": "" }
        })))
        .mount(server)
        .await;
}

async fn mount_failed_task(server: &MockServer, task_id: u64, message: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/1/tasks/{task_id}")))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "result": {
                "status": "completed",
                "outcome": { "result": null, "message": message, "status_code": 502 }
            },
            "message": ""
        })))
        .mount(server)
        .await;
}

async fn mount_liquity(server: &MockServer, endpoint: &str, task_id: u64, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/1/blockchains/eth/modules/liquity/{endpoint}")))
        .and(query_param("async_query", "true"))
        .respond_with(envelope(json!({ "task_id": task_id })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn asset(name: &str, amount: &str) -> Value {
    json!({ "asset": name, "amount": amount, "usd_value": "0" })
}

fn trove(amount: &str) -> Value {
    json!({
        "collateral": asset("ETH", amount),
        "debt": asset("LUSD", "1000"),
        "collateralization_ratio": "250",
        "liquidation_price": "1200.5",
        "active": true,
        "trove_id": 1
    })
}

// ── Liquity ─────────────────────────────────────────────────────────

#[tokio::test]
async fn liquity_balances_are_loaded() {
    let server = MockServer::start().await;
    mount_liquity(&server, "balances", 1, 1).await;
    mount_task(&server, 1, json!({ "0xA": trove("10") })).await;

    let session = session(&server, false, &[Module::Liquity]);
    let outcome = session.liquity().fetch_balances(false).await;

    assert_eq!(outcome, FetchOutcome::Loaded);
    let balances = session.liquity().balances();
    assert_eq!(balances["0xA"].collateral.amount.to_string(), "10");
    assert_eq!(
        session.status().get(Section::DefiLiquityBalances),
        Status::Loaded
    );
    assert!(session.registry().is_empty());
}

#[tokio::test]
async fn premium_sections_need_premium() {
    let server = MockServer::start().await;
    mount_liquity(&server, "events/trove", 2, 0).await;
    mount_liquity(&server, "staking", 3, 0).await;

    let session = session(&server, false, &[Module::Liquity]);
    assert_eq!(
        session.liquity().fetch_events(false).await,
        FetchOutcome::Skipped(SkipReason::PremiumRequired)
    );
    assert_eq!(
        session.liquity().fetch_staking(true).await,
        FetchOutcome::Skipped(SkipReason::PremiumRequired)
    );
    assert_eq!(session.status().get(Section::DefiLiquityEvents), Status::None);
}

#[tokio::test]
async fn inactive_liquity_module_never_queries() {
    let server = MockServer::start().await;
    mount_liquity(&server, "pool", 4, 0).await;

    let session = session(&server, true, &[Module::Aave]);
    assert_eq!(
        session.liquity().fetch_pools(false).await,
        FetchOutcome::Skipped(SkipReason::ModuleInactive(Module::Liquity))
    );
    assert!(session.liquity().pools().is_empty());
}

#[tokio::test]
async fn failed_task_sets_failed_status_and_notifies() {
    let server = MockServer::start().await;
    mount_liquity(&server, "staking", 5, 1).await;
    mount_failed_task(&server, 5, "could not reach node").await;

    let session = session(&server, true, &[Module::Liquity]);
    let outcome = session.liquity().fetch_staking(false).await;

    assert_eq!(outcome, FetchOutcome::Failed);
    assert_eq!(
        session.status().get(Section::DefiLiquityStaking),
        Status::Failed
    );
    let history = session.notifier().history();
    assert_eq!(history.len(), 1);
    assert!(history[0].message.contains("could not reach node"));
}

#[tokio::test]
async fn deactivating_liquity_resets_store() {
    let server = MockServer::start().await;
    mount_liquity(&server, "balances", 6, 1).await;
    mount_task(&server, 6, json!({ "0xA": trove("3") })).await;

    let session = session(&server, false, &[Module::Liquity]);
    session.liquity().fetch_balances(false).await;
    assert!(!session.liquity().balances().is_empty());

    session.set_active_modules([Module::Liquity, Module::Aave]);
    assert!(!session.liquity().balances().is_empty());

    session.set_active_modules([Module::Aave]);
    assert!(session.liquity().balances().is_empty());
    assert_eq!(
        session.status().get(Section::DefiLiquityBalances),
        Status::None
    );
}

// ── Settings & accounts ─────────────────────────────────────────────

#[tokio::test]
async fn refresh_settings_reads_active_modules() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/settings"))
        .respond_with(envelope(json!({
            "active_modules": ["liquity", "uniswap", "not_a_module"],
            "main_currency": "USD"
        })))
        .mount(&server)
        .await;

    let session = session(&server, false, &[]);
    let modules = session.refresh_settings().await.unwrap();

    assert_eq!(*modules, BTreeSet::from([Module::Liquity, Module::Uniswap]));
    assert!(session.entitlements().is_active(Module::Liquity));
}

#[tokio::test]
async fn refresh_accounts_fills_address_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/blockchains/optimism/accounts"))
        .respond_with(envelope(json!([
            { "address": "0xA", "label": null, "tags": null },
            { "address": "0xB", "label": "cold", "tags": ["hw"] }
        ])))
        .mount(&server)
        .await;

    let session = session(&server, false, &[]);
    let addresses = session.refresh_accounts(Blockchain::Optimism).await.unwrap();
    assert_eq!(*addresses, vec!["0xA", "0xB"]);

    let err = session.refresh_accounts(Blockchain::Btc).await.unwrap_err();
    assert!(matches!(err, rotki_core::CoreError::Unsupported { .. }));
}

// ── Token detection ─────────────────────────────────────────────────

async fn mount_detection(server: &MockServer, chain: &str, address: &str, task_id: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/api/1/blockchains/{chain}/tokens/detect")))
        .and(body_partial_json(json!({ "addresses": [address] })))
        .respond_with(envelope(json!({ "task_id": task_id })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn detection_settles_every_address() {
    let server = MockServer::start().await;
    mount_detection(&server, "eth", "0xA", 10).await;
    mount_detection(&server, "eth", "0xB", 11).await;
    mount_failed_task(&server, 10, "rpc error").await;
    mount_task(
        &server,
        11,
        json!({ "0xB": { "tokens": ["eip155:1/erc20:0xT"], "last_update_timestamp": 1_700_000_000 } }),
    )
    .await;

    let session = session(&server, false, &[]);
    let detection = session.token_detection(Blockchain::Eth, None);
    let summary = detection
        .detect_tokens(&["0xA".to_owned(), "0xB".to_owned()])
        .await;

    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(detection.detected_tokens().tokens, vec!["eip155:1/erc20:0xT"]);
    assert!(!detection.detecting_tokens());
    assert_eq!(session.notifier().history().len(), 1);
}

#[tokio::test]
async fn bound_address_is_detected_alone() {
    let server = MockServer::start().await;
    mount_detection(&server, "base", "0xA", 20).await;
    mount_task(&server, 20, json!({ "0xA": { "tokens": [], "last_update_timestamp": null } })).await;

    let session = session(&server, false, &[]);
    let detection = session.token_detection(Blockchain::Base, Some("0xA".to_owned()));
    let summary = detection.detect_tokens(&["0xB".to_owned()]).await;

    assert_eq!(summary.attempted, 1);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn all_addresses_of_registered_chain_are_detected() {
    let server = MockServer::start().await;
    mount_detection(&server, "gnosis", "0xA", 30).await;
    mount_task(&server, 30, json!({ "0xA": { "tokens": ["t"], "last_update_timestamp": 1 } })).await;

    let session = session(&server, false, &[]);
    session
        .accounts()
        .set_addresses(Blockchain::Gnosis, ["0xA".to_owned()])
        .unwrap();

    let summary = session
        .token_detection(Blockchain::Gnosis, None)
        .detect_tokens_of_all_addresses()
        .await;
    assert_eq!(summary.attempted, 1);
    assert_eq!(
        session.tokens().get(Blockchain::Gnosis, "0xA").unwrap().tokens,
        vec!["t"]
    );
}

#[tokio::test]
async fn cached_tokens_load_every_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/1/blockchains/eth/tokens/detect"))
        .and(body_partial_json(json!({ "only_cache": true })))
        .respond_with(envelope(json!({ "task_id": 50 })))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(
        &server,
        50,
        json!({
            "0xA": { "tokens": ["t1"], "last_update_timestamp": 3 },
            "0xB": { "tokens": ["t1", "t2"], "last_update_timestamp": 4 }
        }),
    )
    .await;

    let session = session(&server, false, &[]);
    session.tokens().fetch_cached_tokens(Blockchain::Eth).await.unwrap();

    let summary = session.tokens().detected_tokens_info(Blockchain::Eth, None);
    assert_eq!(summary.tokens, vec!["t1", "t2"]);
    assert_eq!(summary.timestamp, Some(4));
}

#[tokio::test]
async fn loading_cached_tokens_is_not_detecting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/1/blockchains/base/tokens/detect"))
        .and(body_partial_json(json!({ "only_cache": true })))
        .respond_with(envelope(json!({ "task_id": 51 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1/tasks/51"))
        .respond_with(
            envelope(json!({
                "status": "completed",
                "outcome": { "result": {}, "message": "" }
            }))
            .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let session = session(&server, false, &[]);
    let detection = session.token_detection(Blockchain::Base, None);
    let (loaded, detecting) = tokio::join!(session.tokens().fetch_cached_tokens(Blockchain::Base), async {
        while session.registry().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        detection.detecting_tokens()
    });

    loaded.unwrap();
    assert!(!detecting);
}

#[tokio::test]
async fn unregistered_chain_detects_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(envelope(json!({ "task_id": 1 })))
        .expect(0)
        .mount(&server)
        .await;

    let session = session(&server, false, &[]);
    let summary = session
        .token_detection(Blockchain::Scroll, None)
        .detect_tokens_of_all_addresses()
        .await;
    assert_eq!(summary.attempted, 0);
}

#[tokio::test]
#[should_panic(expected = "bound address or a non-empty address list")]
async fn detect_tokens_without_addresses_panics() {
    let server = MockServer::start().await;
    let session = session(&server, false, &[]);
    session
        .token_detection(Blockchain::Eth, None)
        .detect_tokens(&[])
        .await;
}

#[tokio::test]
#[should_panic(expected = "requires transaction support")]
async fn detection_on_chain_without_transactions_panics() {
    let server = MockServer::start().await;
    let session = session(&server, false, &[]);
    let _ = session
        .token_detection(Blockchain::Btc, None)
        .fetch_detected_tokens("bc1q")
        .await;
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn logout_clears_everything() {
    let server = MockServer::start().await;
    mount_liquity(&server, "balances", 40, 1).await;
    mount_task(&server, 40, json!({ "0xA": trove("1") })).await;

    let session = session(&server, true, &[Module::Liquity]);
    session.liquity().fetch_balances(false).await;
    session
        .accounts()
        .set_addresses(Blockchain::Eth, ["0xA".to_owned()])
        .unwrap();

    session.logout();

    assert!(session.liquity().balances().is_empty());
    assert!(session.accounts().addresses(Blockchain::Eth).is_empty());
    assert!(session.status().snapshot().is_empty());
    assert!(session.registry().is_empty());
    assert!(!session.entitlements().premium());
    assert!(session.entitlements().active_modules().is_empty());
}

#[tokio::test]
async fn logout_during_dispatch_drops_the_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1/blockchains/eth/modules/liquity/balances"))
        .respond_with(
            envelope(json!({ "task_id": 41 })).set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_task(&server, 41, json!({ "0xA": trove("1") })).await;

    let session = session(&server, false, &[Module::Liquity]);
    let (outcome, ()) = tokio::join!(session.liquity().fetch_balances(false), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.logout();
    });

    assert_eq!(outcome, FetchOutcome::Discarded);
    assert!(session.liquity().balances().is_empty());
    assert!(session.status().snapshot().is_empty());
    assert!(session.registry().is_empty());
    assert!(session.notifier().history().is_empty());
}

#[tokio::test]
async fn logout_while_polling_leaves_no_failure_behind() {
    let server = MockServer::start().await;
    mount_liquity(&server, "balances", 42, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/1/tasks/42"))
        .respond_with(envelope(json!({ "status": "pending", "outcome": null })))
        .mount(&server)
        .await;

    let session = session(&server, false, &[Module::Liquity]);
    let (outcome, ()) = tokio::join!(session.liquity().fetch_balances(false), async {
        while session.registry().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        session.logout();
    });

    assert_eq!(outcome, FetchOutcome::Discarded);
    assert_eq!(
        session.status().get(Section::DefiLiquityBalances),
        Status::None
    );
    assert!(session.notifier().history().is_empty());
}

#[tokio::test]
async fn deactivating_liquity_mid_fetch_keeps_store_empty() {
    let server = MockServer::start().await;
    mount_liquity(&server, "balances", 43, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/1/tasks/43"))
        .respond_with(
            envelope(json!({
                "status": "completed",
                "outcome": { "result": { "0xA": trove("2") }, "message": "" }
            }))
            .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let session = session(&server, false, &[Module::Liquity]);
    let (outcome, ()) = tokio::join!(session.liquity().fetch_balances(false), async {
        while session.registry().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        session.set_active_modules([Module::Aave]);
    });

    assert_eq!(outcome, FetchOutcome::Discarded);
    assert!(session.liquity().balances().is_empty());
    assert_eq!(
        session.status().get(Section::DefiLiquityBalances),
        Status::None
    );
}

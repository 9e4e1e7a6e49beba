//! Headless session tests: stdin commands in, NDJSON events out
//!
//! Run with: cargo test --test headless_session

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_test::assert_ok;

use verpager_app::config::Settings;
use verpager_app::services::{Catalog, FixtureStore};
use verpager_app::CloseReason;
use verpager_core::{InstanceContext, VersionId};
use version_pager::headless::{parse_command, run_session, HeadlessCommand};

// ─────────────────────────────────────────────────────────
// Test Data Helpers
// ─────────────────────────────────────────────────────────

const CATALOG_JSON: &str = r#"{
    "versions": [
        { "id": "v1", "version": "1.1.0" },
        { "id": "v2", "version": "1.2.0" },
        { "id": "v3", "version": "1.3.0", "displayLabel": "1.3.0 (current)" },
        { "id": "v4", "version": "1.4.0" },
        { "id": "v5", "version": "1.5.0" }
    ],
    "values": {
        "v5": { "id": "val-5", "yaml": "replicas: 1", "name": "default" }
    },
    "failPages": [3]
}"#;

fn load_catalog() -> Catalog {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, CATALOG_JSON).unwrap();
    assert_ok!(Catalog::load(&path))
}

fn context() -> InstanceContext {
    InstanceContext::from_parent_key(7, 300, "12-42").unwrap()
}

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.pager.page_size = 2;
    settings
}

/// Feed stdin lines one second apart, then hang up
fn script(lines: &'static [&'static str]) -> mpsc::Receiver<HeadlessCommand> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        for line in lines {
            tokio::time::sleep(Duration::from_secs(1)).await;
            if let Some(cmd) = parse_command(line) {
                if tx.send(cmd).await.is_err() {
                    return;
                }
            }
        }
    });
    rx
}

fn events(out: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(out)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn option_ids(event: &serde_json::Value) -> Vec<String> {
    event["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap_or("more").to_string())
        .collect()
}

fn last_options(events: &[serde_json::Value]) -> &serde_json::Value {
    events
        .iter()
        .rev()
        .find(|e| e["event"] == "options")
        .unwrap()
}

// ─────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_search_select_and_upgrade() {
    let store = Arc::new(FixtureStore::new(load_catalog()));
    let commands = script(&[
        "more",
        "search 1.5",
        "select v5",
        "edit replicas: 2",
        "submit",
    ]);
    let mut out = Vec::new();

    let reason = run_session(
        context(),
        &settings(),
        store.clone(),
        Some(VersionId::from("v3")),
        commands,
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(reason, CloseReason::Upgraded);

    let upgrades = store.upgrades();
    assert_eq!(upgrades.len(), 1);
    assert_eq!(upgrades[0].app_version_id, VersionId::from("v5"));
    assert_eq!(upgrades[0].values, "replicas: 2");
    assert_eq!(upgrades[0].value_id.as_deref(), Some("val-5"));
    assert_eq!(upgrades[0].environment_id, 12);
    assert_eq!(upgrades[0].app_id, 42);

    let queries = store.queries();
    assert_eq!(queries[0].include_version, Some(VersionId::from("v3")));
    assert_eq!(queries.last().unwrap().search_term, "1.5");

    let events = events(&out);
    let first_loaded = events
        .iter()
        .find(|e| e["event"] == "options" && e["phase"] == "loaded")
        .unwrap();
    assert_eq!(option_ids(first_loaded), vec!["v3", "v1", "more"]);
    assert_eq!(first_loaded["selected"], "v3");

    let last = last_options(&events);
    assert_eq!(last["search_term"], "1.5");
    assert_eq!(last["selected"], "v5");
    assert_eq!(events.last().unwrap()["reason"], "upgraded");
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_more_emits_notice_and_keeps_list() {
    let store = Arc::new(FixtureStore::new(load_catalog()));
    let commands = script(&["more", "more", "quit"]);
    let mut out = Vec::new();

    let reason = run_session(context(), &settings(), store.clone(), None, commands, &mut out)
        .await
        .unwrap();

    assert_eq!(reason, CloseReason::Cancelled);

    let events = events(&out);
    let notices: Vec<&serde_json::Value> =
        events.iter().filter(|e| e["event"] == "notice").collect();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["level"], "transient");

    let last = last_options(&events);
    assert_eq!(last["phase"], "loaded");
    assert_eq!(option_ids(last), vec!["v1", "v2", "v3", "v4", "more"]);

    let pages: Vec<u32> = store.queries().iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_editor_blocks_submit() {
    let store = Arc::new(FixtureStore::new(load_catalog()));
    let commands = script(&["invalid", "submit", "valid", "submit"]);
    let mut out = Vec::new();

    let reason = run_session(context(), &settings(), store.clone(), None, commands, &mut out)
        .await
        .unwrap();

    assert_eq!(reason, CloseReason::Upgraded);
    assert_eq!(store.upgrades().len(), 1);
    assert_eq!(store.upgrades()[0].app_version_id, VersionId::from("v1"));
}

#[tokio::test(start_paused = true)]
async fn test_hangup_without_commands_closes_cancelled() {
    let store = Arc::new(FixtureStore::new(load_catalog()));
    let (tx, rx) = mpsc::channel(1);
    drop(tx);
    let mut out = Vec::new();

    let reason = run_session(context(), &settings(), store, None, rx, &mut out)
        .await
        .unwrap();

    assert_eq!(reason, CloseReason::Cancelled);
    let events = events(&out);
    assert_eq!(events.last().unwrap()["event"], "closed");
}

use super::{DashboardStore, RefreshMachine, RefreshMode};

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tokio::sync::Semaphore;

use crate::client::fake::{wait_until, FakeDashboardApi};
use crate::models::DashboardSnapshot;

#[test]
fn test_machine_follows_uninitialized_loading_ready() {
    let mut machine = RefreshMachine::new();

    assert_eq!(*machine.snapshot(), DashboardSnapshot::Uninitialized);

    let sequence = machine.begin(RefreshMode::Coalesce);

    assert_eq!(sequence, Some(1));
    assert!(machine.snapshot().is_loading());

    let settled = machine.settle(1, Ok::<_, String>(Vec::new())).cloned();

    assert_eq!(settled, Some(DashboardSnapshot::ready(Vec::new())));
    assert_eq!(machine.in_flight(), None);
}

#[test]
fn test_machine_coalesces_refresh_while_loading() {
    let mut machine = RefreshMachine::new();

    assert_eq!(machine.begin(RefreshMode::Coalesce), Some(1));
    assert_eq!(machine.begin(RefreshMode::Coalesce), None);
    assert_eq!(machine.in_flight(), Some(1));
}

#[test]
fn test_machine_discards_responses_from_superseded_fetches() {
    let mut machine = RefreshMachine::new();

    let first = machine.begin(RefreshMode::Coalesce);
    let second = machine.begin(RefreshMode::Supersede);

    assert_eq!((first, second), (Some(1), Some(2)));
    assert!(machine.settle(1, Ok::<_, String>(Vec::new())).is_none());
    assert!(machine.snapshot().is_loading());

    let rows = serde_json::from_value(json!([{ "Date": "2024-05-01", "Description": "NEWEST" }])).unwrap_or_default();
    let settled = machine.settle(2, Ok::<_, String>(rows)).cloned();

    assert_eq!(settled.as_ref().and_then(|snapshot| snapshot.rows()).map(|rows| rows.len()), Some(1));
}

#[test]
fn test_machine_error_clears_previous_rows() {
    let mut machine = RefreshMachine::new();
    let rows = serde_json::from_value(json!([{ "Date": "2024-05-01" }])).unwrap_or_default();

    machine.begin(RefreshMode::Coalesce);
    machine.settle(1, Ok::<_, String>(rows));
    machine.begin(RefreshMode::Coalesce);
    machine.settle(2, Err("expected value at line 1 column 1"));

    assert_eq!(machine.snapshot().rows(), None);
    assert_eq!(
        machine.snapshot().error(),
        Some("Failed to fetch data: expected value at line 1 column 1. Please try again.")
    );
}

#[test]
fn test_machine_ignores_settlement_when_nothing_is_in_flight() {
    let mut machine = RefreshMachine::new();

    assert!(machine.settle(7, Ok::<_, String>(Vec::new())).is_none());
    assert_eq!(*machine.snapshot(), DashboardSnapshot::Uninitialized);
}

#[tokio::test]
async fn test_store_refreshes_once_at_startup_with_empty_dataset() -> Result<()> {
    let api = Arc::new(FakeDashboardApi::new());
    let store = DashboardStore::spawn(api.clone());
    let handle = store.handle();

    let snapshot = handle.settled().await;

    assert_eq!(snapshot, DashboardSnapshot::ready(Vec::new()));
    assert_eq!(handle.current(), snapshot);
    assert_eq!(api.fetch_calls(), 1);

    store.shutdown().await?;

    Ok(())
}

#[tokio::test]
async fn test_store_publishes_loading_before_ready_to_subscribers() -> Result<()> {
    let gate = Arc::new(Semaphore::new(0));
    let api = Arc::new(FakeDashboardApi::new().gated(gate.clone()));
    let store = DashboardStore::spawn(api.clone());
    let handle = store.handle();
    let mut subscriber = handle.subscribe();

    subscriber.wait_for(DashboardSnapshot::is_loading).await?;
    gate.add_permits(1);
    subscriber.wait_for(DashboardSnapshot::is_settled).await?;

    assert_eq!(handle.current(), DashboardSnapshot::ready(Vec::new()));

    store.shutdown().await?;

    Ok(())
}

#[tokio::test]
async fn test_refresh_while_loading_is_coalesced_into_one_fetch() -> Result<()> {
    let gate = Arc::new(Semaphore::new(0));
    let api = Arc::new(
        FakeDashboardApi::new()
            .gated(gate.clone())
            .respond_with(json!([{ "Date": "2024-01-01", "Description": "ONLY FETCH" }]))
    );
    let store = DashboardStore::spawn(api.clone());
    let handle = store.handle();

    wait_until(|| api.fetch_calls() == 1).await?;

    let (first, second, _) = tokio::join!(handle.refresh(), handle.refresh(), async {
        gate.add_permits(1);
    });

    assert_eq!(api.fetch_calls(), 1);
    assert_eq!(first, second);
    assert_eq!(first.rows().map(|rows| rows.len()), Some(1));

    store.shutdown().await?;

    Ok(())
}

#[tokio::test]
async fn test_reload_supersedes_in_flight_fetch() -> Result<()> {
    let gate = Arc::new(Semaphore::new(0));
    let api = Arc::new(
        FakeDashboardApi::new()
            .gated(gate.clone())
            .respond_with(json!([{ "Date": "2024-01-01", "Description": "AFTER UPLOAD" }]))
    );
    let store = DashboardStore::spawn(api.clone());
    let handle = store.handle();

    wait_until(|| api.fetch_calls() == 1).await?;

    let (snapshot, _) = tokio::join!(handle.reload(), async {
        wait_until(|| api.fetch_calls() == 2).await.ok();
        gate.add_permits(1);
    });

    assert_eq!(api.fetch_calls(), 2);
    assert_eq!(snapshot.rows().and_then(|rows| rows.first()).and_then(|row| row.description()).as_deref(), Some("AFTER UPLOAD"));
    assert_eq!(handle.current(), snapshot);

    store.shutdown().await?;

    Ok(())
}

#[tokio::test]
async fn test_malformed_payload_replaces_ready_data_with_error() -> Result<()> {
    let api = Arc::new(
        FakeDashboardApi::new()
            .respond_with(json!([{ "Date": "2024-01-01", "Description": "FIRST" }]))
            .respond_malformed("invalid type: map, expected a sequence")
    );
    let store = DashboardStore::spawn(api.clone());
    let handle = store.handle();

    let first = handle.settled().await;

    assert_eq!(first.rows().map(|rows| rows.len()), Some(1));

    let second = handle.refresh().await;

    assert_eq!(second.rows(), None);
    assert!(second.error().is_some_and(|message| message.contains("malformed payload")));
    assert_eq!(handle.current(), second);

    let third = handle.refresh().await;

    assert_eq!(third, DashboardSnapshot::ready(Vec::new()));
    assert_eq!(api.fetch_calls(), 3);

    store.shutdown().await?;

    Ok(())
}

#[tokio::test]
async fn test_refresh_after_shutdown_returns_last_snapshot() -> Result<()> {
    let api = Arc::new(FakeDashboardApi::new());
    let store = DashboardStore::spawn(api.clone());
    let handle = store.handle();

    handle.settled().await;
    store.shutdown().await?;

    assert_eq!(handle.refresh().await, DashboardSnapshot::ready(Vec::new()));
    assert_eq!(api.fetch_calls(), 1);

    Ok(())
}

#[tokio::test]
async fn test_coalesced_refresh_receives_snapshot_of_superseding_reload() -> Result<()> {
    let gate = Arc::new(Semaphore::new(0));
    let api = Arc::new(
        FakeDashboardApi::new()
            .gated(gate.clone())
            .respond_with(json!([{ "Date": "2024-03-01", "Description": "NEWEST" }]))
    );
    let store = DashboardStore::spawn(api.clone());
    let handle = store.handle();

    wait_until(|| api.fetch_calls() == 1).await?;

    // The refresh joins the startup fetch, then the reload abandons that fetch.
    let (joined, reloaded, _) = tokio::join!(handle.refresh(), handle.reload(), async {
        wait_until(|| api.fetch_calls() == 2).await.ok();
        gate.add_permits(1);
    });

    assert_eq!(api.fetch_calls(), 2);
    assert_eq!(joined, reloaded);
    assert_eq!(joined.rows().and_then(|rows| rows.first()).and_then(|row| row.description()).as_deref(), Some("NEWEST"));
    assert_eq!(handle.current(), reloaded);

    store.shutdown().await?;

    Ok(())
}

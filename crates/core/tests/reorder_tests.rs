//! Integration tests for reordering computed summaries and persisting the
//! committed order through a [`ConfigStore`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use report_counts_core::reorder::{ReorderOutcome, SpawnedPersist};
use report_counts_core::service::SummaryService;
use report_counts_core::store::memory::InMemoryStore;
use report_counts_core::store::ConfigStore;
use report_counts_core::{ReorderController, SummaryConfig};

fn store() -> Arc<InMemoryStore> {
    let summaries: Vec<serde_json::Value> = ["one-id", "two-id", "three-id"]
        .iter()
        .enumerate()
        .map(|(i, id)| {
            json!({
                "id": id,
                "title": format!("Count {}", i + 1),
                "reportId": (i as i64 + 1) * 11,
                "strategy": "Total count"
            })
        })
        .collect();
    let snapshot = json!({ "summaries": summaries });
    Arc::new(InMemoryStore::from_json(&snapshot.to_string()).expect("valid snapshot"))
}

async fn stored_ids(store: &InMemoryStore) -> Vec<String> {
    store
        .summaries()
        .await
        .iter()
        .map(|c| c.id().to_string())
        .collect()
}

/// Wait until the spawned persistence task has reached the store.
async fn wait_for_persist(store: &InMemoryStore, calls: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while store.persist_calls() < calls {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("persistence task should run");
}

// ---------------------------------------------------------------------------
// Test: committing through SpawnedPersist
// ---------------------------------------------------------------------------

/// A drop that changes the order hands the full new order to the config store.
#[tokio::test]
async fn committed_order_reaches_config_store() {
    let store = store();
    let service = SummaryService::with_store(Arc::clone(&store));
    let summaries = service.load_summaries().await.unwrap();

    let mut controller = ReorderController::new(summaries, SpawnedPersist::new(service.config_store()));
    controller.start_reorder("one-id").unwrap();
    controller.swap_with("three-id").unwrap();
    assert_eq!(controller.end_reorder().unwrap(), ReorderOutcome::Persisted);
    assert!(controller.state().is_empty());

    wait_for_persist(&store, 1).await;
    assert_eq!(stored_ids(&store).await, vec!["two-id", "three-id", "one-id"]);
}

/// Ending a drag without moving anything never touches the store.
#[tokio::test]
async fn unchanged_order_is_not_persisted() {
    let store = store();
    let configs = store.load_order().await.unwrap();

    let mut controller = ReorderController::new(configs, SpawnedPersist::new(Arc::clone(&store)));
    controller.start_reorder("two-id").unwrap();
    assert_eq!(controller.end_reorder().unwrap(), ReorderOutcome::Unchanged);

    tokio::task::yield_now().await;
    assert_eq!(store.persist_calls(), 0);
}

/// A store failure is logged only; the session is already cleared and the
/// working list keeps its new order.
#[tokio::test]
async fn failed_persist_still_clears_session() {
    let store = store();
    let configs = store.load_order().await.unwrap();
    store.set_unavailable(true);

    let mut controller = ReorderController::new(configs, SpawnedPersist::new(Arc::clone(&store)));
    controller.start_reorder("three-id").unwrap();
    controller.swap_with("one-id").unwrap();
    assert_eq!(controller.end_reorder().unwrap(), ReorderOutcome::Persisted);
    assert!(controller.state().is_empty());

    wait_for_persist(&store, 1).await;
    store.set_unavailable(false);
    assert_eq!(stored_ids(&store).await, vec!["one-id", "two-id", "three-id"]);

    // The working list keeps the optimistic order; a new session can start.
    let ids: Vec<&str> = controller.items().iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec!["three-id", "one-id", "two-id"]);
    controller.start_reorder("one-id").unwrap();
}

// ---------------------------------------------------------------------------
// Test: no async runtime
// ---------------------------------------------------------------------------

/// Committing outside a tokio runtime logs the lost order instead of panicking.
#[test]
fn missing_runtime_does_not_panic() {
    let store = store();
    let mut controller =
        ReorderController::new(Vec::<SummaryConfig>::new(), SpawnedPersist::new(Arc::clone(&store)));
    assert!(controller.start_reorder("one-id").is_err());

    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let configs = runtime.block_on(store.load_order()).unwrap();
    controller.replace_items(configs).unwrap();

    controller.start_reorder("one-id").unwrap();
    controller.swap_with("two-id").unwrap();
    assert_eq!(controller.end_reorder().unwrap(), ReorderOutcome::Persisted);
    assert_eq!(store.persist_calls(), 0);
}

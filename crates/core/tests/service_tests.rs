//! Integration tests for [`SummaryService`] over the in-memory stores.
//!
//! Covers the full load → compute flow, drift in the external data (deleted
//! reports, removed fields), and summary edits.

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;

use report_counts_core::error::CoreError;
use report_counts_core::service::SummaryService;
use report_counts_core::store::memory::{InMemoryStore, SnapshotReport};
use report_counts_core::summary_config::{FIELD_BUCKET_BY, FIELD_TITLE};
use report_counts_core::{BucketLabel, Strategy, SummaryDraft, SummaryStatus};

const X: &str = "Patient follow-up";
const Y: &str = "Patient withdrew consent";
const Z: &str = "Perceived drug side effects";

fn store() -> Arc<InMemoryStore> {
    let disposition_rows: Vec<serde_json::Value> = [X, Y, X, X, Y, Z]
        .iter()
        .enumerate()
        .map(|(i, v)| json!({ "record_id": i.to_string(), "dsp_stop_reason": v }))
        .collect();
    let snapshot = json!({
        "summaries": [
            { "id": "enrolled", "title": "Enrolled", "reportId": 2, "strategy": "Total count" },
            {
                "id": "stopped",
                "title": "Stopped",
                "reportId": 1,
                "strategy": "Itemized count",
                "bucketBy": "dsp_stop_reason"
            },
            {
                "id": "deleted",
                "title": "Old report",
                "reportId": 404,
                "strategy": "Total count"
            }
        ],
        "reports": [
            {
                "reportId": 1,
                "title": "Disposition",
                "rows": disposition_rows
            },
            {
                "reportId": 2,
                "title": "Enrollment",
                "rows": [{ "record_id": "1" }, { "record_id": "2" }]
            }
        ],
        "dictionary": [
            {
                "form_name": "disposition",
                "field_name": "dsp_stop_reason",
                "field_label": "Reason for stopping",
                "field_type": "radio"
            },
            {
                "form_name": "enrollment",
                "field_name": "study_id",
                "field_label": "Study ID",
                "field_type": "text"
            }
        ]
    });
    Arc::new(InMemoryStore::from_json(&snapshot.to_string()).expect("valid snapshot"))
}

// ---------------------------------------------------------------------------
// Test: loading
// ---------------------------------------------------------------------------

/// Loading computes every stored summary, in stored order, with counts and
/// buckets.
#[tokio::test]
async fn load_computes_every_summary_in_order() {
    let service = SummaryService::with_store(store());
    let results = service.load_summaries().await.expect("load should succeed");

    let ids: Vec<&str> = results.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["enrolled", "stopped", "deleted"]);

    assert_eq!(results[0].total_records(), Some(2));
    assert_eq!(results[0].status(), SummaryStatus::Ready);

    let stopped = &results[1];
    assert_eq!(stopped.total_records(), Some(6));
    assert_eq!(stopped.bucket_by_label(), Some("Reason for stopping"));
    let data: Vec<(BucketLabel, usize)> = stopped
        .data()
        .expect("itemized data")
        .iter()
        .map(|b| (b.label.clone(), b.count))
        .collect();
    assert_eq!(
        data,
        vec![
            (BucketLabel::Text(X.to_string()), 3),
            (BucketLabel::Text(Y.to_string()), 2),
            (BucketLabel::Text(Z.to_string()), 1),
        ]
    );

    assert_eq!(results[2].status(), SummaryStatus::ReportMissing);
}

/// A report deleted after the summary was configured yields `reportExists =
/// false`.
#[tokio::test]
async fn report_deleted_after_configuration_is_reported_missing() {
    let store = store();
    assert!(store.remove_report(1).await);
    let service = SummaryService::with_store(store);

    let results = service.load_summaries().await.unwrap();
    assert!(!results[1].report_exists());
    assert_eq!(results[1].data(), None);
}

/// A `bucketBy` field dropped from the dictionary yields the field-missing
/// status.
#[tokio::test]
async fn removed_field_is_reported_missing() {
    let store = store();
    store.set_dictionary(vec![]).await;
    let service = SummaryService::with_store(store);

    let results = service.load_summaries().await.unwrap();
    assert_eq!(results[1].status(), SummaryStatus::FieldMissing);
    assert_eq!(results[1].total_records(), Some(6));
}

/// An unreachable config store surfaces as `CoreError::Store`.
#[tokio::test]
async fn unavailable_store_fails_load() {
    let store = store();
    store.set_unavailable(true);
    let service = SummaryService::with_store(store);

    assert_matches!(service.load_summaries().await, Err(CoreError::Store(_)));
}

/// Every load builds new result values rather than patching earlier ones.
#[tokio::test]
async fn each_load_returns_fresh_results() {
    let service = SummaryService::with_store(store());
    let first = service.load_summaries().await.unwrap();
    let second = service.load_summaries().await.unwrap();
    assert_eq!(first, second);
    assert_ne!(first.as_ptr(), second.as_ptr());
}

// ---------------------------------------------------------------------------
// Test: editing
// ---------------------------------------------------------------------------

/// Saving a draft without an id appends it and returns its computed result.
#[tokio::test]
async fn save_appends_new_summary_and_computes_it() {
    let store = store();
    store
        .insert_report(SnapshotReport {
            report_id: 3,
            title: "Screened".to_string(),
            rows: vec![],
        })
        .await;
    let service = SummaryService::with_store(Arc::clone(&store));

    let result = service
        .save_summary(SummaryDraft::new("Screened", 3, Strategy::Total))
        .await
        .expect("save should succeed");

    assert_eq!(result.total_records(), Some(0));
    let stored = store.summaries().await;
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[3].id(), result.id());
}

/// Saving a draft with a known id replaces that summary at its position.
#[tokio::test]
async fn save_updates_existing_summary_in_place() {
    let store = store();
    let service = SummaryService::with_store(Arc::clone(&store));

    service
        .save_summary(SummaryDraft::new("Enrolled (all)", 2, Strategy::Total).with_id("enrolled"))
        .await
        .unwrap();

    let stored = store.summaries().await;
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].id(), "enrolled");
    assert_eq!(stored[0].title(), "Enrolled (all)");
}

/// An invalid draft reports every offending field and persists nothing.
#[tokio::test]
async fn save_rejects_invalid_draft_with_every_field() {
    let store = store();
    let service = SummaryService::with_store(Arc::clone(&store));

    let draft = SummaryDraft::new(" ", 1, Strategy::Itemized);
    let err = service.save_summary(draft).await.unwrap_err();

    assert_matches!(err, CoreError::InvalidSummary(ref errors) => {
        assert!(errors.has_field(FIELD_TITLE));
        assert!(errors.has_field(FIELD_BUCKET_BY));
    });
    assert_eq!(store.persist_calls(), 0);
}

/// Deleting a summary removes it and keeps the others in order.
#[tokio::test]
async fn delete_removes_summary() {
    let store = store();
    let service = SummaryService::with_store(Arc::clone(&store));

    service.delete_summary("stopped").await.unwrap();
    let ids: Vec<String> = store
        .summaries()
        .await
        .iter()
        .map(|c| c.id().to_string())
        .collect();
    assert_eq!(ids, vec!["enrolled", "deleted"]);
}

/// Deleting an unknown id is `NotFound`.
#[tokio::test]
async fn delete_unknown_summary_is_not_found() {
    let service = SummaryService::with_store(store());
    assert_matches!(
        service.delete_summary("nope").await,
        Err(CoreError::NotFound { entity: "summary", .. })
    );
}

/// The summary form's report and field choices come from the stores.
#[tokio::test]
async fn form_choices_come_from_stores() {
    let service = SummaryService::with_store(store());

    let reports: Vec<String> = service
        .available_reports()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(reports, vec!["Disposition", "Enrollment"]);

    let fields = service.bucketable_fields().await.unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field_name, "dsp_stop_reason");
}

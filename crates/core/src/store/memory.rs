//! In-memory implementation of every collaborator store.
//!
//! Backs the command-line tool (loaded from a JSON project snapshot) and the
//! tests. Can be switched into an "unavailable" mode to exercise failure
//! paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use super::{ConfigStore, DictionaryStore, ReportRef, ReportStore, StoreError};
use crate::dictionary::{DataDictionary, DictionaryEntry};
use crate::summary_config::SummaryConfig;
use crate::types::{Record, ReportId};

/// One report in a project snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotReport {
    pub report_id: ReportId,
    pub title: String,
    #[serde(default)]
    pub rows: Vec<Record>,
}

/// Everything the stores hold, in one serializable document.
///
/// Stored summaries that fail validation are skipped with a warning; the
/// rest of the snapshot still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSnapshot {
    #[serde(deserialize_with = "deserialize_valid_summaries")]
    pub summaries: Vec<SummaryConfig>,
    pub reports: Vec<SnapshotReport>,
    pub dictionary: Vec<DictionaryEntry>,
}

fn deserialize_valid_summaries<'de, D>(deserializer: D) -> Result<Vec<SummaryConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    let summaries = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<SummaryConfig>(value) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping invalid stored summary");
                None
            }
        })
        .collect();
    Ok(summaries)
}

#[derive(Debug, Default)]
struct State {
    summaries: Vec<SummaryConfig>,
    reports: BTreeMap<ReportId, SnapshotReport>,
    dictionary: Vec<DictionaryEntry>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    unavailable: AtomicBool,
    persist_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: ProjectSnapshot) -> Self {
        let reports = snapshot
            .reports
            .into_iter()
            .map(|r| (r.report_id, r))
            .collect();
        Self {
            state: RwLock::new(State {
                summaries: snapshot.summaries,
                reports,
                dictionary: snapshot.dictionary,
            }),
            ..Self::default()
        }
    }

    /// Parse a JSON project snapshot.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let snapshot: ProjectSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub async fn insert_report(&self, report: SnapshotReport) {
        self.state.write().await.reports.insert(report.report_id, report);
    }

    pub async fn remove_report(&self, report_id: ReportId) -> bool {
        self.state.write().await.reports.remove(&report_id).is_some()
    }

    pub async fn set_dictionary(&self, entries: Vec<DictionaryEntry>) {
        self.state.write().await.dictionary = entries;
    }

    /// Currently stored summary order.
    pub async fn summaries(&self) -> Vec<SummaryConfig> {
        self.state.read().await.summaries.clone()
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of completed `persist_order` calls, successful or not.
    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn fetch_report(&self, report_id: ReportId) -> Result<Option<Vec<Record>>, StoreError> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state.reports.get(&report_id).map(|r| r.rows.clone()))
    }

    async fn list_reports(&self) -> Result<Vec<ReportRef>, StoreError> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut reports: Vec<ReportRef> = state
            .reports
            .values()
            .map(|r| ReportRef {
                report_id: r.report_id,
                title: r.title.clone(),
            })
            .collect();
        reports.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(reports)
    }
}

#[async_trait]
impl DictionaryStore for InMemoryStore {
    async fn load_dictionary(&self) -> Result<DataDictionary, StoreError> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(DataDictionary::from_entries(state.dictionary.iter().cloned()))
    }
}

#[async_trait]
impl ConfigStore for InMemoryStore {
    async fn load_order(&self) -> Result<Vec<SummaryConfig>, StoreError> {
        self.check_available()?;
        Ok(self.state.read().await.summaries.clone())
    }

    async fn persist_order(&self, order: Vec<SummaryConfig>) -> Result<(), StoreError> {
        let result = self.check_available();
        if result.is_ok() {
            self.state.write().await.summaries = order;
        }
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        result
    }
}

//! Orchestration of the collaborator stores around the aggregation core.
//!
//! Each operation is an explicit method; there is no dispatch on free-form
//! action names.

use std::sync::Arc;

use crate::aggregator::{compute_summary, SummaryResult};
use crate::dictionary::{BucketableField, DataDictionary};
use crate::error::CoreError;
use crate::store::{ConfigStore, DictionaryStore, ReportRef, ReportStore};
use crate::summary_config::{SummaryConfig, SummaryDraft};
use crate::types::SummaryId;

/// Loads, computes, and edits summaries through the configured stores.
#[derive(Clone)]
pub struct SummaryService {
    reports: Arc<dyn ReportStore>,
    dictionary: Arc<dyn DictionaryStore>,
    configs: Arc<dyn ConfigStore>,
}

impl SummaryService {
    pub fn new(
        reports: Arc<dyn ReportStore>,
        dictionary: Arc<dyn DictionaryStore>,
        configs: Arc<dyn ConfigStore>,
    ) -> Self {
        Self {
            reports,
            dictionary,
            configs,
        }
    }

    /// Build a service whose three stores are the same object.
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: ReportStore + DictionaryStore + ConfigStore + 'static,
    {
        Self {
            reports: store.clone(),
            dictionary: store.clone(),
            configs: store,
        }
    }

    pub fn config_store(&self) -> Arc<dyn ConfigStore> {
        Arc::clone(&self.configs)
    }

    /// Compute every configured summary, in stored order.
    pub async fn load_summaries(&self) -> Result<Vec<SummaryResult>, CoreError> {
        let configs = self.configs.load_order().await?;
        let dictionary = self.dictionary.load_dictionary().await?;

        let mut results = Vec::with_capacity(configs.len());
        for config in &configs {
            results.push(self.compute(config, &dictionary).await);
        }
        tracing::debug!(count = results.len(), "Computed summaries");
        Ok(results)
    }

    /// Validate and store a summary (insert or update by id), then compute it.
    pub async fn save_summary(&self, draft: SummaryDraft) -> Result<SummaryResult, CoreError> {
        let config = draft.into_config().map_err(CoreError::InvalidSummary)?;

        let mut order = self.configs.load_order().await?;
        match order.iter().position(|c| c.id() == config.id()) {
            Some(index) => order[index] = config.clone(),
            None => order.push(config.clone()),
        }
        self.configs.persist_order(order).await?;
        tracing::info!(summary_id = %config.id(), title = %config.title(), "Saved summary");

        let dictionary = self.dictionary.load_dictionary().await?;
        Ok(self.compute(&config, &dictionary).await)
    }

    /// Remove a summary from the stored order.
    pub async fn delete_summary(&self, id: &str) -> Result<(), CoreError> {
        let mut order = self.configs.load_order().await?;
        let before = order.len();
        order.retain(|c| c.id() != id);
        if order.len() == before {
            return Err(CoreError::NotFound {
                entity: "summary",
                id: SummaryId::from(id),
            });
        }
        self.configs.persist_order(order).await?;
        tracing::info!(summary_id = %id, "Deleted summary");
        Ok(())
    }

    /// Store an order committed by the reorder controller.
    pub async fn persist_order(&self, order: Vec<SummaryConfig>) -> Result<(), CoreError> {
        self.configs.persist_order(order).await?;
        Ok(())
    }

    /// Reports available as summary sources.
    pub async fn available_reports(&self) -> Result<Vec<ReportRef>, CoreError> {
        Ok(self.reports.list_reports().await?)
    }

    /// Fields available for itemized counts.
    pub async fn bucketable_fields(&self) -> Result<Vec<BucketableField>, CoreError> {
        let dictionary = self.dictionary.load_dictionary().await?;
        Ok(dictionary.bucketable_fields().to_vec())
    }

    /// Fetch errors are logged and yield a report-missing result.
    async fn compute(&self, config: &SummaryConfig, dictionary: &DataDictionary) -> SummaryResult {
        let report = match self.reports.fetch_report(config.report_id()).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(
                    summary_id = %config.id(),
                    report_id = config.report_id(),
                    error = %e,
                    "Failed to fetch report; treating as inaccessible",
                );
                None
            }
        };
        compute_summary(config, report.as_deref(), dictionary)
    }
}

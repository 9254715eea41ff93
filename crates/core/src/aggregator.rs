//! Summary aggregation: one config + one raw report + field metadata in, one
//! displayable [`SummaryResult`] out.
//!
//! Missing reports and missing fields are ordinary outcomes of data drift
//! (deleted reports, renamed fields) and are carried in the result shape,
//! never raised as errors.

use serde::Serialize;

use crate::dictionary::FieldLookup;
use crate::grouping::{group_and_count, Bucket};
use crate::strategy::Strategy;
use crate::summary_config::SummaryConfig;
use crate::types::Record;

// ---------------------------------------------------------------------------
// SummaryResult
// ---------------------------------------------------------------------------

/// Computed summary, ready for display. Never persisted and never patched in
/// place; a refresh produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    #[serde(flatten)]
    config: SummaryConfig,
    report_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket_by_field_exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket_by_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Vec<Bucket>>,
}

/// Which of the distinct renderings a result calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStatus {
    /// The referenced report is deleted or inaccessible.
    ReportMissing,
    /// Itemized summary whose `bucketBy` field no longer exists.
    FieldMissing,
    /// Counts are available.
    Ready,
}

impl SummaryResult {
    /// Result for a summary whose report could not be resolved.
    pub fn report_missing(config: SummaryConfig) -> Self {
        Self {
            config,
            report_exists: false,
            total_records: None,
            bucket_by_field_exists: None,
            bucket_by_label: None,
            data: None,
        }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    pub fn into_config(self) -> SummaryConfig {
        self.config
    }

    pub fn id(&self) -> &str {
        self.config.id()
    }

    pub fn report_exists(&self) -> bool {
        self.report_exists
    }

    pub fn total_records(&self) -> Option<usize> {
        self.total_records
    }

    pub fn bucket_by_field_exists(&self) -> Option<bool> {
        self.bucket_by_field_exists
    }

    pub fn bucket_by_label(&self) -> Option<&str> {
        self.bucket_by_label.as_deref()
    }

    pub fn data(&self) -> Option<&[Bucket]> {
        self.data.as_deref()
    }

    pub fn status(&self) -> SummaryStatus {
        if !self.report_exists {
            SummaryStatus::ReportMissing
        } else if self.bucket_by_field_exists == Some(false) {
            SummaryStatus::FieldMissing
        } else {
            SummaryStatus::Ready
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute the displayable result of one summary.
///
/// `raw_report` is `None` when the report no longer exists or is not
/// accessible; in that case `fields` is never consulted.
pub fn compute_summary<F>(
    config: &SummaryConfig,
    raw_report: Option<&[Record]>,
    fields: &F,
) -> SummaryResult
where
    F: FieldLookup + ?Sized,
{
    let Some(records) = raw_report else {
        tracing::debug!(summary_id = %config.id(), report_id = config.report_id(), "Report missing");
        return SummaryResult::report_missing(config.clone());
    };

    let mut result = SummaryResult {
        config: config.clone(),
        report_exists: true,
        total_records: Some(records.len()),
        bucket_by_field_exists: None,
        bucket_by_label: None,
        data: None,
    };

    match (config.strategy(), config.bucket_by()) {
        (Strategy::Total, _) => {}
        (Strategy::Itemized, Some(field)) if fields.field_exists(field) => {
            result.bucket_by_field_exists = Some(true);
            result.bucket_by_label = Some(fields.field_label(field));
            result.data = Some(group_and_count(
                records.iter().map(|record| record.get(field)),
            ));
        }
        (Strategy::Itemized, field) => {
            tracing::debug!(
                summary_id = %config.id(),
                bucket_by = ?field,
                "Bucket field missing",
            );
            result.bucket_by_field_exists = Some(false);
        }
    }

    result
}

//! Persisted summary definitions and the validating factory that builds them.
//!
//! A [`SummaryConfig`] can only be obtained from a [`SummaryDraft`], whether
//! it comes from a form submission or from the configuration store (the serde
//! `Deserialize` impl routes through the same validation). Validation reports
//! every offending field at once so a form can highlight all of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::strategy::Strategy;
use crate::types::{ReportId, SummaryId};

// ---------------------------------------------------------------------------
// Field names (wire / form names)
// ---------------------------------------------------------------------------

pub const FIELD_TITLE: &str = "title";
pub const FIELD_REPORT_ID: &str = "reportId";
pub const FIELD_STRATEGY: &str = "strategy";
pub const FIELD_BUCKET_BY: &str = "bucketBy";

/// Order in which field errors are reported (form order).
const FIELD_ORDER: &[&str] = &[FIELD_TITLE, FIELD_REPORT_ID, FIELD_STRATEGY, FIELD_BUCKET_BY];

// ---------------------------------------------------------------------------
// Field errors
// ---------------------------------------------------------------------------

/// One validation failure, keyed by the form field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field error found for one draft, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", format_field_errors(.0))]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    /// Returns `true` if any error was reported for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map a Rust field name reported by `validator` to its wire name.
fn wire_field_name(field: &str) -> String {
    match field {
        "report_id" => FIELD_REPORT_ID.to_string(),
        "bucket_by" => FIELD_BUCKET_BY.to_string(),
        other => other.to_string(),
    }
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("A title is required".into());
        return Err(err);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// SummaryDraft
// ---------------------------------------------------------------------------

/// Unvalidated summary input, as submitted by a form or read from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryDraft {
    /// Existing id when editing; a new UUID is generated when absent.
    pub id: Option<SummaryId>,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(required(message = "A report is required"))]
    pub report_id: Option<ReportId>,
    #[validate(required(message = "A strategy is required"))]
    pub strategy: Option<String>,
    pub bucket_by: Option<String>,
}

impl SummaryDraft {
    pub fn new(title: impl Into<String>, report_id: ReportId, strategy: Strategy) -> Self {
        Self {
            id: None,
            title: title.into(),
            report_id: Some(report_id),
            strategy: Some(strategy.as_str().to_string()),
            bucket_by: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<SummaryId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_bucket_by(mut self, field: impl Into<String>) -> Self {
        self.bucket_by = Some(field.into());
        self
    }

    /// Validate the draft and build a [`SummaryConfig`].
    ///
    /// All failures are collected; nothing short-circuits on the first one.
    pub fn into_config(self) -> Result<SummaryConfig, FieldErrors> {
        let mut messages: BTreeMap<String, Vec<String>> = BTreeMap::new();

        if let Err(errors) = self.validate() {
            for (field, field_errors) in errors.field_errors() {
                let name = wire_field_name(&field.to_string());
                for err in field_errors.iter() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {name}"));
                    messages.entry(name.clone()).or_default().push(message);
                }
            }
        }

        let strategy = match self.strategy.as_deref().map(str::parse::<Strategy>) {
            Some(Ok(strategy)) => Some(strategy),
            Some(Err(e)) => {
                messages
                    .entry(FIELD_STRATEGY.to_string())
                    .or_default()
                    .push(e.to_string());
                None
            }
            None => None,
        };

        let bucket_by = self
            .bucket_by
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        if strategy == Some(Strategy::Itemized) && bucket_by.is_none() {
            messages
                .entry(FIELD_BUCKET_BY.to_string())
                .or_default()
                .push("A field to count by is required for itemized counts".to_string());
        }

        let (Some(report_id), Some(strategy)) = (self.report_id, strategy) else {
            return Err(collect_errors(messages));
        };
        if !messages.is_empty() {
            return Err(collect_errors(messages));
        }

        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(SummaryConfig {
            id,
            title: self.title,
            report_id,
            bucket_by: match strategy {
                Strategy::Itemized => bucket_by,
                Strategy::Total => None,
            },
            strategy,
        })
    }
}

fn collect_errors(messages: BTreeMap<String, Vec<String>>) -> FieldErrors {
    let mut errors: Vec<FieldError> = messages
        .into_iter()
        .flat_map(|(field, msgs)| msgs.into_iter().map(move |m| FieldError::new(field.clone(), m)))
        .collect();
    errors.sort_by_key(|e| {
        FIELD_ORDER
            .iter()
            .position(|f| *f == e.field)
            .unwrap_or(FIELD_ORDER.len())
    });
    FieldErrors(errors)
}

impl From<&SummaryConfig> for SummaryDraft {
    fn from(config: &SummaryConfig) -> Self {
        Self {
            id: Some(config.id.clone()),
            title: config.title.clone(),
            report_id: Some(config.report_id),
            strategy: Some(config.strategy.as_str().to_string()),
            bucket_by: config.bucket_by.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// SummaryConfig
// ---------------------------------------------------------------------------

/// A validated, persisted summary definition.
///
/// Invariant: `bucket_by` is `Some` (and non-blank) exactly when the strategy
/// is [`Strategy::Itemized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SummaryDraft")]
pub struct SummaryConfig {
    id: SummaryId,
    title: String,
    report_id: ReportId,
    strategy: Strategy,
    bucket_by: Option<String>,
}

impl TryFrom<SummaryDraft> for SummaryConfig {
    type Error = FieldErrors;

    fn try_from(draft: SummaryDraft) -> Result<Self, Self::Error> {
        draft.into_config()
    }
}

impl SummaryConfig {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn report_id(&self) -> ReportId {
        self.report_id
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn bucket_by(&self) -> Option<&str> {
        self.bucket_by.as_deref()
    }
}

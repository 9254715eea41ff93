//! Collaborator interfaces consumed by the core.
//!
//! Report rows, the data dictionary, and summary configuration all live in an
//! external system. The core only sees these traits; transport and storage
//! format are the implementor's business.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dictionary::DataDictionary;
use crate::summary_config::SummaryConfig;
use crate::types::{Record, ReportId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A report that can be chosen as the source of a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRef {
    pub report_id: ReportId,
    pub title: String,
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Raw rows of a report, or `None` if it no longer exists or is not
    /// accessible. Absence is not an error.
    async fn fetch_report(&self, report_id: ReportId) -> Result<Option<Vec<Record>>, StoreError>;

    /// All reports of the project, ordered by title.
    async fn list_reports(&self) -> Result<Vec<ReportRef>, StoreError>;
}

#[async_trait]
pub trait DictionaryStore: Send + Sync {
    async fn load_dictionary(&self) -> Result<DataDictionary, StoreError>;
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Summary configurations in display order.
    async fn load_order(&self) -> Result<Vec<SummaryConfig>, StoreError>;

    /// Replace the stored list with `order`.
    async fn persist_order(&self, order: Vec<SummaryConfig>) -> Result<(), StoreError>;
}

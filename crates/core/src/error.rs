use crate::store::StoreError;
use crate::summary_config::FieldErrors;
use crate::types::SummaryId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: SummaryId },

    /// Every offending field of a rejected summary, in form order.
    #[error("Invalid summary: {0}")]
    InvalidSummary(FieldErrors),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Contract violations when driving the reorder controller.
///
/// These indicate a bug in the caller (an event delivered in the wrong state,
/// or an id that is not part of the working list), never bad data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("No reorder in progress; `{0}` requires an active drag")]
    NotDragging(&'static str),

    #[error("Cannot replace the working list while a reorder is in progress")]
    DragInProgress,

    #[error("Summary {0} is not in the working list")]
    UnknownSummary(SummaryId),
}

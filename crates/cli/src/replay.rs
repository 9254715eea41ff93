//! Replays a single drag-and-drop session against loaded summaries.

use std::cell::RefCell;

use report_counts_core::error::ReorderError;
use report_counts_core::{ReorderController, ReorderOutcome, SummaryConfig, SummaryResult};

use crate::config::ReorderRequest;

/// Result of replaying a reorder: the working list after the drop, and the
/// order handed to persistence if it changed.
#[derive(Debug)]
pub struct Replayed {
    pub summaries: Vec<SummaryResult>,
    pub committed: Option<Vec<SummaryConfig>>,
}

/// Drag `request.dragged_id` onto `request.target_id` and drop it.
///
/// The committed order is captured rather than persisted so the caller can
/// await the store before printing.
pub fn replay_reorder(
    summaries: Vec<SummaryResult>,
    request: &ReorderRequest,
) -> Result<Replayed, ReorderError> {
    let committed = RefCell::new(None);
    let sink = |order: Vec<SummaryConfig>| {
        *committed.borrow_mut() = Some(order);
    };

    let mut controller = ReorderController::new(summaries, sink);
    controller.start_reorder(&request.dragged_id)?;
    if let Err(err) = controller.swap_with(&request.target_id) {
        controller.cancel_drag()?;
        return Err(err);
    }
    let outcome = controller.end_reorder()?;
    let summaries = controller.into_items();

    tracing::info!(
        dragged_id = %request.dragged_id,
        target_id = %request.target_id,
        ?outcome,
        "Reorder replayed"
    );

    let committed = match outcome {
        ReorderOutcome::Persisted => committed.into_inner(),
        ReorderOutcome::Unchanged => None,
    };
    Ok(Replayed {
        summaries,
        committed,
    })
}

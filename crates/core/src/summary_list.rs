//! Whole-list updates for the displayed summaries.
//!
//! Every function returns a new list and leaves its input untouched, so a
//! consumer comparing list identity always notices a change.

use crate::aggregator::SummaryResult;

pub fn find_summary_index(list: &[SummaryResult], id: &str) -> Option<usize> {
    list.iter().position(|s| s.id() == id)
}

/// Replace the summary with the same id as `updated`, or append it if absent.
pub fn replace_summary(list: &[SummaryResult], updated: SummaryResult) -> Vec<SummaryResult> {
    let mut next = list.to_vec();
    match find_summary_index(&next, updated.id()) {
        Some(index) => next[index] = updated,
        None => next.push(updated),
    }
    next
}

/// Drop the summary with the given id. Unknown ids leave the list as is.
pub fn delete_summary(list: &[SummaryResult], id: &str) -> Vec<SummaryResult> {
    list.iter().filter(|s| s.id() != id).cloned().collect()
}

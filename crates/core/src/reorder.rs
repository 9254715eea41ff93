//! Drag-and-drop reordering of summary cards.
//!
//! The controller owns the working copy of the ordered list and is driven by
//! four transitions (`start_reorder`, `swap_with`, `end_reorder`,
//! `cancel_drag`) plus the `is_being_dragged` query, so any host (pointer
//! events, touch events, a test harness) can drive the same state machine.
//!
//! Swaps mutate the working list optimistically. Persistence is requested
//! only when a drag ends with an id sequence different from the one captured
//! at drag start, and the session state is cleared before the sink is called.

use std::sync::Arc;

use crate::aggregator::SummaryResult;
use crate::error::ReorderError;
use crate::store::ConfigStore;
use crate::summary_config::SummaryConfig;
use crate::types::SummaryId;

// ---------------------------------------------------------------------------
// Items and sinks
// ---------------------------------------------------------------------------

/// An entry of the working list. Only its position is ever changed.
pub trait Reorderable: Clone {
    fn summary_id(&self) -> &str;
    fn summary_config(&self) -> SummaryConfig;
}

impl Reorderable for SummaryConfig {
    fn summary_id(&self) -> &str {
        self.id()
    }

    fn summary_config(&self) -> SummaryConfig {
        self.clone()
    }
}

impl Reorderable for SummaryResult {
    fn summary_id(&self) -> &str {
        self.id()
    }

    fn summary_config(&self) -> SummaryConfig {
        self.config().clone()
    }
}

/// Receives a committed order. Fire-and-forget: the controller neither waits
/// for nor inspects the outcome.
pub trait OrderSink {
    fn persist_order(&self, order: Vec<SummaryConfig>);
}

impl<F> OrderSink for F
where
    F: Fn(Vec<SummaryConfig>),
{
    fn persist_order(&self, order: Vec<SummaryConfig>) {
        self(order)
    }
}

/// Sink that spawns [`ConfigStore::persist_order`] on the current tokio
/// runtime. Failures are logged; retrying is the store's concern.
pub struct SpawnedPersist<C: ?Sized> {
    store: Arc<C>,
}

impl<C: ?Sized> SpawnedPersist<C> {
    pub fn new(store: Arc<C>) -> Self {
        Self { store }
    }
}

impl<C> OrderSink for SpawnedPersist<C>
where
    C: ConfigStore + ?Sized + 'static,
{
    fn persist_order(&self, order: Vec<SummaryConfig>) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!(
                count = order.len(),
                "No async runtime available; summary order not persisted",
            );
            return;
        };
        let store = Arc::clone(&self.store);
        handle.spawn(async move {
            let count = order.len();
            if let Err(e) = ConfigStore::persist_order(store.as_ref(), order).await {
                tracing::error!(error = %e, count, "Failed to persist summary order");
            }
        });
    }
}

// ---------------------------------------------------------------------------
// ReorderState
// ---------------------------------------------------------------------------

/// Coarse state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderPhase {
    Idle,
    Dragging,
}

/// Transient state of one drag session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderState<T> {
    pub dragged_id: Option<SummaryId>,
    pub drop_target_id: Option<SummaryId>,
    pub start_index: Option<usize>,
    pub original_order: Option<Vec<T>>,
}

impl<T> Default for ReorderState<T> {
    fn default() -> Self {
        Self {
            dragged_id: None,
            drop_target_id: None,
            start_index: None,
            original_order: None,
        }
    }
}

impl<T> ReorderState<T> {
    pub fn is_empty(&self) -> bool {
        self.dragged_id.is_none()
            && self.drop_target_id.is_none()
            && self.start_index.is_none()
            && self.original_order.is_none()
    }
}

/// What `end_reorder` decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The order matches the drag-start snapshot; nothing was persisted.
    Unchanged,
    /// The new order was handed to the sink.
    Persisted,
}

// ---------------------------------------------------------------------------
// ReorderController
// ---------------------------------------------------------------------------

pub struct ReorderController<T, S> {
    items: Vec<T>,
    state: ReorderState<T>,
    sink: S,
}

impl<T, S> ReorderController<T, S>
where
    T: Reorderable,
    S: OrderSink,
{
    pub fn new(items: Vec<T>, sink: S) -> Self {
        Self {
            items,
            state: ReorderState::default(),
            sink,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn state(&self) -> &ReorderState<T> {
        &self.state
    }

    pub fn phase(&self) -> ReorderPhase {
        if self.state.dragged_id.is_some() {
            ReorderPhase::Dragging
        } else {
            ReorderPhase::Idle
        }
    }

    /// Swap in a freshly loaded list. Rejected while a drag is in progress.
    pub fn replace_items(&mut self, items: Vec<T>) -> Result<(), ReorderError> {
        if self.phase() == ReorderPhase::Dragging {
            return Err(ReorderError::DragInProgress);
        }
        self.items = items;
        Ok(())
    }

    pub fn find_index(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.summary_id() == id)
    }

    pub fn is_being_dragged(&self, id: &str) -> bool {
        self.state.dragged_id.as_deref() == Some(id)
    }

    /// Begin dragging `id`. The visible order is left untouched.
    ///
    /// A second start while a session is active is ignored and the first
    /// session is kept.
    pub fn start_reorder(&mut self, id: &str) -> Result<(), ReorderError> {
        if let Some(active) = &self.state.dragged_id {
            tracing::warn!(active = %active, requested = %id, "Reorder already in progress; ignoring start");
            return Ok(());
        }
        let index = self
            .find_index(id)
            .ok_or_else(|| ReorderError::UnknownSummary(id.to_string()))?;

        self.state = ReorderState {
            dragged_id: Some(id.to_string()),
            drop_target_id: None,
            start_index: Some(index),
            original_order: Some(self.items.clone()),
        };
        tracing::debug!(summary_id = %id, start_index = index, "Reorder started");
        Ok(())
    }

    /// Move the dragged item to the position `target_id` currently occupies.
    ///
    /// Items between the old and new position shift by one. Positions are
    /// always taken from the current (already shifted) list.
    pub fn swap_with(&mut self, target_id: &str) -> Result<(), ReorderError> {
        let dragged_id = self
            .state
            .dragged_id
            .clone()
            .ok_or(ReorderError::NotDragging("swap_with"))?;
        let target_index = self
            .find_index(target_id)
            .ok_or_else(|| ReorderError::UnknownSummary(target_id.to_string()))?;

        self.state.drop_target_id = Some(target_id.to_string());
        if dragged_id == target_id {
            return Ok(());
        }

        let from = self
            .find_index(&dragged_id)
            .ok_or(ReorderError::UnknownSummary(dragged_id))?;
        let item = self.items.remove(from);
        self.items.insert(target_index, item);
        Ok(())
    }

    /// Clear the highlighted drop target (the pointer left it).
    pub fn clear_drop_target(&mut self) {
        self.state.drop_target_id = None;
    }

    /// Finish the drag. Persists only if the order differs from the snapshot.
    pub fn end_reorder(&mut self) -> Result<ReorderOutcome, ReorderError> {
        if self.phase() == ReorderPhase::Idle {
            return Err(ReorderError::NotDragging("end_reorder"));
        }
        let state = std::mem::take(&mut self.state);
        let original = state.original_order.unwrap_or_default();

        let unchanged = original.len() == self.items.len()
            && original
                .iter()
                .zip(&self.items)
                .all(|(a, b)| a.summary_id() == b.summary_id());
        if unchanged {
            tracing::debug!("Reorder ended without changes");
            return Ok(ReorderOutcome::Unchanged);
        }

        let order: Vec<SummaryConfig> = self.items.iter().map(Reorderable::summary_config).collect();
        tracing::info!(
            dragged = ?state.dragged_id,
            from = ?state.start_index,
            to = ?state.dragged_id.as_deref().and_then(|id| self.find_index(id)),
            "Persisting new summary order",
        );
        self.sink.persist_order(order);
        Ok(ReorderOutcome::Persisted)
    }

    /// Abandon the drag (no effective drop) and restore the snapshot.
    pub fn cancel_drag(&mut self) -> Result<(), ReorderError> {
        if self.phase() == ReorderPhase::Idle {
            return Err(ReorderError::NotDragging("cancel_drag"));
        }
        let state = std::mem::take(&mut self.state);
        if let Some(original) = state.original_order {
            self.items = original;
        }
        tracing::debug!(dragged = ?state.dragged_id, "Reorder cancelled");
        Ok(())
    }
}

//! Ordering
//!
//! Pure ordering logic, no I/O:
//! - reconcile: initial order from server index / cached order / fetch order
//! - moves: drag-and-drop within a filtered view
//! - reindex: dense 1-based positions for the backend
//! - filter: owner scope and visible subset

mod filter;
mod moves;
mod reconcile;
mod reindex;

use std::collections::HashSet;

use crate::domain::{ForwardId, ForwardRecord, OrderUpdate};

pub use filter::ViewFilter;
pub use moves::{apply_move, array_move};
pub use reconcile::{fetch_order, has_server_order, initialize, merge_cached, server_order, OrderSource, TieBreak};
pub use reindex::{apply_reindex, dense_reindex};

/// True if `order` holds every id of `records` exactly once and nothing else
pub fn is_permutation_of(order: &[ForwardId], records: &[ForwardRecord]) -> bool {
    let expected: HashSet<ForwardId> = records.iter().map(|r| r.id).collect();
    let mut seen = HashSet::with_capacity(order.len());
    order.len() == expected.len() && order.iter().all(|id| expected.contains(id) && seen.insert(*id))
}

/// Canonical order of the current scope
#[derive(Debug, Clone)]
pub struct OrderReconciler {
    canonical: Vec<ForwardId>,
    source: OrderSource,
    tie_break: TieBreak,
}

impl Default for OrderReconciler {
    fn default() -> Self {
        Self::new(TieBreak::default())
    }
}

impl OrderReconciler {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            canonical: Vec::new(),
            source: OrderSource::Fetch,
            tie_break,
        }
    }

    pub fn canonical(&self) -> &[ForwardId] {
        &self.canonical
    }

    pub fn source(&self) -> OrderSource {
        self.source
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Seed from a fresh, owner-scoped fetch and an optional cached order
    pub fn initialize(&mut self, records: &[ForwardRecord], cached: Option<&[ForwardId]>) -> &[ForwardId] {
        let (order, source) = initialize(records, cached, self.tie_break);
        debug_assert!(is_permutation_of(&order, records));
        self.canonical = order;
        self.source = source;
        &self.canonical
    }

    /// Re-seed after a refresh; the in-memory order plays the cached order
    pub fn reconcile(&mut self, records: &[ForwardRecord]) -> &[ForwardId] {
        let previous = std::mem::take(&mut self.canonical);
        let cached = if previous.is_empty() { None } else { Some(previous.as_slice()) };
        self.initialize(records, cached)
    }

    /// Apply a drag made in `visible`. Returns the dense index to push, or
    /// `None` when the drag changed nothing.
    pub fn apply_move(&mut self, visible: &[ForwardId], from: ForwardId, to: ForwardId) -> Option<OrderUpdate> {
        let updated = apply_move(&self.canonical, visible, from, to)?;
        if updated == self.canonical {
            return None;
        }
        self.canonical = updated;
        self.source = OrderSource::Local;
        Some(self.reindex())
    }

    pub fn reindex(&self) -> OrderUpdate {
        dense_reindex(&self.canonical)
    }

    /// Drop all state (scope changed, e.g. another user signed in)
    pub fn reset(&mut self) {
        self.canonical.clear();
        self.source = OrderSource::Fetch;
    }
}

//! Initial ordering
//!
//! Merges the three sources of order for a freshly fetched record set:
//! server `inx`, a cached id list, and plain fetch order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{ForwardId, ForwardRecord};

/// Which rule produced an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    /// Sorted by server `inx`
    Server,
    /// Cached id list, pruned and extended
    Cache,
    /// Fetch order as returned by the backend
    Fetch,
    /// Local drag result not yet confirmed by a fetch
    Local,
}

/// Tie-break for records sharing the same (or no) server index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep backend response order
    #[default]
    FetchOrder,
    /// Lower id first
    Id,
}

/// Fetched ids in order, first occurrence wins
pub fn fetch_order(records: &[ForwardRecord]) -> Vec<ForwardId> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .map(|record| record.id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// True if the server has persisted a position for at least one record
pub fn has_server_order(records: &[ForwardRecord]) -> bool {
    records.iter().any(|record| record.server_index().is_some())
}

/// Sort by server index ascending; unset indexes go last.
pub fn server_order(records: &[ForwardRecord], tie_break: TieBreak) -> Vec<ForwardId> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut keyed: Vec<(usize, &ForwardRecord)> = records
        .iter()
        .filter(|record| seen.insert(record.id))
        .enumerate()
        .collect();

    // sort_by is stable, so equal keys keep fetch order
    keyed.sort_by(|(a_pos, a), (b_pos, b)| {
        let a_key = (a.server_index().is_none(), a.server_index());
        let b_key = (b.server_index().is_none(), b.server_index());
        a_key.cmp(&b_key).then_with(|| match tie_break {
            TieBreak::FetchOrder => a_pos.cmp(b_pos),
            TieBreak::Id => a.id.cmp(&b.id),
        })
    });

    keyed.into_iter().map(|(_, record)| record.id).collect()
}

/// Keep cached ids that still exist, then append new ids in fetch order.
pub fn merge_cached(records: &[ForwardRecord], cached: &[ForwardId]) -> Vec<ForwardId> {
    let current = fetch_order(records);
    let present: HashSet<ForwardId> = current.iter().copied().collect();

    let mut placed = HashSet::with_capacity(current.len());
    let mut order: Vec<ForwardId> = cached
        .iter()
        .copied()
        .filter(|id| present.contains(id) && placed.insert(*id))
        .collect();

    order.extend(current.into_iter().filter(|id| !placed.contains(id)));
    order
}

/// Initial canonical order for an owner-scoped record set.
///
/// Priority: server index if any record has one, else the cached order,
/// else fetch order.
pub fn initialize(
    records: &[ForwardRecord],
    cached: Option<&[ForwardId]>,
    tie_break: TieBreak,
) -> (Vec<ForwardId>, OrderSource) {
    if has_server_order(records) {
        return (server_order(records, tie_break), OrderSource::Server);
    }
    match cached {
        Some(cached) => (merge_cached(records, cached), OrderSource::Cache),
        None => (fetch_order(records), OrderSource::Fetch),
    }
}

//! Dense reindex
//!
//! Positions pushed to the backend are consecutive and 1-based, so a
//! stored `inx` of 0 keeps meaning "never ordered".

use std::collections::HashMap;

use crate::domain::{ForwardId, ForwardRecord, OrderEntry, OrderUpdate};

pub fn dense_reindex(order: &[ForwardId]) -> OrderUpdate {
    OrderUpdate {
        forwards: order
            .iter()
            .enumerate()
            .map(|(pos, id)| OrderEntry { id: *id, inx: pos as i64 + 1 })
            .collect(),
    }
}

/// Mirror a pushed index onto the local records (optimistic update).
/// Records outside the update keep their `inx`.
pub fn apply_reindex(records: &mut [ForwardRecord], update: &OrderUpdate) {
    let positions: HashMap<ForwardId, i64> = update
        .forwards
        .iter()
        .map(|entry| (entry.id, entry.inx))
        .collect();
    for record in records.iter_mut() {
        if let Some(inx) = positions.get(&record.id) {
            record.inx = Some(*inx);
        }
    }
}

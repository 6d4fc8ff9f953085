//! Order wire types
//!
//! Body of the backend's update-order call: the full dense index of every
//! ordered forward, never a delta.

use serde::{Deserialize, Serialize};
use super::forward::ForwardId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub id: ForwardId,
    /// 1-based position
    pub inx: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub forwards: Vec<OrderEntry>,
}

impl OrderUpdate {
    pub fn is_empty(&self) -> bool {
        self.forwards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forwards.len()
    }

    /// Ids in pushed order
    pub fn ids(&self) -> Vec<ForwardId> {
        self.forwards.iter().map(|entry| entry.id).collect()
    }
}

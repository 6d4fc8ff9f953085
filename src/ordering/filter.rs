//! View filter
//!
//! Owner scoping decides which records are orderable at all; tunnel and
//! search filters only narrow what is shown (the visible subset).

use std::collections::HashMap;

use crate::domain::{ForwardId, ForwardRecord, OwnerId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewFilter {
    /// Current user; `None` shows everyone's forwards (admin, or no identity)
    pub owner: Option<OwnerId>,
    pub tunnel: Option<u64>,
    pub search: Option<String>,
}

impl ViewFilter {
    pub fn for_owner(owner: Option<OwnerId>) -> Self {
        Self { owner, ..Default::default() }
    }

    pub fn with_tunnel(mut self, tunnel: Option<u64>) -> Self {
        self.tunnel = tunnel;
        self
    }

    pub fn with_search(mut self, search: &str) -> Self {
        let trimmed = search.trim();
        self.search = if trimmed.is_empty() { None } else { Some(trimmed.to_lowercase()) };
        self
    }

    pub fn in_scope(&self, record: &ForwardRecord) -> bool {
        match self.owner {
            Some(owner) => record.belongs_to(owner),
            None => true,
        }
    }

    /// Records this filter may order, in fetch order
    pub fn scope(&self, records: &[ForwardRecord]) -> Vec<ForwardRecord> {
        records.iter().filter(|r| self.in_scope(r)).cloned().collect()
    }

    pub fn matches(&self, record: &ForwardRecord) -> bool {
        if !self.in_scope(record) {
            return false;
        }
        if let Some(tunnel) = self.tunnel {
            if record.tunnel_id != Some(tunnel) {
                return false;
            }
        }
        match &self.search {
            Some(needle) => [&record.name, &record.remote_addr, &record.in_ip, &record.tunnel_name]
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
            None => true,
        }
    }

    /// Canonical order restricted to the records shown
    pub fn visible(&self, canonical: &[ForwardId], records: &[ForwardRecord]) -> Vec<ForwardId> {
        let by_id: HashMap<ForwardId, &ForwardRecord> = records.iter().map(|r| (r.id, r)).collect();
        canonical
            .iter()
            .copied()
            .filter(|id| by_id.get(id).is_some_and(|record| self.matches(record)))
            .collect()
    }
}

//! Forward export
//!
//! One line per forward of a tunnel, `remoteAddr|name|inPort`, in display order.

use std::collections::HashMap;

use crate::domain::{DomainError, DomainResult, ForwardId, ForwardRecord};

pub fn export_tunnel(records: &[ForwardRecord], order: &[ForwardId], tunnel_id: u64) -> DomainResult<String> {
    let by_id: HashMap<ForwardId, &ForwardRecord> = records.iter().map(|r| (r.id, r)).collect();

    let lines: Vec<String> = order
        .iter()
        .filter_map(|id| by_id.get(id))
        .filter(|record| record.tunnel_id == Some(tunnel_id))
        .map(|record| {
            let port = record.in_port.map(|p| p.to_string()).unwrap_or_default();
            format!("{}|{}|{}", record.remote_addr, record.name, port)
        })
        .collect();

    if lines.is_empty() {
        return Err(DomainError::NotFound(format!("No forwards in tunnel {}", tunnel_id)));
    }
    Ok(lines.join("\n"))
}

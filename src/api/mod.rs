//! Forward API
//!
//! Client side of the panel backend: listing forwards and persisting their order.
//! - envelope: `{code, msg, data}` response wrapper
//! - http: reqwest implementation against the real backend
//! - memory: in-process backend with the same order-update rules

mod envelope;
mod http;
mod memory;

use async_trait::async_trait;

use crate::domain::{DomainResult, ForwardRecord, OrderUpdate};

pub use envelope::{ApiResponse, SUCCESS_CODE};
pub use http::HttpForwardApi;
pub use memory::{Caller, MemoryForwardApi, PushFault};

#[async_trait]
pub trait ForwardApi: Send + Sync {
    /// Complete forward list of the caller's scope
    async fn fetch_records(&self) -> DomainResult<Vec<ForwardRecord>>;

    /// Persist the full `{id, inx}` set. Transport failures are `Err`;
    /// a reachable backend answers with an envelope whose code may be non-zero.
    async fn push_order(&self, update: &OrderUpdate) -> DomainResult<ApiResponse<()>>;
}

//! Repository Layer - Core Traits
//!
//! Defines the abstract interface of the local order cache.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{DomainResult, ForwardId};

/// Key the forward list order is cached under
pub const DEFAULT_ORDER_KEY: &str = "forward-order";

/// Persisted id order, scoped per key
#[async_trait]
pub trait OrderCache: Send + Sync {
    /// Cached order, `None` if nothing was stored under `key`
    async fn get(&self, key: &str) -> DomainResult<Option<Vec<ForwardId>>>;

    /// Replace the order stored under `key`
    async fn set(&self, key: &str, ids: &[ForwardId]) -> DomainResult<()>;
}

//! In-memory OrderCache, for tests and sessions without a data directory

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::{DomainResult, ForwardId};
use super::traits::OrderCache;

#[derive(Default)]
pub struct MemoryOrderCache {
    entries: Mutex<HashMap<String, Vec<ForwardId>>>,
}

impl MemoryOrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, ids: Vec<ForwardId>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), ids);
        Self {
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl OrderCache for MemoryOrderCache {
    async fn get(&self, key: &str) -> DomainResult<Option<Vec<ForwardId>>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, ids: &[ForwardId]) -> DomainResult<()> {
        self.entries.lock().await.insert(key.to_string(), ids.to_vec());
        Ok(())
    }
}

//! Order Cache Repository
//!
//! SQLite-backed implementation of OrderCache. Each key holds one id list
//! serialized as a JSON array.

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, ForwardId};
use super::traits::OrderCache;

pub struct OrderCacheRepository {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl OrderCacheRepository {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl OrderCache for OrderCacheRepository {
    async fn get(&self, key: &str) -> DomainResult<Option<Vec<ForwardId>>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Storage("Database not initialized".to_string()))?;

        let mut stmt = conn.prepare("SELECT ids FROM order_cache WHERE key = ?")
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let mut rows = stmt.query(params![key])
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        let raw: String = match rows.next().map_err(|e| DomainError::Storage(e.to_string()))? {
            Some(row) => row.get(0).map_err(|e| DomainError::Storage(e.to_string()))?,
            None => return Ok(None),
        };

        let ids: Vec<ForwardId> = serde_json::from_str(&raw)
            .map_err(|e| DomainError::Storage(format!("Corrupt cached order for {}: {}", key, e)))?;
        Ok(Some(ids))
    }

    async fn set(&self, key: &str, ids: &[ForwardId]) -> DomainResult<()> {
        let raw = serde_json::to_string(ids).map_err(|e| DomainError::Storage(e.to_string()))?;

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Storage("Database not initialized".to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO order_cache (key, ids, updated_at) VALUES (?, ?, ?)",
            params![key, raw, chrono::Utc::now().timestamp_millis()],
        )
        .map_err(|e| DomainError::Storage(e.to_string()))?;
        Ok(())
    }
}

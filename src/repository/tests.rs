//! Repository Integration Tests
//!
//! Tests for OrderCacheRepository with in-memory and on-disk SQLite databases.

#[cfg(test)]
mod tests {
    use crate::domain::{DomainError, ForwardId};
    use crate::repository::{init_db, DbState, MemoryOrderCache, OrderCache, OrderCacheRepository, DEFAULT_ORDER_KEY};
    use std::path::PathBuf;

    fn ids(raw: &[u64]) -> Vec<ForwardId> {
        raw.iter().map(|id| ForwardId(*id)).collect()
    }

    async fn setup_test_db() -> (DbState, OrderCacheRepository) {
        // Use in-memory database for tests
        let db_path = PathBuf::from(":memory:");
        let db_state = init_db(&db_path).await.expect("Failed to init test DB");
        let repo = OrderCacheRepository::new(db_state.conn.clone());
        (db_state, repo)
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let (_db, repo) = setup_test_db().await;
        assert_eq!(repo.get(DEFAULT_ORDER_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (_db, repo) = setup_test_db().await;

        repo.set(DEFAULT_ORDER_KEY, &ids(&[3, 1, 2])).await.expect("Set failed");
        assert_eq!(repo.get(DEFAULT_ORDER_KEY).await.unwrap(), Some(ids(&[3, 1, 2])));

        repo.set(DEFAULT_ORDER_KEY, &ids(&[1])).await.expect("Overwrite failed");
        assert_eq!(repo.get(DEFAULT_ORDER_KEY).await.unwrap(), Some(ids(&[1])));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let (_db, repo) = setup_test_db().await;

        repo.set("forward-order", &ids(&[1, 2])).await.unwrap();
        repo.set("forward-order:user-7", &ids(&[9])).await.unwrap();

        assert_eq!(repo.get("forward-order").await.unwrap(), Some(ids(&[1, 2])));
        assert_eq!(repo.get("forward-order:user-7").await.unwrap(), Some(ids(&[9])));
    }

    #[tokio::test]
    async fn test_corrupt_row_is_storage_error() {
        let (db, repo) = setup_test_db().await;
        {
            let guard = db.conn.lock().await;
            let conn = guard.as_ref().unwrap();
            conn.execute(
                "INSERT INTO order_cache (key, ids, updated_at) VALUES ('forward-order', 'not json', 0)",
                [],
            )
            .unwrap();
        }

        let result = repo.get("forward-order").await;
        assert!(matches!(result, Err(DomainError::Storage(_))));
    }

    #[tokio::test]
    async fn test_closed_db_reports_error() {
        let (db, repo) = setup_test_db().await;
        db.close().await;

        assert!(matches!(repo.get("forward-order").await, Err(DomainError::Storage(_))));
        assert!(repo.set("forward-order", &ids(&[1])).await.is_err());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("order.db");

        {
            let db = init_db(&path).await.unwrap();
            let repo = OrderCacheRepository::new(db.conn.clone());
            repo.set(DEFAULT_ORDER_KEY, &ids(&[4, 2])).await.unwrap();
        }

        let db = init_db(&path).await.unwrap();
        let repo = OrderCacheRepository::new(db.conn.clone());
        assert_eq!(repo.get(DEFAULT_ORDER_KEY).await.unwrap(), Some(ids(&[4, 2])));
    }

    #[tokio::test]
    async fn test_memory_cache() {
        let cache = MemoryOrderCache::with_entry(DEFAULT_ORDER_KEY, ids(&[2, 1]));
        assert_eq!(cache.get(DEFAULT_ORDER_KEY).await.unwrap(), Some(ids(&[2, 1])));
        cache.set(DEFAULT_ORDER_KEY, &ids(&[1, 2])).await.unwrap();
        assert_eq!(cache.get(DEFAULT_ORDER_KEY).await.unwrap(), Some(ids(&[1, 2])));
        assert_eq!(cache.get("other").await.unwrap(), None);
    }
}

//! Repository Layer
//!
//! Local persistence of the forward order (the client-side cache).

mod traits;
mod db;
mod memory_cache;
mod order_cache_repo;

#[cfg(test)]
mod tests;

pub use traits::{OrderCache, DEFAULT_ORDER_KEY};
pub use db::{init_db, DbState};
pub use memory_cache::MemoryOrderCache;
pub use order_cache_repo::OrderCacheRepository;

//! Forward Order
//!
//! Client-side ordering of forward rules: one canonical order per user,
//! drag-and-drop inside filtered views, a local cache and an optimistic
//! push of dense 1-based positions to the panel backend.
//!
//! Layered architecture:
//! - domain: Core entities and errors
//! - ordering: Pure reconciliation, move and reindex logic
//! - repository: Local order cache (SQLite or in-memory)
//! - api: Panel backend client
//! - session: Ties ordering, cache and backend together

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod export;
pub mod ordering;
pub mod repository;
pub mod session;

pub use api::{ApiResponse, ForwardApi, HttpForwardApi, MemoryForwardApi};
pub use config::PanelConfig;
pub use domain::{DomainError, DomainResult, ForwardId, ForwardRecord, OrderEntry, OrderUpdate, OwnerId};
pub use ordering::{OrderReconciler, OrderSource, TieBreak, ViewFilter};
pub use repository::{MemoryOrderCache, OrderCache, OrderCacheRepository};
pub use session::{OrderSession, SessionSettings};

pub use list_dragdrop::{DragTracker, MoveEvent};

/// Start the rolling file logger if `log_dir` is configured.
/// Without it, log output goes wherever the host application routes the `log` facade.
pub fn init_logging(config: &PanelConfig) -> Result<(), String> {
    match &config.log_dir {
        Some(dir) => {
            rolling_logger::init_logger(dir.clone(), "forward-order")?;
            log::info!("Logging to {}", dir.display());
            Ok(())
        }
        None => Ok(()),
    }
}

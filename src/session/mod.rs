//! Order Session
//!
//! Ties the reconciler to its collaborators: the backend (records in,
//! order out) and the local cache. Local state is updated first and never
//! rolled back; a failed push is reported to the caller only.

use std::collections::HashMap;
use std::sync::Arc;

use list_dragdrop::MoveEvent;
use tokio::task::JoinHandle;

use crate::api::{ForwardApi, HttpForwardApi};
use crate::auth::owner_from_token;
use crate::config::PanelConfig;
use crate::domain::{DomainResult, ForwardId, ForwardRecord, OrderUpdate, OwnerId};
use crate::export::export_tunnel;
use crate::ordering::{apply_reindex, OrderReconciler, OrderSource, TieBreak, ViewFilter};
use crate::repository::{init_db, MemoryOrderCache, OrderCache, OrderCacheRepository, DEFAULT_ORDER_KEY};


#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub cache_key: String,
    pub tie_break: TieBreak,
    /// Current user; `None` orders every forward the backend returns
    pub owner: Option<OwnerId>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_ORDER_KEY.to_string(),
            tie_break: TieBreak::default(),
            owner: None,
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &PanelConfig) -> Self {
        Self {
            cache_key: config.cache_key.clone(),
            tie_break: config.tie_break,
            owner: config.token.as_deref().and_then(owner_from_token),
        }
    }
}

pub struct OrderSession {
    api: Arc<dyn ForwardApi>,
    cache: Arc<dyn OrderCache>,
    settings: SessionSettings,
    /// Last fetch, unscoped
    records: Vec<ForwardRecord>,
    filter: ViewFilter,
    reconciler: OrderReconciler,
}

impl OrderSession {
    pub fn new(api: Arc<dyn ForwardApi>, cache: Arc<dyn OrderCache>, settings: SessionSettings) -> Self {
        Self {
            filter: ViewFilter::for_owner(settings.owner),
            reconciler: OrderReconciler::new(settings.tie_break),
            api,
            cache,
            settings,
            records: Vec::new(),
        }
    }

    /// HTTP backend plus SQLite cache (in-memory when no cache path is set
    /// or the database cannot be opened)
    pub async fn from_config(config: &PanelConfig) -> DomainResult<Self> {
        config.validate()?;
        let api = Arc::new(HttpForwardApi::from_config(config)?);

        let cache: Arc<dyn OrderCache> = match &config.cache_path {
            Some(path) => match init_db(path).await {
                Ok(db) => Arc::new(OrderCacheRepository::new(db.conn.clone())),
                Err(e) => {
                    log::warn!("Order cache unavailable, keeping order in memory: {}", e);
                    Arc::new(MemoryOrderCache::new())
                }
            },
            None => Arc::new(MemoryOrderCache::new()),
        };

        Ok(Self::new(api, cache, SessionSettings::from_config(config)))
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn canonical(&self) -> &[ForwardId] {
        self.reconciler.canonical()
    }

    pub fn order_source(&self) -> OrderSource {
        self.reconciler.source()
    }

    pub fn records(&self) -> &[ForwardRecord] {
        &self.records
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    /// Fetch and seed the order from server index, cache or fetch order
    pub async fn load(&mut self) -> DomainResult<&[ForwardId]> {
        let records = self.api.fetch_records().await?;
        let scoped = self.filter.scope(&records);
        let cached = self.read_cache().await;

        self.reconciler.initialize(&scoped, cached.as_deref());
        self.records = records;
        if self.reconciler.source() == OrderSource::Server {
            self.write_cache().await;
        }

        log::info!(
            "Loaded {} forwards ({} in scope), order from {:?}",
            self.records.len(),
            scoped.len(),
            self.reconciler.source()
        );
        Ok(self.reconciler.canonical())
    }

    /// Fetch again and reconcile against the in-memory order
    pub async fn refresh(&mut self) -> DomainResult<&[ForwardId]> {
        let records = self.api.fetch_records().await?;
        Ok(self.refresh_with(records).await)
    }

    /// Reconcile against an already fetched record set. With no in-memory
    /// order (fresh session, owner switched) this re-initializes from the cache.
    pub async fn refresh_with(&mut self, records: Vec<ForwardRecord>) -> &[ForwardId] {
        let scoped = self.filter.scope(&records);
        if self.reconciler.canonical().is_empty() {
            let cached = self.read_cache().await;
            self.reconciler.initialize(&scoped, cached.as_deref());
        } else {
            self.reconciler.reconcile(&scoped);
        }
        self.records = records;
        if self.reconciler.source() == OrderSource::Server {
            self.write_cache().await;
        }
        self.reconciler.canonical()
    }

    /// Different user: drop the order and records, keep tunnel/search filters
    pub fn switch_owner(&mut self, owner: Option<OwnerId>) {
        if self.settings.owner == owner {
            return;
        }
        self.settings.owner = owner;
        self.filter.owner = owner;
        self.records.clear();
        self.reconciler.reset();
    }

    /// Replace tunnel and search filters; the owner scope stays the session's
    pub fn set_filter(&mut self, filter: ViewFilter) {
        self.filter = ViewFilter { owner: self.settings.owner, ..filter };
    }

    pub fn set_tunnel_filter(&mut self, tunnel: Option<u64>) {
        self.filter.tunnel = tunnel;
    }

    pub fn set_search(&mut self, search: &str) {
        self.filter = self.filter.clone().with_search(search);
    }

    /// Ids shown with the current filters, in canonical order
    pub fn visible_ids(&self) -> Vec<ForwardId> {
        self.filter.visible(self.reconciler.canonical(), &self.records)
    }

    pub fn visible_records(&self) -> Vec<&ForwardRecord> {
        let by_id: HashMap<ForwardId, &ForwardRecord> = self.records.iter().map(|r| (r.id, r)).collect();
        self.visible_ids()
            .into_iter()
            .filter_map(|id| by_id.get(&id).copied())
            .collect()
    }

    /// Apply a drag locally: canonical order, records' `inx`, cache.
    /// Returns the full index to push, or `None` if nothing moved.
    pub async fn reorder(&mut self, from: ForwardId, to: ForwardId) -> Option<OrderUpdate> {
        let visible = self.visible_ids();
        let Some(update) = self.reconciler.apply_move(&visible, from, to) else {
            log::debug!("Ignoring drag {} -> {}", from, to);
            return None;
        };

        apply_reindex(&mut self.records, &update);
        self.write_cache().await;
        log::info!("Moved forward {} next to {}", from, to);
        Some(update)
    }

    /// Persist an index and wait for the answer. Local order is kept either way.
    pub async fn push(&self, update: &OrderUpdate) -> DomainResult<()> {
        push_order(self.api.as_ref(), update).await
    }

    /// Persist in the background. Every push carries the full set, so pushes
    /// landing out of order still converge on the last one.
    pub fn spawn_push(&self, update: OrderUpdate) -> JoinHandle<DomainResult<()>> {
        let api = Arc::clone(&self.api);
        tokio::spawn(async move { push_order(api.as_ref(), &update).await })
    }

    /// Reorder then push. `Ok(None)` for an ignored drag.
    pub async fn drag(&mut self, from: ForwardId, to: ForwardId) -> DomainResult<Option<OrderUpdate>> {
        match self.reorder(from, to).await {
            Some(update) => {
                self.push(&update).await?;
                Ok(Some(update))
            }
            None => Ok(None),
        }
    }

    /// Entry point for the gesture tracker
    pub async fn handle_drop(&mut self, event: MoveEvent<ForwardId>) -> DomainResult<Option<OrderUpdate>> {
        self.drag(event.from, event.to).await
    }

    /// `remoteAddr|name|inPort` lines of one tunnel, in display order
    pub fn export_tunnel(&self, tunnel_id: u64) -> DomainResult<String> {
        let scoped = self.filter.scope(&self.records);
        export_tunnel(&scoped, self.reconciler.canonical(), tunnel_id)
    }

    async fn read_cache(&self) -> Option<Vec<ForwardId>> {
        match self.cache.get(&self.settings.cache_key).await {
            Ok(cached) => cached,
            Err(e) => {
                log::warn!("Ignoring unreadable order cache: {}", e);
                None
            }
        }
    }

    async fn write_cache(&self) {
        if let Err(e) = self.cache.set(&self.settings.cache_key, self.reconciler.canonical()).await {
            log::warn!("Failed to cache forward order: {}", e);
        }
    }
}

async fn push_order(api: &dyn ForwardApi, update: &OrderUpdate) -> DomainResult<()> {
    let result = match api.push_order(update).await {
        Ok(res) => res.into_result().map(|_| ()),
        Err(e) => Err(e),
    };

    match &result {
        Ok(()) => log::info!("Order of {} forwards persisted", update.len()),
        Err(e) if e.is_transient() => log::warn!("Forward order not synced, kept locally: {}", e),
        Err(e) => log::error!("Failed to sync forward order: {}", e),
    }
    result
}

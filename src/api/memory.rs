//! In-memory Forward API
//!
//! Keeps forwards in process and applies order updates with the backend's
//! rules: the list must not be empty, a regular user may only reorder their
//! own forwards, and every accepted update overwrites the `inx` of each
//! listed forward (last write wins).

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, ForwardId, ForwardRecord, OrderUpdate, OwnerId};
use super::envelope::ApiResponse;
use super::ForwardApi;

const ERROR_CODE: i32 = -1;

/// Identity the requests are made with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: OwnerId,
    pub is_admin: bool,
}

impl Caller {
    pub fn admin(user_id: u64) -> Self {
        Self { user_id: OwnerId(user_id), is_admin: true }
    }

    pub fn user(user_id: u64) -> Self {
        Self { user_id: OwnerId(user_id), is_admin: false }
    }
}

/// Scripted failure for the next push
#[derive(Debug, Clone, PartialEq)]
pub enum PushFault {
    /// Backend answers with a non-zero code
    Reject { code: i32, msg: String },
    /// Request never completes (timeout, connection reset)
    Transport(String),
}

pub struct MemoryForwardApi {
    caller: Caller,
    records: Mutex<Vec<ForwardRecord>>,
    faults: Mutex<VecDeque<PushFault>>,
    pushes: AtomicUsize,
}

impl MemoryForwardApi {
    pub fn new(caller: Caller, records: Vec<ForwardRecord>) -> Self {
        Self {
            caller,
            records: Mutex::new(records),
            faults: Mutex::new(VecDeque::new()),
            pushes: AtomicUsize::new(0),
        }
    }

    /// Fail the next push with `fault` (queued, one per push)
    pub async fn fail_next_push(&self, fault: PushFault) {
        self.faults.lock().await.push_back(fault);
    }

    pub async fn insert(&self, record: ForwardRecord) {
        self.records.lock().await.push(record);
    }

    pub async fn remove(&self, id: ForwardId) {
        self.records.lock().await.retain(|r| r.id != id);
    }

    /// Stored `inx` per forward, unset as `None`
    pub async fn stored_index(&self) -> HashMap<ForwardId, Option<i64>> {
        self.records.lock().await.iter().map(|r| (r.id, r.inx)).collect()
    }

    /// Number of push requests received, including failed ones
    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    fn visible_to_caller(&self, record: &ForwardRecord) -> bool {
        self.caller.is_admin || record.belongs_to(self.caller.user_id)
    }
}

#[async_trait]
impl ForwardApi for MemoryForwardApi {
    async fn fetch_records(&self) -> DomainResult<Vec<ForwardRecord>> {
        let records = self.records.lock().await;
        Ok(records.iter().filter(|r| self.visible_to_caller(r)).cloned().collect())
    }

    async fn push_order(&self, update: &OrderUpdate) -> DomainResult<ApiResponse<()>> {
        self.pushes.fetch_add(1, Ordering::SeqCst);

        if let Some(fault) = self.faults.lock().await.pop_front() {
            return match fault {
                PushFault::Reject { code, msg } => Ok(ApiResponse::err(code, &msg)),
                PushFault::Transport(msg) => Err(DomainError::Transport(msg)),
            };
        }

        if update.is_empty() {
            return Ok(ApiResponse::err(ERROR_CODE, "forwards must not be empty"));
        }

        let mut records = self.records.lock().await;

        if !self.caller.is_admin {
            let owned = update.forwards.iter().all(|entry| {
                records
                    .iter()
                    .any(|r| r.id == entry.id && r.belongs_to(self.caller.user_id))
            });
            if !owned {
                return Ok(ApiResponse::err(ERROR_CODE, "only own forwards can be reordered"));
            }
        }

        let positions: HashMap<ForwardId, i64> = update.forwards.iter().map(|e| (e.id, e.inx)).collect();
        for record in records.iter_mut() {
            if let Some(inx) = positions.get(&record.id) {
                record.inx = Some(*inx);
            }
        }

        log::info!("User {} updated order of {} forwards", self.caller.user_id, update.len());
        Ok(ApiResponse::done("order updated"))
    }
}

//! Forward Entity
//!
//! A forwarding rule as listed by the panel backend. Only `id`, `userId`
//! and `inx` matter for ordering; the rest is carried through for display
//! and export.

use serde::{Deserialize, Serialize};

/// Server-assigned forward identifier, never reused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForwardId(pub u64);

/// Owning user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub u64);

impl std::fmt::Display for ForwardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A forwarding rule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRecord {
    /// Unique identifier
    pub id: ForwardId,
    /// Owner (absent for records the backend does not attribute)
    #[serde(default)]
    pub user_id: Option<OwnerId>,
    /// Last persisted position; absent or 0 means "not yet ordered"
    #[serde(default)]
    pub inx: Option<i64>,

    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tunnel_id: Option<u64>,
    #[serde(default)]
    pub tunnel_name: String,
    #[serde(default)]
    pub in_ip: String,
    #[serde(default)]
    pub in_port: Option<u32>,
    /// Newline separated target addresses
    #[serde(default)]
    pub remote_addr: String,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub in_flow: u64,
    #[serde(default)]
    pub out_flow: u64,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
}

impl ForwardRecord {
    pub fn new(id: u64, user_id: u64) -> Self {
        Self {
            id: ForwardId(id),
            user_id: Some(OwnerId(user_id)),
            ..Default::default()
        }
    }

    pub fn with_inx(mut self, inx: i64) -> Self {
        self.inx = Some(inx);
        self
    }

    pub fn with_tunnel(mut self, tunnel_id: u64, tunnel_name: &str) -> Self {
        self.tunnel_id = Some(tunnel_id);
        self.tunnel_name = tunnel_name.to_string();
        self
    }

    /// Persisted position, only when the server actually set one
    pub fn server_index(&self) -> Option<i64> {
        self.inx.filter(|inx| *inx > 0)
    }

    pub fn belongs_to(&self, owner: OwnerId) -> bool {
        self.user_id == Some(owner)
    }
}

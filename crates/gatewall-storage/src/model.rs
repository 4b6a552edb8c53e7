use gatewall_types::prelude::*;
use serde::{Deserialize, Serialize};

/// A tenant's access grant. `request_count` is mutated only through
/// `LicenseStore::consume_request`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub key: String,
    pub user_id: Id,
    pub admin_id: Id,
    #[serde(default, deserialize_with = "gatewall_types::tier::deserialize_lenient")]
    pub tier: LicenseTier,
    #[serde(default)]
    pub hwids: Vec<String>,
    pub valid_until: Timestamp,
    #[serde(default)]
    pub request_limit: Option<u64>,
    #[serde(default)]
    pub request_count: u64,
    #[serde(default)]
    pub last_used_ip: Option<String>,
    #[serde(default)]
    pub last_used_hwid: Option<String>,
    pub created_at: Timestamp,
}

impl License {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        !self.valid_until.is_after(now)
    }

    /// Empty allow-list means unrestricted; a caller presenting no hwid
    /// passes regardless of the list.
    pub fn allows_hwid(&self, presented: Option<&str>) -> bool {
        match presented {
            Some(hwid) => self.hwids.is_empty() || self.hwids.iter().any(|h| h == hwid),
            None => true,
        }
    }

    pub fn quota_exhausted(&self) -> bool {
        matches!(self.request_limit, Some(limit) if self.request_count >= limit)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConsumeOutcome {
    Consumed(License),
    LimitExceeded,
    Expired,
    NotFound,
}

/// One row per banned address. Soft-deleted on unblock, retained for audit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: Id,
    pub address: String,
    #[serde(default)]
    pub reason: Option<String>,
    pub blocked_by: ActorId,
    #[serde(default)]
    pub license_key: Option<String>,
    pub active: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

impl BlockRecord {
    /// Blocked iff active and not past expiry; absent expiry = permanent.
    pub fn is_in_force(&self, now: Timestamp) -> bool {
        self.active && self.expires_at.map_or(true, |at| at.is_after(now))
    }
}

#[derive(Clone, Debug)]
pub struct BlockUpsert {
    pub address: String,
    pub reason: Option<String>,
    pub blocked_by: ActorId,
    pub license_key: Option<String>,
    pub expires_at: Option<Timestamp>,
}

/// Listing row with the owning user denormalized for display.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockView {
    #[serde(flatten)]
    pub record: BlockRecord,
    #[serde(default)]
    pub owner_user_id: Option<Id>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptKind {
    RateLimit,
    LicenseCheck,
}

/// Append-only violation row; never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FailedAttempt {
    pub id: Id,
    pub address: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub kind: AttemptKind,
    pub at: Timestamp,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

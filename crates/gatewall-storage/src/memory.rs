use crate::errors::StorageError;
use crate::model::{
    BlockRecord, BlockUpsert, BlockView, ConsumeOutcome, FailedAttempt, License, Page,
};
use crate::spi::{AttemptStore, BlockStore, LicenseStore};
use async_trait::async_trait;
use gatewall_types::prelude::*;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory implementation of the full store SPI, shared across the three
/// trait seams the way one durable backend would be. Backs tests and
/// embedded deployments.
#[derive(Clone, Default)]
pub struct MemoryVault {
    inner: Arc<VaultInner>,
}

#[derive(Default)]
struct VaultInner {
    licenses: RwLock<HashMap<String, License>>,
    blocks: RwLock<Vec<BlockRecord>>,
    attempts: RwLock<Vec<FailedAttempt>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn license_snapshot(&self, key: &str) -> Option<License> {
        self.inner.licenses.read().get(key).cloned()
    }

    pub fn attempt_count(&self) -> usize {
        self.inner.attempts.read().len()
    }
}

#[async_trait]
impl LicenseStore for MemoryVault {
    async fn create(&self, license: &License) -> Result<(), StorageError> {
        let mut licenses = self.inner.licenses.write();
        if licenses.contains_key(&license.key) {
            return Err(StorageError::conflict("license key already exists"));
        }
        licenses.insert(license.key.clone(), license.clone());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<License>, StorageError> {
        Ok(self.inner.licenses.read().get(key).cloned())
    }

    async fn consume_request(
        &self,
        key: &str,
        now: Timestamp,
        ip: Option<&str>,
        hwid: Option<&str>,
    ) -> Result<ConsumeOutcome, StorageError> {
        // One write guard spans check and increment; racing consumers
        // serialize here instead of read-then-write at the call site.
        let mut licenses = self.inner.licenses.write();
        let Some(license) = licenses.get_mut(key) else {
            return Ok(ConsumeOutcome::NotFound);
        };
        if license.is_expired(now) {
            return Ok(ConsumeOutcome::Expired);
        }
        if license.quota_exhausted() {
            return Ok(ConsumeOutcome::LimitExceeded);
        }
        license.request_count += 1;
        if let Some(ip) = ip {
            license.last_used_ip = Some(ip.to_string());
        }
        if let Some(hwid) = hwid {
            license.last_used_hwid = Some(hwid.to_string());
        }
        Ok(ConsumeOutcome::Consumed(license.clone()))
    }
}

#[async_trait]
impl BlockStore for MemoryVault {
    async fn upsert_block(
        &self,
        upsert: BlockUpsert,
        now: Timestamp,
    ) -> Result<BlockRecord, StorageError> {
        let mut blocks = self.inner.blocks.write();
        if let Some(existing) = blocks
            .iter_mut()
            .rev()
            .find(|record| record.address == upsert.address)
        {
            existing.reason = upsert.reason;
            existing.blocked_by = upsert.blocked_by;
            existing.license_key = upsert.license_key;
            existing.expires_at = upsert.expires_at;
            existing.active = true;
            return Ok(existing.clone());
        }
        let record = BlockRecord {
            id: Id::new_random(),
            address: upsert.address,
            reason: upsert.reason,
            blocked_by: upsert.blocked_by,
            license_key: upsert.license_key,
            active: true,
            created_at: now,
            expires_at: upsert.expires_at,
        };
        blocks.push(record.clone());
        Ok(record)
    }

    async fn deactivate(&self, address: &str) -> Result<u64, StorageError> {
        let mut blocks = self.inner.blocks.write();
        let mut touched = 0;
        for record in blocks
            .iter_mut()
            .filter(|record| record.address == address && record.active)
        {
            record.active = false;
            touched += 1;
        }
        Ok(touched)
    }

    async fn active_addresses(&self, now: Timestamp) -> Result<Vec<String>, StorageError> {
        Ok(self
            .inner
            .blocks
            .read()
            .iter()
            .filter(|record| record.is_in_force(now))
            .map(|record| record.address.clone())
            .collect())
    }

    async fn list_blocked(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<BlockView>, StorageError> {
        let page = page.max(1);
        let page_size = page_size.max(1) as usize;
        let licenses = self.inner.licenses.read();
        let mut active: Vec<BlockRecord> = self
            .inner
            .blocks
            .read()
            .iter()
            .filter(|record| record.active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let start = (page as usize - 1) * page_size;
        let has_more = active.len() > start + page_size;
        let items = active
            .into_iter()
            .skip(start)
            .take(page_size)
            .map(|record| {
                let owner_user_id = record
                    .license_key
                    .as_deref()
                    .and_then(|key| licenses.get(key))
                    .map(|license| license.user_id.clone());
                BlockView {
                    record,
                    owner_user_id,
                }
            })
            .collect();
        Ok(Page {
            items,
            next: has_more.then(|| (page + 1).to_string()),
        })
    }
}

#[async_trait]
impl AttemptStore for MemoryVault {
    async fn append(&self, attempt: FailedAttempt) -> Result<(), StorageError> {
        self.inner.attempts.write().push(attempt);
        Ok(())
    }

    async fn count_since(&self, address: &str, since: Timestamp) -> Result<u64, StorageError> {
        Ok(self
            .inner
            .attempts
            .read()
            .iter()
            .filter(|attempt| attempt.address == address && attempt.at.is_after(since))
            .count() as u64)
    }
}

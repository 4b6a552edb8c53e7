use crate::errors::StorageError;
use crate::model::{
    BlockRecord, BlockUpsert, BlockView, ConsumeOutcome, FailedAttempt, License, Page,
};
use async_trait::async_trait;
use gatewall_types::prelude::*;

#[async_trait]
pub trait LicenseStore: Send + Sync {
    async fn create(&self, license: &License) -> Result<(), StorageError>;

    async fn get(&self, key: &str) -> Result<Option<License>, StorageError>;

    /// Atomic increment-with-ceiling: re-checks expiry and `request_limit`
    /// and increments `request_count` in a single storage-level step, also
    /// persisting `last_used_ip`/`last_used_hwid`. Two concurrent callers
    /// racing for the last quota slot must not both consume it.
    async fn consume_request(
        &self,
        key: &str,
        now: Timestamp,
        ip: Option<&str>,
        hwid: Option<&str>,
    ) -> Result<ConsumeOutcome, StorageError>;
}

#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Upsert by address: re-blocking updates reason/expiry/actor in place.
    async fn upsert_block(
        &self,
        upsert: BlockUpsert,
        now: Timestamp,
    ) -> Result<BlockRecord, StorageError>;

    /// Marks all active records for the address inactive; returns how many
    /// were touched (0 is not an error).
    async fn deactivate(&self, address: &str) -> Result<u64, StorageError>;

    /// Addresses of all records in force at `now` (active, unexpired).
    async fn active_addresses(&self, now: Timestamp) -> Result<Vec<String>, StorageError>;

    /// Administrative listing, newest first, owner info denormalized.
    async fn list_blocked(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<BlockView>, StorageError>;
}

#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn append(&self, attempt: FailedAttempt) -> Result<(), StorageError>;

    async fn count_since(&self, address: &str, since: Timestamp) -> Result<u64, StorageError>;
}

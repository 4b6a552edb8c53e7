use arc_swap::ArcSwap;
use gatewall_storage::{BlockRecord, BlockStore, BlockUpsert, BlockView, Page, StorageError};
use gatewall_types::prelude::*;
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cached source of truth for "is this address currently banned".
///
/// The active set is published as an immutable snapshot behind an
/// `ArcSwap`: readers never observe a partially rebuilt set and the
/// hot-path lookup takes no lock. Mutations write through storage first;
/// the snapshot is only touched after the write succeeds.
pub struct BlockRegistry {
    store: Arc<dyn BlockStore>,
    snapshot: ArcSwap<HashSet<IpAddr>>,
    refreshed_at: AtomicI64,
}

impl BlockRegistry {
    pub fn new(store: Arc<dyn BlockStore>) -> Self {
        Self {
            store,
            snapshot: ArcSwap::from_pointee(HashSet::new()),
            refreshed_at: AtomicI64::new(0),
        }
    }

    /// Rebuilds the snapshot from storage and publishes it wholesale.
    /// A failed read keeps the previous snapshot in service.
    pub async fn refresh(&self) {
        let now = Timestamp::now();
        match self.store.active_addresses(now).await {
            Ok(addresses) => {
                let set: HashSet<IpAddr> = addresses
                    .iter()
                    .filter_map(|raw| match raw.parse() {
                        Ok(addr) => Some(addr),
                        Err(_) => {
                            debug!(address = %raw, "skipping unparseable blocked address");
                            None
                        }
                    })
                    .collect();
                let count = set.len();
                self.snapshot.store(Arc::new(set));
                self.refreshed_at.store(now.0, Ordering::Relaxed);
                debug!(entries = count, "block snapshot refreshed");
            }
            Err(err) => {
                warn!(error = %err, "block snapshot refresh failed; serving previous snapshot");
            }
        }
    }

    /// Periodic refresh; the first tick fires immediately, so startup is
    /// served from a freshly loaded snapshot.
    pub fn spawn_refresh(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.refresh().await;
            }
        })
    }

    /// Lock-free membership test; never touches storage.
    pub fn is_blocked(&self, addr: IpAddr) -> bool {
        self.snapshot.load().contains(&addr)
    }

    /// Upserts the block record, then makes the ban observable to the very
    /// next request without waiting for a refresh cycle.
    pub async fn block(
        &self,
        addr: IpAddr,
        blocked_by: ActorId,
        reason: Option<String>,
        expires_at: Option<Timestamp>,
        license_key: Option<String>,
    ) -> Result<BlockRecord, StorageError> {
        let record = self
            .store
            .upsert_block(
                BlockUpsert {
                    address: addr.to_string(),
                    reason,
                    blocked_by,
                    license_key,
                    expires_at,
                },
                Timestamp::now(),
            )
            .await?;

        self.snapshot.rcu(|current| {
            let mut next = HashSet::clone(current);
            next.insert(addr);
            next
        });
        Ok(record)
    }

    /// Deactivates all records for the address; a no-op when none are
    /// active.
    pub async fn unblock(&self, addr: IpAddr) -> Result<u64, StorageError> {
        let touched = self.store.deactivate(&addr.to_string()).await?;

        self.snapshot.rcu(|current| {
            let mut next = HashSet::clone(current);
            next.remove(&addr);
            next
        });
        Ok(touched)
    }

    /// Administrative listing straight from storage (not the cache).
    pub async fn list_blocked(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<BlockView>, StorageError> {
        self.store.list_blocked(page, page_size).await
    }

    pub fn refreshed_at(&self) -> Option<Timestamp> {
        match self.refreshed_at.load(Ordering::Relaxed) {
            0 => None,
            ms => Some(Timestamp(ms)),
        }
    }

    pub fn snapshot_len(&self) -> usize {
        self.snapshot.load().len()
    }
}

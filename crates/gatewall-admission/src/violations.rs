use crate::observe::AdmissionStats;
use crate::registry::BlockRegistry;
use gatewall_storage::{AttemptKind, AttemptStore, FailedAttempt, StorageError};
use gatewall_types::prelude::*;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::warn;

/// Shared failure-signal sink: every counted denial lands here, and the
/// trailing-window count drives escalation to a network ban. Keyed by raw
/// address; license identity is deliberately not part of the key.
#[derive(Clone)]
pub struct ViolationRecorder {
    attempts: Arc<dyn AttemptStore>,
    registry: Arc<BlockRegistry>,
    stats: Arc<AdmissionStats>,
    threshold: u64,
    window_secs: i64,
    ban_secs: i64,
}

impl ViolationRecorder {
    pub fn new(
        attempts: Arc<dyn AttemptStore>,
        registry: Arc<BlockRegistry>,
        stats: Arc<AdmissionStats>,
        threshold: u64,
        window_secs: i64,
        ban_secs: i64,
    ) -> Self {
        Self {
            attempts,
            registry,
            stats,
            threshold,
            window_secs,
            ban_secs,
        }
    }

    /// Appends one violation row and escalates when the trailing-window
    /// count lands exactly on the threshold, so a single crossing produces
    /// a single ban.
    pub async fn record(
        &self,
        addr: IpAddr,
        endpoint: Option<&str>,
        kind: AttemptKind,
    ) -> Result<(), StorageError> {
        let now = Timestamp::now();
        self.attempts
            .append(FailedAttempt {
                id: Id::new_random(),
                address: addr.to_string(),
                endpoint: endpoint.map(|e| e.to_string()),
                kind,
                at: now,
            })
            .await?;

        let since = now.minus_secs(self.window_secs);
        let count = self.attempts.count_since(&addr.to_string(), since).await?;
        if count == self.threshold {
            let reason = format!(
                "automatic ban: {count} violations within {}h",
                self.window_secs / 3_600
            );
            warn!(address = %addr, violations = count, "escalating to network ban");
            self.registry
                .block(
                    addr,
                    ActorId::System,
                    Some(reason),
                    Some(now.plus_secs(self.ban_secs)),
                    None,
                )
                .await?;
            self.stats.mark_escalation();
        }
        Ok(())
    }

    /// Fire-and-forget variant for the denial paths: admission latency
    /// must not wait on the violation write.
    pub fn record_detached(&self, addr: IpAddr, endpoint: Option<String>, kind: AttemptKind) {
        let recorder = self.clone();
        tokio::spawn(async move {
            if let Err(err) = recorder.record(addr, endpoint.as_deref(), kind).await {
                warn!(address = %addr, error = %err, "failed to record violation");
            }
        });
    }
}

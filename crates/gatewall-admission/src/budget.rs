use crate::config::{BudgetsConfig, RateBudget};
use crate::violations::ViolationRecorder;
use dashmap::DashMap;
use gatewall_storage::AttemptKind;
use gatewall_types::prelude::*;
use std::net::IpAddr;
use tracing::warn;

struct WindowSlot {
    started_at: i64,
    window_ms: i64,
    count: u32,
}

/// Tier-aware request budgets over a fixed window.
///
/// Counting is fixed-window: a key's counter resets when its window
/// elapses, so a burst straddling the boundary can see up to twice the
/// budget across two adjacent windows. Per-key state lives in a `DashMap`
/// whose entry lock makes each acquire atomic; concurrent over-budget
/// callers are each counted.
pub struct RateBudgetEnforcer {
    budgets: BudgetsConfig,
    windows: DashMap<String, WindowSlot>,
    violations: ViolationRecorder,
}

impl RateBudgetEnforcer {
    pub fn new(budgets: BudgetsConfig, violations: ViolationRecorder) -> Self {
        Self {
            budgets,
            windows: DashMap::new(),
            violations,
        }
    }

    /// Budget selection: resolved tier when present, anonymous otherwise.
    pub fn budget_for(&self, tier: Option<LicenseTier>) -> RateBudget {
        match tier {
            Some(LicenseTier::Premium) => self.budgets.premium,
            Some(LicenseTier::Basic) => self.budgets.basic,
            Some(LicenseTier::Free) => self.budgets.free,
            None => self.budgets.anonymous,
        }
    }

    /// Counts this request against the key's current window; false means
    /// the budget is exhausted and the request must be denied.
    pub fn try_acquire(&self, key: &str, budget: RateBudget, now: Timestamp) -> bool {
        let window_ms = budget.window_secs as i64 * 1_000;
        let mut slot = self.windows.entry(key.to_string()).or_insert(WindowSlot {
            started_at: now.0,
            window_ms,
            count: 0,
        });
        if now.0 - slot.started_at >= window_ms {
            slot.started_at = now.0;
            slot.count = 0;
        }
        slot.window_ms = window_ms;
        slot.count += 1;
        slot.count <= budget.max_requests
    }

    /// Records the violation row and escalates through the shared
    /// recorder. Recording failures are logged, not surfaced: the denial
    /// already stands.
    pub async fn on_exceeded(&self, addr: Option<IpAddr>, endpoint: &str) {
        let Some(addr) = addr else {
            return;
        };
        if let Err(err) = self
            .violations
            .record(addr, Some(endpoint), AttemptKind::RateLimit)
            .await
        {
            warn!(address = %addr, error = %err, "failed to record rate violation");
        }
    }

    /// Drops window slots idle for at least two of their own windows.
    pub fn purge_stale(&self, now: Timestamp) {
        self.windows
            .retain(|_, slot| now.0 - slot.started_at < slot.window_ms * 2);
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

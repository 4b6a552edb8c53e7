use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-process admission counters; cheap enough to keep unconditionally.
#[derive(Debug, Default)]
pub struct AdmissionStats {
    checked: AtomicU64,
    admitted: AtomicU64,
    denied: AtomicU64,
    escalations: AtomicU64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AdmissionReport {
    pub checked: u64,
    pub admitted: u64,
    pub denied: u64,
    pub escalations: u64,
}

impl AdmissionStats {
    pub fn mark_checked(&self) {
        self.checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_admitted(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_denied(&self) {
        self.denied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_escalation(&self) {
        self.escalations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self) -> AdmissionReport {
        AdmissionReport {
            checked: self.checked.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            escalations: self.escalations.load(Ordering::Relaxed),
        }
    }
}

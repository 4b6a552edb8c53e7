use crate::budget::RateBudgetEnforcer;
use crate::config::AdmissionConfig;
use crate::errors::AdmissionError;
use crate::gate::LicenseGate;
use crate::model::{Admission, CallerIdentity};
use crate::observe::{AdmissionReport, AdmissionStats};
use crate::registry::BlockRegistry;
use crate::violations::ViolationRecorder;
use gatewall_storage::{AttemptKind, AttemptStore, BlockStore, LicenseStore};
use gatewall_types::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The admission facade: block check, license validation, tier budget,
/// quota commit. Constructed explicitly and passed where needed; there is
/// no global instance.
pub struct AdmissionPipeline {
    registry: Arc<BlockRegistry>,
    gate: LicenseGate,
    enforcer: RateBudgetEnforcer,
    violations: ViolationRecorder,
    stats: Arc<AdmissionStats>,
    config: AdmissionConfig,
}

impl AdmissionPipeline {
    pub fn new(
        licenses: Arc<dyn LicenseStore>,
        blocks: Arc<dyn BlockStore>,
        attempts: Arc<dyn AttemptStore>,
        config: AdmissionConfig,
    ) -> Self {
        let registry = Arc::new(BlockRegistry::new(blocks));
        let stats = Arc::new(AdmissionStats::default());
        let violations = ViolationRecorder::new(
            attempts,
            Arc::clone(&registry),
            Arc::clone(&stats),
            config.escalation.threshold,
            config.escalation.window_secs,
            config.blocklist.ban_duration_secs,
        );
        let gate = LicenseGate::new(licenses, Arc::clone(&registry), violations.clone());
        let enforcer = RateBudgetEnforcer::new(config.budgets.clone(), violations.clone());
        Self {
            registry,
            gate,
            enforcer,
            violations,
            stats,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn enforcer(&self) -> &RateBudgetEnforcer {
        &self.enforcer
    }

    pub fn report(&self) -> AdmissionReport {
        self.stats.report()
    }

    /// Starts the periodic snapshot refresh (eager first tick).
    pub fn spawn_refresh(&self) -> tokio::task::JoinHandle<()> {
        Arc::clone(&self.registry)
            .spawn_refresh(Duration::from_secs(self.config.blocklist.refresh_interval_secs))
    }

    /// Runs the full admission pipeline; the first failing stage
    /// short-circuits with its denial.
    pub async fn admit(&self, caller: &CallerIdentity) -> Result<Admission, AdmissionError> {
        self.stats.mark_checked();
        match self.run(caller).await {
            Ok(admission) => {
                self.stats.mark_admitted();
                Ok(admission)
            }
            Err(err) => {
                self.stats.mark_denied();
                debug!(code = err.code().0, endpoint = %caller.endpoint, "request denied");
                Err(err)
            }
        }
    }

    async fn run(&self, caller: &CallerIdentity) -> Result<Admission, AdmissionError> {
        let now = Timestamp::now();

        // Leaf check first: a banned address is turned away before any
        // storage round-trip.
        if let Some(addr) = caller.addr {
            if self.registry.is_blocked(addr) {
                self.violations.record_detached(
                    addr,
                    Some(caller.endpoint.clone()),
                    AttemptKind::LicenseCheck,
                );
                return Err(AdmissionError::ip_blocked(&addr.to_string()));
            }
        }

        let license = self.gate.validate(caller, now).await?;

        // Budget before commit: a budget-denied request must leave
        // request_count untouched.
        let budget = self.enforcer.budget_for(Some(license.tier));
        if !self.enforcer.try_acquire(&license.key, budget, now) {
            self.enforcer.on_exceeded(caller.addr, &caller.endpoint).await;
            return Err(AdmissionError::rate_limit_exceeded());
        }

        let resolved = self.gate.commit(&license.key, caller, now).await?;
        Ok(Admission { license: resolved })
    }
}

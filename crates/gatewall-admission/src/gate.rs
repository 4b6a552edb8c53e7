use crate::errors::AdmissionError;
use crate::model::{CallerIdentity, ResolvedLicense};
use crate::registry::BlockRegistry;
use crate::violations::ViolationRecorder;
use gatewall_storage::{AttemptKind, ConsumeOutcome, License, LicenseStore};
use gatewall_types::prelude::*;
use std::sync::Arc;
use tracing::warn;

/// The per-call license check: the most detailed validator in the
/// pipeline and the only component that mutates `request_count`.
pub struct LicenseGate {
    licenses: Arc<dyn LicenseStore>,
    registry: Arc<BlockRegistry>,
    violations: ViolationRecorder,
}

impl LicenseGate {
    pub fn new(
        licenses: Arc<dyn LicenseStore>,
        registry: Arc<BlockRegistry>,
        violations: ViolationRecorder,
    ) -> Self {
        Self {
            licenses,
            registry,
            violations,
        }
    }

    /// Non-mutating validation ladder; the first failing check wins.
    /// Every denial except the missing-key case emits a failed-attempt
    /// signal for the caller's address.
    pub async fn validate(
        &self,
        caller: &CallerIdentity,
        now: Timestamp,
    ) -> Result<License, AdmissionError> {
        let Some(key) = caller.license_key.as_deref() else {
            return Err(AdmissionError::license_required());
        };

        let license = match self.licenses.get(key).await {
            Ok(Some(license)) => license,
            Ok(None) => return Err(self.deny(caller, AdmissionError::license_not_found())),
            Err(err) => {
                warn!(error = %err, "license lookup failed; denying");
                return Err(self.deny(caller, err.into()));
            }
        };

        if let Some(addr) = caller.addr {
            if self.registry.is_blocked(addr) {
                return Err(self.deny(caller, AdmissionError::ip_blocked(&addr.to_string())));
            }
        }

        if !license.allows_hwid(caller.hwid.as_deref()) {
            return Err(self.deny(caller, AdmissionError::hwid_mismatch()));
        }

        if license.is_expired(now) {
            return Err(self.deny(caller, AdmissionError::license_expired()));
        }

        if license.quota_exhausted() {
            return Err(self.deny(caller, AdmissionError::request_limit_exceeded()));
        }

        Ok(license)
    }

    /// The quota commit: one atomic increment-with-ceiling at the storage
    /// layer. Expiry and ceiling are re-checked there, so a racer that
    /// lost the last slot is denied here even after passing `validate`.
    pub async fn commit(
        &self,
        key: &str,
        caller: &CallerIdentity,
        now: Timestamp,
    ) -> Result<ResolvedLicense, AdmissionError> {
        let outcome = match self
            .licenses
            .consume_request(
                key,
                now,
                caller.addr_string().as_deref(),
                caller.hwid.as_deref(),
            )
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "quota commit failed; denying");
                return Err(self.deny(caller, err.into()));
            }
        };

        match outcome {
            ConsumeOutcome::Consumed(license) => Ok(ResolvedLicense::from(license)),
            ConsumeOutcome::LimitExceeded => {
                Err(self.deny(caller, AdmissionError::request_limit_exceeded()))
            }
            ConsumeOutcome::Expired => Err(self.deny(caller, AdmissionError::license_expired())),
            ConsumeOutcome::NotFound => Err(self.deny(caller, AdmissionError::license_not_found())),
        }
    }

    fn deny(&self, caller: &CallerIdentity, err: AdmissionError) -> AdmissionError {
        if let Some(addr) = caller.addr {
            self.violations.record_detached(
                addr,
                Some(caller.endpoint.clone()),
                AttemptKind::LicenseCheck,
            );
        }
        err
    }
}

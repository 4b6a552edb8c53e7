use gatewall_storage::License;
use gatewall_types::prelude::*;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Request attributes the pipeline consumes, already lifted out of the
/// transport by the interceptor layer.
#[derive(Clone, Debug)]
pub struct CallerIdentity {
    pub addr: Option<IpAddr>,
    pub license_key: Option<String>,
    pub hwid: Option<String>,
    pub endpoint: String,
}

impl CallerIdentity {
    pub fn anonymous(endpoint: impl Into<String>) -> Self {
        Self {
            addr: None,
            license_key: None,
            hwid: None,
            endpoint: endpoint.into(),
        }
    }

    pub fn addr_string(&self) -> Option<String> {
        self.addr.map(|addr| addr.to_string())
    }
}

/// License context attached to an admitted request for downstream
/// consumers; tier is already normalized.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolvedLicense {
    pub key: String,
    pub user_id: Id,
    pub tier: LicenseTier,
    pub request_count: u64,
    pub request_limit: Option<u64>,
    pub valid_until: Timestamp,
}

impl From<License> for ResolvedLicense {
    fn from(license: License) -> Self {
        Self {
            key: license.key,
            user_id: license.user_id,
            tier: license.tier,
            request_count: license.request_count,
            request_limit: license.request_limit,
            valid_until: license.valid_until,
        }
    }
}

/// A positive admission decision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Admission {
    pub license: ResolvedLicense,
}

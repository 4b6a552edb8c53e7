use async_trait::async_trait;
use gatewall_admission::prelude::{CallerIdentity, ResolvedLicense};
use std::net::IpAddr;

pub const LICENSE_KEY_HEADER: &str = "X-License-Key";
pub const HARDWARE_ID_HEADER: &str = "X-Hardware-Id";
pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

#[derive(Clone, Debug, Default)]
pub struct AdmitContext {
    pub request_id: String,
    pub correlation_id: Option<String>,
    pub caller: Option<CallerIdentity>,
    pub license: Option<ResolvedLicense>,
}

pub trait ProtoRequest: Send {
    fn method(&self) -> &str;
    fn path(&self) -> &str;
    fn header(&self, name: &str) -> Option<String>;
    fn peer_addr(&self) -> Option<IpAddr>;
}

#[async_trait]
pub trait ProtoResponse: Send {
    fn set_status(&mut self, code: u16);
    fn insert_header(&mut self, name: &str, value: &str);
    async fn write_json(
        &mut self,
        body: &serde_json::Value,
    ) -> Result<(), crate::errors::InterceptError>;
}

/// Caller address resolution: first hop of the trusted proxy header when
/// it parses, else the transport peer.
pub fn resolve_client_addr(req: &dyn ProtoRequest) -> Option<IpAddr> {
    req.header(FORWARDED_FOR_HEADER)
        .and_then(|raw| {
            raw.split(',')
                .next()
                .and_then(|hop| hop.trim().parse().ok())
        })
        .or_else(|| req.peer_addr())
}

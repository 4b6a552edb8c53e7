use crate::context::{
    resolve_client_addr, AdmitContext, ProtoRequest, ProtoResponse, CORRELATION_ID_HEADER,
    HARDWARE_ID_HEADER, LICENSE_KEY_HEADER, REQUEST_ID_HEADER,
};
use crate::errors::InterceptError;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use gatewall_admission::prelude::CallerIdentity;

/// Lifts credentials and the caller address out of the transport.
pub struct ContextInitStage;

#[async_trait]
impl Stage for ContextInitStage {
    async fn handle(
        &self,
        cx: &mut AdmitContext,
        req: &mut dyn ProtoRequest,
        _rsp: &mut dyn ProtoResponse,
    ) -> Result<StageOutcome, InterceptError> {
        cx.request_id = req
            .header(REQUEST_ID_HEADER)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        cx.correlation_id = req.header(CORRELATION_ID_HEADER);

        cx.caller = Some(CallerIdentity {
            addr: resolve_client_addr(req),
            license_key: req.header(LICENSE_KEY_HEADER),
            hwid: req.header(HARDWARE_ID_HEADER),
            endpoint: req.path().to_string(),
        });

        Ok(StageOutcome::Continue)
    }
}

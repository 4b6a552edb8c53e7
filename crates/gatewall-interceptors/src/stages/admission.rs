use crate::context::{AdmitContext, ProtoRequest, ProtoResponse};
use crate::errors::InterceptError;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use gatewall_admission::AdmissionPipeline;
use std::sync::Arc;

/// Runs the admission pipeline; denials are written here with their
/// stable code and status, and the chain short-circuits.
pub struct AdmissionStage {
    pub pipeline: Arc<AdmissionPipeline>,
}

#[async_trait]
impl Stage for AdmissionStage {
    async fn handle(
        &self,
        cx: &mut AdmitContext,
        _req: &mut dyn ProtoRequest,
        rsp: &mut dyn ProtoResponse,
    ) -> Result<StageOutcome, InterceptError> {
        let Some(caller) = cx.caller.as_ref() else {
            return write_error(
                rsp,
                InterceptError::internal("admission stage before context init"),
            )
            .await;
        };

        match self.pipeline.admit(caller).await {
            Ok(admission) => {
                cx.license = Some(admission.license);
                Ok(StageOutcome::Continue)
            }
            Err(err) => {
                let mut obj = err.into_inner();
                if obj.correlation_id.is_none() {
                    obj.correlation_id = Some(cx.request_id.clone());
                }
                write_error(rsp, InterceptError::from_error(obj)).await
            }
        }
    }
}

async fn write_error(
    rsp: &mut dyn ProtoResponse,
    err: InterceptError,
) -> Result<StageOutcome, InterceptError> {
    let (status, json) = crate::errors::to_http_response(&err);
    rsp.set_status(status);
    rsp.write_json(&json).await?;
    Ok(StageOutcome::ShortCircuit)
}

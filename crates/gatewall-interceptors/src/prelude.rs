pub use crate::context::{
    resolve_client_addr, AdmitContext, ProtoRequest, ProtoResponse, CORRELATION_ID_HEADER,
    FORWARDED_FOR_HEADER, HARDWARE_ID_HEADER, LICENSE_KEY_HEADER, REQUEST_ID_HEADER,
};
pub use crate::errors::{to_http_response, InterceptError};
pub use crate::stages::admission::AdmissionStage;
pub use crate::stages::context_init::ContextInitStage;
pub use crate::stages::response_stamp::ResponseStampStage;
pub use crate::stages::{InterceptorChain, Stage, StageOutcome};

pub use crate::{
    code::{codes, spec_of, CodeSpec, ErrorCode, REGISTRY},
    kind::ErrorKind,
    model::{ErrorBuilder, ErrorObj},
    render::{AuditErrorView, PublicErrorView},
    retry::RetryClass,
    severity::Severity,
};

use gatewall_errors::prelude::*;
use gatewall_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct AdmissionError(pub ErrorObj);

impl AdmissionError {
    pub fn into_inner(self) -> ErrorObj {
        self.0
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    pub fn license_required() -> Self {
        AdmissionError(ErrorBuilder::new(codes::LICENSE_REQUIRED).build())
    }

    /// One generic denial for both malformed and unregistered keys.
    pub fn license_not_found() -> Self {
        AdmissionError(ErrorBuilder::new(codes::LICENSE_NOT_FOUND).build())
    }

    pub fn ip_blocked(address: &str) -> Self {
        AdmissionError(
            ErrorBuilder::new(codes::IP_BLOCKED)
                .dev_msg(format!("address {address} is on the block list"))
                .build(),
        )
    }

    pub fn hwid_mismatch() -> Self {
        AdmissionError(ErrorBuilder::new(codes::HWID_MISMATCH).build())
    }

    pub fn license_expired() -> Self {
        AdmissionError(ErrorBuilder::new(codes::LICENSE_EXPIRED).build())
    }

    pub fn request_limit_exceeded() -> Self {
        AdmissionError(ErrorBuilder::new(codes::REQUEST_LIMIT_EXCEEDED).build())
    }

    pub fn rate_limit_exceeded() -> Self {
        AdmissionError(ErrorBuilder::new(codes::RATE_LIMIT_EXCEEDED).build())
    }

    pub fn access_denied(msg: &str) -> Self {
        AdmissionError(
            ErrorBuilder::new(codes::ACCESS_DENIED).dev_msg(msg).build(),
        )
    }
}

impl From<StorageError> for AdmissionError {
    /// Fail closed: storage trouble denies the request; details stay in
    /// the dev message and never reach the caller.
    fn from(err: StorageError) -> Self {
        let inner = err.into_inner();
        AdmissionError(
            ErrorBuilder::new(codes::ACCESS_DENIED)
                .dev_msg(format!(
                    "storage failure during admission: {} {}",
                    inner.code.0,
                    inner.message_dev.unwrap_or_default()
                ))
                .build(),
        )
    }
}

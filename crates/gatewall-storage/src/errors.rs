use gatewall_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct StorageError(pub Box<ErrorObj>);

impl StorageError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn not_found(msg: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::STORAGE_NOT_FOUND)
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn conflict(msg: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::STORAGE_CONFLICT)
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn unavailable(msg: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::STORAGE_UNAVAILABLE)
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn internal(msg: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::INTERNAL).dev_msg(msg).build(),
        ))
    }
}

pub use crate::errors::StorageError;
pub use crate::memory::MemoryVault;
pub use crate::model::{
    AttemptKind, BlockRecord, BlockUpsert, BlockView, ConsumeOutcome, FailedAttempt, License, Page,
};
pub use crate::spi::{AttemptStore, BlockStore, LicenseStore};

pub use crate::budget::RateBudgetEnforcer;
pub use crate::config::{
    load_config, AdmissionConfig, BlocklistConfig, BudgetsConfig, ConfigError, EscalationConfig,
    RateBudget,
};
pub use crate::errors::AdmissionError;
pub use crate::gate::LicenseGate;
pub use crate::model::{Admission, CallerIdentity, ResolvedLicense};
pub use crate::observe::{AdmissionReport, AdmissionStats};
pub use crate::pipeline::AdmissionPipeline;
pub use crate::registry::BlockRegistry;
pub use crate::violations::ViolationRecorder;

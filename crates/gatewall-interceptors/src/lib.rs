pub mod context;
pub mod errors;
pub mod prelude;
pub mod stages;

pub use stages::{InterceptorChain, Stage, StageOutcome};

pub use crate::{
    actor::{ActorId, SYSTEM_ACTOR},
    id::Id,
    tier::LicenseTier,
    time::Timestamp,
};

use crate::id::Id;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const SYSTEM_ACTOR: &str = "system";

/// Who performed a block/unblock: an administrator, or the escalation logic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActorId {
    User(Id),
    System,
}

impl ActorId {
    pub fn as_str(&self) -> &str {
        match self {
            ActorId::User(id) => &id.0,
            ActorId::System => SYSTEM_ACTOR,
        }
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == SYSTEM_ACTOR {
            ActorId::System
        } else {
            ActorId::User(Id(raw))
        })
    }
}

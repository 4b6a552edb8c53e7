use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64); // ms since epoch, UTC

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub const fn plus_secs(self, secs: i64) -> Self {
        Self(self.0 + secs * 1_000)
    }

    pub const fn minus_secs(self, secs: i64) -> Self {
        Self(self.0 - secs * 1_000)
    }

    pub const fn is_after(self, other: Timestamp) -> bool {
        self.0 > other.0
    }
}

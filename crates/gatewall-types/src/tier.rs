use serde::{Deserialize, Serialize};

/// Service level attached to a license; selects the rate budget.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum LicenseTier {
    #[default]
    Free,
    Basic,
    Premium,
}

impl LicenseTier {
    /// Unrecognized values normalize to the lowest tier.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PREMIUM" => LicenseTier::Premium,
            "BASIC" => LicenseTier::Basic,
            _ => LicenseTier::Free,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LicenseTier::Free => "FREE",
            LicenseTier::Basic => "BASIC",
            LicenseTier::Premium => "PREMIUM",
        }
    }
}

/// Lenient deserializer for stored tier values: anything unrecognized
/// lands on the lowest tier instead of failing the whole record.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<LicenseTier, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(LicenseTier::normalize(&raw))
}

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

const ENV_PREFIX: &str = "GATEWALL__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("unsupported config path: {0}")]
    UnsupportedPath(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// A fixed request-count-per-window rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBudget {
    pub window_secs: u64,
    pub max_requests: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocklistConfig {
    /// Snapshot refresh cadence; staleness is bounded by this interval.
    pub refresh_interval_secs: u64,
    /// How long an escalation ban stays in force.
    pub ban_duration_secs: i64,
}

impl Default for BlocklistConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 3_600,
            ban_duration_secs: 86_400,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Violations within the window before an automatic ban.
    pub threshold: u64,
    pub window_secs: i64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            threshold: 3,
            window_secs: 86_400,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetsConfig {
    pub anonymous: RateBudget,
    pub free: RateBudget,
    pub basic: RateBudget,
    pub premium: RateBudget,
}

impl Default for BudgetsConfig {
    fn default() -> Self {
        Self {
            anonymous: RateBudget {
                window_secs: 60,
                max_requests: 30,
            },
            free: RateBudget {
                window_secs: 60,
                max_requests: 60,
            },
            basic: RateBudget {
                window_secs: 60,
                max_requests: 300,
            },
            premium: RateBudget {
                window_secs: 60,
                max_requests: 1_200,
            },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    pub blocklist: BlocklistConfig,
    pub escalation: EscalationConfig,
    pub budgets: BudgetsConfig,
}

/// Defaults, overlaid by an optional YAML file, overlaid by
/// `GATEWALL__`-prefixed environment variables
/// (e.g. `GATEWALL__ESCALATION__THRESHOLD=5`).
pub fn load_config(path: Option<&Path>) -> Result<AdmissionConfig, ConfigError> {
    let mut config = AdmissionConfig::default();

    if let Some(path) = path {
        if path.exists() {
            let content =
                fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
            config = serde_yaml::from_str(&content)
                .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        }
    }

    for (key, raw) in env::vars() {
        if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
            let path = stripped
                .split("__")
                .filter(|segment| !segment.is_empty())
                .map(|segment| segment.to_ascii_lowercase())
                .collect::<Vec<_>>()
                .join(".");
            if path.is_empty() {
                continue;
            }
            apply_override(&mut config, &path, &raw)?;
        }
    }

    Ok(config)
}

fn apply_override(
    config: &mut AdmissionConfig,
    path: &str,
    raw: &str,
) -> Result<(), ConfigError> {
    match path {
        "blocklist.refresh_interval_secs" => {
            config.blocklist.refresh_interval_secs = parse_u64(raw)?;
        }
        "blocklist.ban_duration_secs" => {
            config.blocklist.ban_duration_secs = parse_i64(raw)?;
        }
        "escalation.threshold" => {
            config.escalation.threshold = parse_u64(raw)?;
        }
        "escalation.window_secs" => {
            config.escalation.window_secs = parse_i64(raw)?;
        }
        "budgets.anonymous.max_requests" => {
            config.budgets.anonymous.max_requests = parse_u32(raw)?;
        }
        "budgets.anonymous.window_secs" => {
            config.budgets.anonymous.window_secs = parse_u64(raw)?;
        }
        "budgets.free.max_requests" => {
            config.budgets.free.max_requests = parse_u32(raw)?;
        }
        "budgets.free.window_secs" => {
            config.budgets.free.window_secs = parse_u64(raw)?;
        }
        "budgets.basic.max_requests" => {
            config.budgets.basic.max_requests = parse_u32(raw)?;
        }
        "budgets.basic.window_secs" => {
            config.budgets.basic.window_secs = parse_u64(raw)?;
        }
        "budgets.premium.max_requests" => {
            config.budgets.premium.max_requests = parse_u32(raw)?;
        }
        "budgets.premium.window_secs" => {
            config.budgets.premium.window_secs = parse_u64(raw)?;
        }
        path => return Err(ConfigError::UnsupportedPath(path.to_string())),
    }
    Ok(())
}

fn parse_u64(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("expected integer, got {raw}")))
}

fn parse_i64(raw: &str) -> Result<i64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("expected integer, got {raw}")))
}

fn parse_u32(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("expected integer, got {raw}")))
}

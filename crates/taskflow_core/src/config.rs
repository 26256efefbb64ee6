//! Tracker configuration.
//!
//! Defaults mirror the browser storage budget the client was designed
//! around; environment variables override them for embedding hosts.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Character-equivalent capacity shared by all slots (5 MiB).
pub const DEFAULT_CAPACITY_CHARS: usize = 5 * 1024 * 1024;
/// Image icons above this size are dropped when habits are loaded.
pub const DEFAULT_ICON_LOAD_LIMIT_CHARS: usize = 15_000;
/// Image icons above this size are stripped when a habits save hits quota.
pub const DEFAULT_ICON_DEGRADE_LIMIT_CHARS: usize = 15_000;

pub const CAPACITY_ENV: &str = "TASKFLOW_STORE_CAPACITY";
pub const STREAK_POLICY_ENV: &str = "TASKFLOW_STREAK_POLICY";

/// How a miss on `today` is treated by the backward streak walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakPolicy {
    /// A miss on today does not end the walk; only misses on earlier days do.
    #[default]
    Compatible,
    /// Any miss ends the walk, including today.
    Strict,
}

impl StreakPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compatible" => Some(Self::Compatible),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

/// Store limits and derived-state policy for a tracker session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub capacity_chars: usize,
    pub icon_load_limit_chars: usize,
    pub icon_degrade_limit_chars: usize,
    pub streak_policy: StreakPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capacity_chars: DEFAULT_CAPACITY_CHARS,
            icon_load_limit_chars: DEFAULT_ICON_LOAD_LIMIT_CHARS,
            icon_degrade_limit_chars: DEFAULT_ICON_DEGRADE_LIMIT_CHARS,
            streak_policy: StreakPolicy::default(),
        }
    }
}

impl TrackerConfig {
    /// Builds the default config overlaid with `TASKFLOW_*` environment values.
    ///
    /// # Errors
    /// - Returns `ConfigError` when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = non_blank(lookup(CAPACITY_ENV)) {
            self.capacity_chars = raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: CAPACITY_ENV,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = non_blank(lookup(STREAK_POLICY_ENV)) {
            self.streak_policy =
                StreakPolicy::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                    name: STREAK_POLICY_ENV,
                    value: raw.clone(),
                })?;
        }
        Ok(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { name: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, value } => {
                write!(f, "invalid value `{value}` for `{name}`")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StreakPolicy, TrackerConfig, CAPACITY_ENV, STREAK_POLICY_ENV};

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = TrackerConfig::default()
            .with_overrides(|name| match name {
                CAPACITY_ENV => Some(" 4096 ".to_string()),
                STREAK_POLICY_ENV => Some("STRICT".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.capacity_chars, 4096);
        assert_eq!(config.streak_policy, StreakPolicy::Strict);
        assert_eq!(config.icon_degrade_limit_chars, 15_000);
    }

    #[test]
    fn blank_values_are_ignored_and_garbage_is_rejected() {
        let config = TrackerConfig::default()
            .with_overrides(|_| Some("   ".to_string()))
            .unwrap();
        assert_eq!(config, TrackerConfig::default());

        let err = TrackerConfig::default()
            .with_overrides(|name| (name == CAPACITY_ENV).then(|| "lots".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: CAPACITY_ENV,
                value: "lots".to_string()
            }
        );
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"streak_policy":"strict","capacity_chars":10}"#).unwrap();
        assert_eq!(config.capacity_chars, 10);
        assert_eq!(config.streak_policy, StreakPolicy::Strict);
        assert_eq!(config.icon_load_limit_chars, 15_000);
    }
}

//! Quirk registry configuration

use crate::error::QuirkError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// How to pick between several quirks matching the same device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The earliest registered matching quirk wins
    #[default]
    FirstRegistered,
    /// The quirk constraining the most signature fields wins
    MostSpecific,
}

impl FromStr for MatchPolicy {
    type Err = QuirkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_registered" | "first" => Ok(MatchPolicy::FirstRegistered),
            "most_specific" | "specific" => Ok(MatchPolicy::MostSpecific),
            other => Err(QuirkError::InvalidConfig(format!(
                "unknown match policy: {other}"
            ))),
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuirkConfig {
    /// Register the quirks shipped with this crate
    pub enable_builtin_quirks: bool,
    /// JSON file with additional, user-defined quirks
    pub custom_quirks_path: Option<PathBuf>,
    /// Tie-break between overlapping quirks
    pub match_policy: MatchPolicy,
}

impl Default for QuirkConfig {
    fn default() -> Self {
        Self {
            enable_builtin_quirks: true,
            custom_quirks_path: None,
            match_policy: MatchPolicy::default(),
        }
    }
}

impl QuirkConfig {
    /// Read configuration from `QUIRKS_*` environment variables
    #[allow(clippy::missing_errors_doc)]
    pub fn from_env() -> Result<Self, QuirkError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, QuirkError> {
        let mut config = Self::default();

        if let Some(path) = lookup("QUIRKS_CUSTOM_PATH").filter(|p| !p.is_empty()) {
            config.custom_quirks_path = Some(PathBuf::from(path));
        }
        if let Some(policy) = lookup("QUIRKS_MATCH_POLICY") {
            config.match_policy = policy.parse()?;
        }
        if let Some(flag) = lookup("QUIRKS_DISABLE_BUILTIN") {
            let flag = flag.trim().to_ascii_lowercase();
            config.enable_builtin_quirks = !matches!(flag.as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }
}

//! Pool settings

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading settings. Pooling itself never errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables shared by every pool in a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Instances created per tick by `PoolContext::warm`. Zero means synchronous.
    pub default_per_tick_budget: usize,
    /// Appended to the template name for every pooled instance.
    pub pooled_name_suffix: String,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            default_per_tick_budget: 1,
            pooled_name_suffix: " (Pooled)".to_string(),
        }
    }
}

impl PoolSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = PoolSettings::from_json(r#"{ "default_per_tick_budget": 4 }"#).unwrap();
        assert_eq!(settings.default_per_tick_budget, 4);
        assert_eq!(settings.pooled_name_suffix, " (Pooled)");
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = PoolSettings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PoolSettings::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}

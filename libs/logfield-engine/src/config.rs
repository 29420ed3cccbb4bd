use serde::Deserialize;

use crate::dispatch::OnUnknown;
use crate::error::DispatchError;

/// What registry construction does when two handlers key the same type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Last registration wins. Each overwrite is logged.
    #[default]
    Overwrite,
    /// Fail with `DispatchError::DuplicateType`.
    Reject,
}

/// Dispatch configuration, parsed from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Fail on values no handler recognizes instead of degrading to text.
    #[serde(default = "default_raise_on_unknown")]
    pub raise_on_unknown: bool,

    #[serde(default)]
    pub duplicate_types: DuplicatePolicy,
}

fn default_raise_on_unknown() -> bool {
    true
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            raise_on_unknown: default_raise_on_unknown(),
            duplicate_types: DuplicatePolicy::default(),
        }
    }
}

impl DispatchConfig {
    pub fn on_unknown(&self) -> OnUnknown {
        if self.raise_on_unknown {
            OnUnknown::Raise
        } else {
            OnUnknown::Fallback
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, DispatchError> {
        toml::from_str(toml_str).map_err(|e| DispatchError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_uses_defaults() {
        let cfg = DispatchConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, DispatchConfig::default());
        assert!(cfg.raise_on_unknown);
        assert_eq!(cfg.duplicate_types, DuplicatePolicy::Overwrite);
        assert_eq!(cfg.on_unknown(), OnUnknown::Raise);
    }

    #[test]
    fn parses_all_fields() {
        let cfg = DispatchConfig::from_toml_str(
            r#"
            raise_on_unknown = false
            duplicate_types = "reject"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.on_unknown(), OnUnknown::Fallback);
        assert_eq!(cfg.duplicate_types, DuplicatePolicy::Reject);
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = DispatchConfig::from_toml_str(r#"duplicate_types = "merge""#).unwrap_err();
        assert!(matches!(err, DispatchError::Config(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = DispatchConfig::from_toml_str("raise = true").unwrap_err();
        assert!(err.to_string().contains("raise"));
    }
}

//! Configuration for Curator operations
//!
//! Defines the keep-policy applied to duplicate records and the analytical
//! unit that duplicates are counted within.

use crate::CuratorError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Conflict-resolution rule for records sharing an identity key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeepPolicy {
    /// Keep the most recently collected record
    ///
    /// Ties (equal or missing timestamps) go to the later input position. A
    /// missing timestamp sorts before any present one.
    #[default]
    KeepLast,

    /// Keep the record with the most known counts, then the most populated
    /// labels, then fall back to keep-last
    KeepMostComplete,

    /// Union the fields of all records
    ///
    /// Disagreeing sons/daughters counts are an error. Disagreeing labels
    /// resolve in keep-last order.
    MergeFields,
}

impl KeepPolicy {
    /// All policies, in documentation order
    pub const ALL: [KeepPolicy; 3] = [
        KeepPolicy::KeepLast,
        KeepPolicy::KeepMostComplete,
        KeepPolicy::MergeFields,
    ];

    /// Kebab-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            KeepPolicy::KeepLast => "keep-last",
            KeepPolicy::KeepMostComplete => "keep-most-complete",
            KeepPolicy::MergeFields => "merge-fields",
        }
    }
}

impl std::fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeepPolicy {
    type Err = CuratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| CuratorError::Config(format!("unknown keep policy: {}", s)))
    }
}

/// Unit within which identity keys must be unique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupScope {
    /// One record per politician overall ("unique politicians")
    #[default]
    Global,
    /// One record per politician per session/assembly
    PerSession,
}

/// Configuration for the Curator
///
/// # Examples
///
/// ```
/// use progeny_curator::{CuratorConfig, DedupScope, KeepPolicy};
///
/// let config = CuratorConfig::default();
/// assert_eq!(config.keep_policy, KeepPolicy::KeepLast);
/// assert_eq!(config.scope, DedupScope::Global);
///
/// let config = CuratorConfig::strict();
/// assert_eq!(config.keep_policy, KeepPolicy::MergeFields);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratorConfig {
    /// Policy for duplicate records
    pub keep_policy: KeepPolicy,

    /// Analytical unit for uniqueness
    pub scope: DedupScope,
}

impl CuratorConfig {
    /// Refuse to pick between disagreeing counts
    pub fn strict() -> Self {
        Self {
            keep_policy: KeepPolicy::MergeFields,
            scope: DedupScope::Global,
        }
    }

    /// One record per politician per session, keep-last
    pub fn per_session() -> Self {
        Self {
            keep_policy: KeepPolicy::KeepLast,
            scope: DedupScope::PerSession,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CuratorConfig::default();
        assert_eq!(config.keep_policy, KeepPolicy::KeepLast);
        assert_eq!(config.scope, DedupScope::Global);
    }

    #[test]
    fn test_per_session_config() {
        let config = CuratorConfig::per_session();
        assert_eq!(config.scope, DedupScope::PerSession);
        assert_eq!(config.keep_policy, KeepPolicy::default());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("keep-last".parse::<KeepPolicy>().unwrap(), KeepPolicy::KeepLast);
        assert_eq!(
            "Keep_Most_Complete".parse::<KeepPolicy>().unwrap(),
            KeepPolicy::KeepMostComplete
        );
        assert_eq!("merge-fields".parse::<KeepPolicy>().unwrap(), KeepPolicy::MergeFields);
        assert!("keep-first".parse::<KeepPolicy>().is_err());
    }

    #[test]
    fn test_toml_config() {
        let config: CuratorConfig = toml::from_str(
            r#"
            keep_policy = "merge-fields"
            scope = "per-session"
            "#,
        )
        .unwrap();
        assert_eq!(config.keep_policy, KeepPolicy::MergeFields);
        assert_eq!(config.scope, DedupScope::PerSession);

        let partial: CuratorConfig = toml::from_str(r#"scope = "per-session""#).unwrap();
        assert_eq!(partial.keep_policy, KeepPolicy::KeepLast);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = CuratorConfig::strict();
        let serialized = serde_json::to_string(&config).unwrap();
        assert!(serialized.contains("merge-fields"));

        let deserialized: CuratorConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config.keep_policy, deserialized.keep_policy);
        assert_eq!(config.scope, deserialized.scope);
    }
}

//! # Registry Configuration

use serde::{Deserialize, Serialize};

/// What to do when a registered type is offered a different version set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail with `ConflictingVersionSet`.
    #[default]
    Reject,
    /// Keep the first registered set and log a warning.
    KeepExisting,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::KeepExisting => "keep_existing",
        }
    }
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry settings. Every field has a default, so an empty document is a
/// valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub conflict_policy: ConflictPolicy,
}

impl RegistryConfig {
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_reject() {
        let config: RegistryConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.conflict_policy, ConflictPolicy::Reject);
    }

    #[test]
    fn parses_keep_existing() {
        let config: RegistryConfig = serde_yaml::from_str("conflict_policy: keep_existing").unwrap();
        assert_eq!(config.conflict_policy, ConflictPolicy::KeepExisting);
        assert_eq!(config.conflict_policy.to_string(), "keep_existing");
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(serde_yaml::from_str::<RegistryConfig>("conflict: reject").is_err());
    }
}

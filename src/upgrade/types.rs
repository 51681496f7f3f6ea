//! Common types for upgrade resolution

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::config::MISSING_VERSION;
use crate::version::peer::normalize_peer_version;
use crate::version::registry::PeerDependencies;
use crate::version::semver::compare_versions;

/// A package compared against its upgrade target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeCandidate {
    pub package: String,
    /// Installed version, or `"Missing"` for an absent peer
    #[serde(rename = "version")]
    pub current_version: String,
    /// Target version; may be empty when it could not be determined
    pub latest_version: String,
    pub is_latest: bool,
    pub version_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_dependencies: Option<PeerDependencies>,
}

impl UpgradeCandidate {
    pub fn is_missing(&self) -> bool {
        self.current_version == MISSING_VERSION
    }
}

/// A peer dependency that is required but not installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    pub name: String,
    pub required_range: String,
}

/// Missing peers accumulated across components, keyed by package name.
///
/// When several components require the same missing peer, the lowest
/// required version is kept; on a tie the first requirement stays. An empty
/// requirement never replaces a declared one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingSet {
    entries: IndexMap<String, String>,
}

impl MissingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, required_range: &str) {
        match self.entries.get_mut(name) {
            Some(existing) => {
                let lower = match (existing.trim().is_empty(), required_range.trim().is_empty()) {
                    (_, true) => false,
                    (true, false) => true,
                    (false, false) => compare_versions(
                        &normalize_peer_version(required_range, false),
                        &normalize_peer_version(existing, false),
                    )
                    .is_lt(),
                };

                if lower {
                    debug!(
                        "Lowering missing requirement for {}: {} -> {}",
                        name, existing, required_range
                    );
                    *existing = required_range.to_string();
                }
            }
            None => {
                self.entries
                    .insert(name.to_string(), required_range.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = MissingDependency> + '_ {
        self.entries.iter().map(|(name, range)| MissingDependency {
            name: name.clone(),
            required_range: range.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_set_dedups_by_name_keeping_lowest_requirement() {
        let mut missing = MissingSet::new();

        missing.insert("react", "^18.2.0");
        missing.insert("framer-motion", ">=11.5.6 || >=12.0.0-alpha.1");
        missing.insert("react", "^18.0.0");
        missing.insert("react", "^19.0.0");

        assert_eq!(missing.len(), 2);
        assert_eq!(missing.get("react"), Some("^18.0.0"));
        assert_eq!(
            missing.iter().map(|d| d.name).collect::<Vec<_>>(),
            vec!["react", "framer-motion"]
        );
    }

    #[test]
    fn missing_set_keeps_first_requirement_on_tie() {
        let mut missing = MissingSet::new();

        missing.insert("react", "^18.0.0");
        missing.insert("react", ">=18.0.0");

        assert_eq!(missing.get("react"), Some("^18.0.0"));
    }

    #[test]
    fn missing_set_prefers_declared_requirement_over_empty() {
        let mut missing = MissingSet::new();

        missing.insert("react", "^18.0.0");
        missing.insert("react", "");
        missing.insert("framer-motion", "");
        missing.insert("framer-motion", ">=11.5.6");

        assert_eq!(missing.get("react"), Some("^18.0.0"));
        assert_eq!(missing.get("framer-motion"), Some(">=11.5.6"));
    }

    #[test]
    fn candidate_serializes_with_camel_case_field_names() {
        let candidate = UpgradeCandidate {
            package: "react".to_string(),
            current_version: MISSING_VERSION.to_string(),
            latest_version: "18.0.0".to_string(),
            is_latest: false,
            version_mode: String::new(),
            peer_dependencies: None,
        };

        let json = serde_json::to_value(&candidate).unwrap();

        assert!(candidate.is_missing());
        assert_eq!(
            json,
            serde_json::json!({
                "package": "react",
                "version": "Missing",
                "latestVersion": "18.0.0",
                "isLatest": false,
                "versionMode": ""
            })
        );
    }
}

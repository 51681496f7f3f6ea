//! package.json reading and writing

use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::upgrade::types::UpgradeCandidate;
use crate::version::peer::split_version_mode;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Manifest root is not a JSON object")]
    NotAnObject,
}

/// Dependency name to the raw version string written in the manifest
pub type Dependencies = IndexMap<String, String>;

const DEPENDENCIES: &str = "dependencies";
const DEV_DEPENDENCIES: &str = "devDependencies";

/// An installed dependency as read from the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    /// Version with its `^`/`~` mode removed
    pub installed_version: String,
    /// `"^"`, `"~"` or `""`
    pub version_mode: String,
}

impl PackageRecord {
    pub fn new(name: &str, raw_version: &str) -> Self {
        let (installed_version, version_mode) = split_version_mode(raw_version);
        Self {
            name: name.to_string(),
            installed_version,
            version_mode,
        }
    }
}

/// A project's package.json, kept as a JSON object so unrelated fields
/// and key order survive a rewrite
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    root: Map<String, Value>,
}

impl PackageManifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        debug!("Reading manifest {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        match serde_json::from_str(content)? {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ManifestError::NotAnObject),
        }
    }

    fn section(&self, name: &str) -> Dependencies {
        self.root
            .get(name)
            .and_then(Value::as_object)
            .map(|deps| {
                deps.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn dependencies(&self) -> Dependencies {
        self.section(DEPENDENCIES)
    }

    pub fn dev_dependencies(&self) -> Dependencies {
        self.section(DEV_DEPENDENCIES)
    }

    /// devDependencies merged with dependencies; dependencies win on conflict
    pub fn all_dependencies(&self) -> Dependencies {
        let mut all = self.dev_dependencies();
        all.extend(self.dependencies());
        all
    }

    pub fn package_record(&self, name: &str) -> Option<PackageRecord> {
        self.all_dependencies()
            .get(name)
            .map(|raw| PackageRecord::new(name, raw))
    }

    /// Write each candidate's target version, keeping its version mode.
    ///
    /// A package is updated in the section that already lists it; packages
    /// not listed anywhere are added to `dependencies`.
    pub fn write_upgrade_versions(&mut self, candidates: &[UpgradeCandidate]) {
        for candidate in candidates {
            let section = if self.section(DEPENDENCIES).contains_key(&candidate.package)
                || !self.section(DEV_DEPENDENCIES).contains_key(&candidate.package)
            {
                DEPENDENCIES
            } else {
                DEV_DEPENDENCIES
            };

            let value = format!("{}{}", candidate.version_mode, candidate.latest_version);
            let deps = self
                .root
                .entry(section)
                .or_insert_with(|| Value::Object(Map::new()));

            if let Value::Object(deps) = deps {
                debug!("Writing {}@{} to {}", candidate.package, value, section);
                deps.insert(candidate.package.clone(), Value::String(value));
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let content = serde_json::to_string_pretty(&self.root)?;
        std::fs::write(path, content)?;
        info!("Wrote manifest {:?}", path);
        Ok(())
    }
}

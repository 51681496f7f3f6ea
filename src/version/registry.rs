//! Registry trait for looking up package versions and peer dependencies

use std::collections::HashMap;

use indexmap::IndexMap;
#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Dist-tag name to version (e.g. `{"latest": "2.7.0", "beta": "2.8.0-beta.1"}`)
pub type DistTags = HashMap<String, String>;

/// Peer dependency name to required range
pub type PeerDependencies = IndexMap<String, String>;

/// Trait for querying a package registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches the dist-tags of a package
    ///
    /// # Returns
    /// * `Ok(DistTags)` - Every published tag with the version it points to
    /// * `Err(RegistryError)` - If the lookup fails
    async fn fetch_dist_tags(&self, package_name: &str) -> Result<DistTags, RegistryError>;

    /// Fetches the peer dependencies declared by one published version
    async fn fetch_peer_dependencies(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<PeerDependencies, RegistryError>;
}

//! Registry test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use heroui_upgrade::project::{ComponentCatalog, PackageManifest};
use heroui_upgrade::upgrade::UpgradeContext;
use heroui_upgrade::version::cache::ExecCache;
use heroui_upgrade::version::channel::Channel;
use heroui_upgrade::version::error::RegistryError;
use heroui_upgrade::version::registry::{DistTags, PeerDependencies, Registry};

/// In-memory registry with call counting
#[derive(Default)]
pub struct MockRegistry {
    dist_tags: HashMap<String, DistTags>,
    peers: HashMap<String, PeerDependencies>,
    calls: AtomicUsize,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, package: &str, tag: &str, version: &str) -> Self {
        self.dist_tags
            .entry(package.to_string())
            .or_default()
            .insert(tag.to_string(), version.to_string());
        self
    }

    pub fn with_peers(mut self, package: &str, version: &str, peers: &[(&str, &str)]) -> Self {
        self.peers.insert(
            format!("{}@{}", package, version),
            peers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    /// Number of registry requests served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn fetch_dist_tags(&self, package_name: &str) -> Result<DistTags, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dist_tags
            .get(package_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }

    async fn fetch_peer_dependencies(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<PeerDependencies, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .peers
            .get(&format!("{}@{}", package_name, version))
            .cloned()
            .unwrap_or_default())
    }
}

/// Create a cache backed by a file in a fresh temporary directory
pub fn create_test_cache() -> (TempDir, ExecCache) {
    let temp_dir = TempDir::new().unwrap();
    let cache = ExecCache::init(&temp_dir.path().join("cache.json"), false).unwrap();
    (temp_dir, cache)
}

/// Create a context over `registry` backed by a fresh cache
pub fn create_test_context(
    channel: Channel,
    registry: Arc<MockRegistry>,
    catalog: ComponentCatalog,
) -> (TempDir, UpgradeContext) {
    let (temp_dir, cache) = create_test_cache();
    (
        temp_dir,
        UpgradeContext::new(channel, registry, cache, catalog),
    )
}

/// Build a manifest whose `dependencies` are `deps`
pub fn manifest(deps: &[(&str, &str)]) -> PackageManifest {
    let deps: serde_json::Map<String, serde_json::Value> = deps
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    PackageManifest::parse(&serde_json::json!({ "dependencies": deps }).to_string()).unwrap()
}

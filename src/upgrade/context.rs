//! Per-invocation resolution context
//!
//! Holds everything a resolution pass needs (release channel, registry,
//! cache, component catalog) and lazily remembers the main package's
//! channel versions for the rest of the invocation.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::MAIN_PACKAGE;
use crate::project::catalog::ComponentCatalog;
use crate::upgrade::error::UpgradeError;
use crate::version::cache::ExecCache;
use crate::version::channel::Channel;
use crate::version::registry::{PeerDependencies, Registry};

/// Main-package versions remembered for the invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    LatestVersion,
    BetaVersion,
    CanaryVersion,
}

impl StoreKey {
    pub fn for_channel(channel: Channel) -> Self {
        match channel {
            Channel::Latest => StoreKey::LatestVersion,
            Channel::Beta => StoreKey::BetaVersion,
            Channel::Canary => StoreKey::CanaryVersion,
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            StoreKey::LatestVersion => Channel::Latest,
            StoreKey::BetaVersion => Channel::Beta,
            StoreKey::CanaryVersion => Channel::Canary,
        }
    }
}

#[derive(Default)]
struct VersionStore {
    latest: OnceCell<String>,
    beta: OnceCell<String>,
    canary: OnceCell<String>,
}

impl VersionStore {
    fn slot(&self, key: StoreKey) -> &OnceCell<String> {
        match key {
            StoreKey::LatestVersion => &self.latest,
            StoreKey::BetaVersion => &self.beta,
            StoreKey::CanaryVersion => &self.canary,
        }
    }
}

pub struct UpgradeContext {
    channel: Channel,
    registry: Arc<dyn Registry>,
    cache: ExecCache,
    catalog: ComponentCatalog,
    store: VersionStore,
}

impl UpgradeContext {
    pub fn new(
        channel: Channel,
        registry: Arc<dyn Registry>,
        cache: ExecCache,
        catalog: ComponentCatalog,
    ) -> Self {
        Self {
            channel,
            registry,
            cache,
            catalog,
            store: VersionStore::default(),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &ExecCache {
        &self.cache
    }

    /// Main package version for `key`, looked up at most once per context
    pub async fn store_version(&self, key: StoreKey) -> Result<String, UpgradeError> {
        self.store
            .slot(key)
            .get_or_try_init(|| self.channel_version(MAIN_PACKAGE, key.channel()))
            .await
            .cloned()
    }

    /// Version `package` should be upgraded to on the active channel.
    ///
    /// On the latest channel a catalog component's published version is
    /// used without a registry lookup.
    pub async fn target_version(&self, package: &str) -> Result<String, UpgradeError> {
        if package == MAIN_PACKAGE {
            return self.store_version(StoreKey::for_channel(self.channel)).await;
        }

        if self.channel == Channel::Latest
            && let Some(component) = self.catalog.by_package(package)
            && !component.version.is_empty()
        {
            return Ok(component.version.clone());
        }

        self.channel_version(package, self.channel).await
    }

    async fn channel_version(&self, package: &str, channel: Channel) -> Result<String, UpgradeError> {
        match channel {
            Channel::Latest => {
                self.cache
                    .package_version(package, || self.lookup_dist_tag(package, channel))
                    .await
            }
            _ => {
                let key = format!("npm view {}@{} version", package, channel.tag());
                self.cache
                    .get_or_compute(&key, || self.lookup_dist_tag(package, channel))
                    .await
            }
        }
    }

    async fn lookup_dist_tag(&self, package: &str, channel: Channel) -> Result<String, UpgradeError> {
        let tags = self.registry.fetch_dist_tags(package).await?;

        let version = match tags.get(channel.tag()) {
            Some(version) => version.clone(),
            None => {
                debug!(
                    "{} has no {} tag, falling back to latest",
                    package,
                    channel.tag()
                );
                tags.get("latest").cloned().unwrap_or_default()
            }
        };

        Ok(version)
    }

    /// Peer dependencies declared by `package@version`, cached per version
    pub async fn peer_dependencies(
        &self,
        package: &str,
        version: &str,
    ) -> Result<PeerDependencies, UpgradeError> {
        let key = format!("npm view {}@{} peerDependencies --json", package, version);
        self.cache
            .get_or_compute(&key, || async {
                self.registry
                    .fetch_peer_dependencies(package, version)
                    .await
                    .map_err(UpgradeError::from)
            })
            .await
    }
}

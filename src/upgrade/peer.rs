//! Peer dependency resolution against a project's installed dependencies

use futures::future::try_join_all;
use tracing::debug;

use crate::config::MISSING_VERSION;
use crate::project::manifest::{Dependencies, PackageRecord};
use crate::upgrade::context::UpgradeContext;
use crate::upgrade::error::UpgradeError;
use crate::upgrade::types::{MissingDependency, MissingSet, UpgradeCandidate};
use crate::version::channel::{Channel, satisfies_target};
use crate::version::peer::normalize_peer_version;
use crate::version::registry::PeerDependencies;

/// Compare `package_name`'s peer requirements with the installed versions.
///
/// Returns one candidate per installed peer. Peers that are not installed
/// are added to `missing` instead, so several components can be resolved
/// before the missing ones are looked up together.
pub fn resolve_peer_dependencies(
    channel: Channel,
    package_name: &str,
    installed: &Dependencies,
    missing: &mut MissingSet,
    peers: &PeerDependencies,
) -> Vec<UpgradeCandidate> {
    let mut candidates = Vec::new();

    for (peer, required_range) in peers {
        let Some(raw) = installed.get(peer) else {
            debug!(
                "{} requires {}@{} which is not installed",
                package_name, peer, required_range
            );
            missing.insert(peer, required_range);
            continue;
        };

        let record = PackageRecord::new(peer, raw);
        let current = normalize_peer_version(&record.installed_version, false);
        let required = normalize_peer_version(required_range, false);
        let is_latest = satisfies_target(&current, &required, channel);

        candidates.push(UpgradeCandidate {
            package: peer.clone(),
            latest_version: if is_latest { current.clone() } else { required },
            current_version: current,
            is_latest,
            version_mode: record.version_mode,
            peer_dependencies: None,
        });
    }

    candidates
}

/// Turn the accumulated missing peers into candidates.
///
/// The target is the declared requirement, or a registry lookup on the
/// active channel when the requirement is empty.
pub async fn resolve_missing(
    ctx: &UpgradeContext,
    missing: &MissingSet,
) -> Result<Vec<UpgradeCandidate>, UpgradeError> {
    try_join_all(missing.iter().map(|dependency| resolve_one_missing(ctx, dependency))).await
}

async fn resolve_one_missing(
    ctx: &UpgradeContext,
    dependency: MissingDependency,
) -> Result<UpgradeCandidate, UpgradeError> {
    let latest_version = if dependency.required_range.trim().is_empty() {
        ctx.target_version(&dependency.name).await?
    } else {
        normalize_peer_version(&dependency.required_range, false)
    };

    Ok(UpgradeCandidate {
        package: dependency.name,
        current_version: MISSING_VERSION.to_string(),
        latest_version,
        is_latest: false,
        version_mode: String::new(),
        peer_dependencies: None,
    })
}
